//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `generate` - Render a palette through the output plugins
//! - `plugins` - Plugin listing
//! - `templates` - Template listing and customisation
//! - `config_cmd` - Configuration file management
//!
//! The derive-based [`Cli`] only knows the static arguments. Each plugin adds
//! its own flags to `generate` through [`build_command`], and reads them back
//! from the same matches.

use std::io;
use std::path::PathBuf;

use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::{Generator, Shell};

use crate::config::{self, PigmentConfig};
use crate::error::PigmentError;
use crate::plugin::Registry;
use crate::{schema, template};

pub mod config_cmd;
pub mod generate;
pub mod plugins;
pub mod templates;

pub use config_cmd::ConfigCommands;
pub use generate::GenerateArgs;
pub use plugins::PluginsCommands;
pub use templates::TemplatesCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pigment CLI - render a categorised palette into desktop themes.
#[derive(Parser, Debug)]
#[command(name = "pigment")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Print plugin diagnostics.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Render a palette into theme files for the selected plugins.
    #[command(after_long_help = r#"Examples:
  pigment generate --palette palette.json                        # Every plugin
  pigment generate --palette palette.json -p kitty,waybar        # Only kitty and waybar
  pigment generate --palette palette.json --wallpaper ~/w.png    # Also set the wallpaper
  pigment generate --palette palette.json --dry-run              # Show what would be written
  pigment generate --palette palette.json --kitty.output-dir /tmp/kitty"#)]
    Generate(GenerateArgs),

    /// Output plugin commands.
    #[command(subcommand)]
    Plugins(PluginsCommands),

    /// Template customisation commands.
    #[command(subcommand)]
    Templates(TemplatesCommands),

    /// Configuration file management commands.
    ///
    /// Initialize and locate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Pigment configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// Pigment configuration file.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(pigment completions --shell zsh)"
    ///   pigment completions --shell fish > ~/.config/fish/completions/pigment.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// The full command tree, including every plugin's `generate` flags.
#[must_use]
pub fn build_command(registry: &Registry) -> Command {
    Cli::command().mut_subcommand("generate", |cmd| {
        registry.entries().fold(cmd, |cmd, entry| entry.plugin.register_flags(cmd))
    })
}

impl Cli {
    /// Parses `args` against the command tree built for `registry`.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments, `--help` and `--version`.
    pub fn try_parse_with<I, T>(registry: &Registry, args: I) -> Result<(Self, ArgMatches), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = build_command(registry).try_get_matches_from(args)?;
        let cli = Self::from_arg_matches(&matches)?;
        Ok((cli, matches))
    }

    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Loads configuration, honouring `--config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that does not exist.
    pub fn load_config(&self) -> Result<&'static PigmentConfig, PigmentError> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(PigmentError::InvalidArguments(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path);
        }
        Ok(config::init())
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(
        &self,
        matches: &ArgMatches,
        registry: &mut Registry,
        config: &PigmentConfig,
    ) -> Result<(), PigmentError> {
        if let Some(dir) = config.templates_dir() {
            template::set_custom_templates_dir(dir);
        }
        for entry in registry.entries_mut() {
            if let Some(dir) = config.output_dir(entry.plugin.name()) {
                entry.plugin.set_output_dir(Some(dir));
            }
            entry.plugin.set_reload(config.reloads(entry.plugin.name()));
        }

        match &self.command {
            Commands::Generate(args) => {
                let generate_matches = matches.subcommand_matches("generate").ok_or_else(|| {
                    PigmentError::InvalidArguments("missing generate arguments".to_string())
                })?;
                generate::execute(args, generate_matches, registry, config, self.verbose || config.verbose)
            }
            Commands::Plugins(cmd) => plugins::execute(cmd, registry),
            Commands::Templates(cmd) => templates::execute(cmd, registry),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }

            Commands::Completions { shell } => {
                print_completions(*shell, &mut build_command(registry));
                Ok(())
            }
        }
    }
}

/// Print shell completions to stdout.
fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    clap_complete::generate(generator, cmd, "pigment", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins as bundled;

    fn parse(args: &[&str]) -> (Cli, ArgMatches) {
        let registry = bundled::default_registry().unwrap();
        Cli::try_parse_with(&registry, args).unwrap()
    }

    #[test]
    fn test_cli_parses_schema() {
        let (cli, _) = parse(&["pigment", "schema"]);
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let (cli, _) = parse(&["pigment", "completions", "--shell", "zsh"]);
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Zsh }));
    }

    #[test]
    fn test_cli_parses_generate() {
        let (cli, _) =
            parse(&["pigment", "generate", "--palette", "p.json", "-p", "kitty,waybar", "-p", "wofi", "--dry-run"]);
        let Commands::Generate(args) = cli.command else { panic!("Expected Generate command") };
        assert_eq!(args.palette, "p.json");
        assert_eq!(args.plugins, vec!["kitty", "waybar", "wofi"]);
        assert!(args.dry_run);
        assert!(!args.all);
    }

    #[test]
    fn test_cli_rejects_all_with_plugins() {
        let registry = bundled::default_registry().unwrap();
        let result =
            Cli::try_parse_with(&registry, ["pigment", "generate", "--palette", "p.json", "--all", "-p", "kitty"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_requires_palette() {
        let registry = bundled::default_registry().unwrap();
        assert!(Cli::try_parse_with(&registry, ["pigment", "generate"]).is_err());
    }

    #[test]
    fn test_plugin_flags_reach_the_plugin() {
        let mut registry = bundled::default_registry().unwrap();
        let (_, matches) = Cli::try_parse_with(
            &registry,
            ["pigment", "generate", "--palette", "p.json", "--kitty.output-dir", "/tmp/kitty-theme"],
        )
        .unwrap();

        let generate = matches.subcommand_matches("generate").unwrap();
        for entry in registry.entries_mut() {
            entry.plugin.apply_flags(generate);
        }

        let kitty = registry.get("kitty").unwrap();
        assert_eq!(kitty.plugin.default_output_dir(), PathBuf::from("/tmp/kitty-theme"));
        assert!(registry.get("dunst").unwrap().plugin.default_output_dir().ends_with(".config/dunst"));
    }

    #[test]
    fn test_every_plugin_flag_is_registered() {
        let registry = bundled::default_registry().unwrap();
        let cmd = build_command(&registry);
        let generate = cmd.find_subcommand("generate").unwrap();
        for name in registry.names() {
            let flag = crate::plugin::output_dir_flag(name);
            assert!(generate.get_arguments().any(|arg| arg.get_id() == flag.as_str()), "missing {flag}");
        }
    }

    #[test]
    fn test_cli_parses_verbose_after_subcommand() {
        let (cli, _) = parse(&["pigment", "plugins", "list", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Plugins(PluginsCommands::List { json: false })));
    }

    #[test]
    fn test_cli_parses_templates_dump() {
        let (cli, _) = parse(&["pigment", "templates", "dump", "kitty", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Templates(TemplatesCommands::Dump { ref plugin, force: true }) if plugin == "kitty"
        ));
    }

    #[test]
    fn test_cli_parses_config_flag() {
        let (cli, _) = parse(&["pigment", "--config", "/path/to/config.jsonc", "schema"]);
        assert_eq!(cli.config_path(), Some(PathBuf::from("/path/to/config.jsonc")));
    }

    #[test]
    fn test_app_version_is_not_empty() {
        assert!(!APP_VERSION.is_empty());
    }
}
