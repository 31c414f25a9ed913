//! Template management commands.
//!
//! Embedded templates can be copied into the templates directory and edited
//! there; a custom file always wins over the embedded default.

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output::{display_path, format_bool};
use crate::error::PigmentError;
use crate::plugin::Registry;
use crate::plugins;
use crate::template::{DumpReport, TemplateLoader, templates_dir};

/// Template subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(next_display_order = None)]
pub enum TemplatesCommands {
    /// List embedded templates and whether they are customised.
    List {
        /// Only list this plugin's templates.
        #[arg(value_name = "PLUGIN")]
        plugin: Option<String>,
    },

    /// Copy a plugin's embedded templates into the templates directory.
    ///
    /// Existing files are left untouched unless --force is given.
    #[command(after_long_help = r#"Examples:
  pigment templates dump kitty           # Write kitty templates for editing
  pigment templates dump waybar --force  # Reset waybar templates to the defaults"#)]
    Dump {
        #[arg(value_name = "PLUGIN")]
        plugin: String,

        /// Overwrite templates that already exist.
        #[arg(long, short)]
        force: bool,
    },
}

/// Execute template subcommands.
///
/// # Errors
///
/// Returns an error for an unknown plugin or when a template cannot be written.
pub fn execute(cmd: &TemplatesCommands, registry: &Registry) -> Result<(), PigmentError> {
    match cmd {
        TemplatesCommands::List { plugin } => {
            let names = match plugin {
                Some(plugin) => select_one(registry, plugin)?,
                None => registry.names().collect(),
            };

            println!("Templates directory: {}\n", display_path(&templates_dir()));
            for name in names {
                print_templates(&loader_for(name)?);
            }
            Ok(())
        }
        TemplatesCommands::Dump { plugin, force } => {
            select_one(registry, plugin)?;
            let report = loader_for(plugin)?.dump_all(*force)?;
            print_dump(&report);
            Ok(())
        }
    }
}

fn select_one(registry: &Registry, plugin: &str) -> Result<Vec<&'static str>, PigmentError> {
    registry.select(&[plugin]).map_err(|err| PigmentError::InvalidArguments(err.to_string()))
}

fn loader_for(plugin: &str) -> Result<TemplateLoader, PigmentError> {
    plugins::template_loader(plugin)
        .ok_or_else(|| PigmentError::InvalidArguments(format!("plugin {plugin:?} has no templates")))
}

fn print_templates(loader: &TemplateLoader) {
    println!("{}", loader.plugin().bold());
    for info in loader.list() {
        println!("  {} {:<28} {}", format_bool(info.customised), info.name, display_path(&info.custom_path).dimmed());
    }
}

fn print_dump(report: &DumpReport) {
    for path in &report.written {
        println!("{} wrote {}", "✓".green(), display_path(path));
    }
    for path in &report.skipped {
        println!("{} kept {} (use --force to overwrite)", "-".yellow(), display_path(path));
    }
}
