//! The `generate` command.

use std::path::Path;

use clap::{ArgMatches, Args};

use crate::cli::output;
use crate::colour::{CategorisedPalette, ThemeData};
use crate::config::PigmentConfig;
use crate::error::PigmentError;
use crate::platform;
use crate::plugin::Registry;
use crate::plugin::host::{self, DEFAULT_POST_TIMEOUT, DEFAULT_PRE_TIMEOUT, HostOptions};

/// Arguments for `pigment generate`.
///
/// Each plugin also contributes a `--<plugin>.output-dir DIR` flag at runtime.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Categorised palette JSON document.
    #[arg(long, value_name = "FILE")]
    pub palette: String,

    /// Wallpaper image passed to templates and applied by hyprpaper.
    #[arg(long, value_name = "IMAGE")]
    pub wallpaper: Option<String>,

    /// Theme name exposed to templates as `themeName`.
    #[arg(long, value_name = "NAME")]
    pub theme_name: Option<String>,

    /// Plugins to run (comma separated or repeated).
    #[arg(long, short, value_name = "NAMES", value_delimiter = ',', conflicts_with = "all")]
    pub plugins: Vec<String>,

    /// Run every plugin, ignoring the configured selection.
    #[arg(long)]
    pub all: bool,

    /// Render everything but write nothing and run no post hooks.
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Resolves which plugins run: flags, then configuration, then all of them.
    ///
    /// # Errors
    ///
    /// Returns [`PigmentError::InvalidArguments`] for unknown plugin names.
    pub fn selection(&self, registry: &Registry, config: &PigmentConfig) -> Result<Vec<&'static str>, PigmentError> {
        let requested = if self.all {
            &[][..]
        } else if self.plugins.is_empty() {
            config.plugins.as_slice()
        } else {
            self.plugins.as_slice()
        };

        if requested.is_empty() {
            return Ok(registry.names().collect());
        }
        registry.select(requested).map_err(|err| PigmentError::InvalidArguments(err.to_string()))
    }

    /// Loads the palette and assembles the data handed to every plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PigmentError::Palette`] if the palette cannot be read or decoded,
    /// and [`PigmentError::InvalidArguments`] if the wallpaper path cannot be resolved.
    pub fn theme_data(&self) -> Result<ThemeData, PigmentError> {
        let palette = CategorisedPalette::load(&platform::expand(&self.palette))
            .map_err(|err| PigmentError::Palette(err.to_string()))?;

        // Templates and the live hyprpaper apply must see the same absolute path.
        let wallpaper = self
            .wallpaper
            .as_deref()
            .map(|raw| {
                platform::absolute(Path::new(raw))
                    .map_err(|err| PigmentError::InvalidArguments(format!("Invalid --wallpaper '{raw}': {err}")))
            })
            .transpose()?;

        Ok(ThemeData::new(palette).with_wallpaper(wallpaper).with_theme_name(self.theme_name.clone()))
    }
}

/// Runs `pigment generate`.
///
/// `matches` are the `generate` subcommand's matches, which carry the
/// plugin-contributed flags.
///
/// # Errors
///
/// Returns an error if arguments are invalid, the palette cannot be loaded,
/// or no selected plugin succeeded.
pub fn execute(
    args: &GenerateArgs,
    matches: &ArgMatches,
    registry: &mut Registry,
    config: &PigmentConfig,
    verbose: bool,
) -> Result<(), PigmentError> {
    for entry in registry.entries_mut() {
        entry.plugin.apply_flags(matches);
    }

    let selection = args.selection(registry, config)?;
    let data = args.theme_data()?;
    let options = HostOptions {
        dry_run: args.dry_run,
        verbose,
        wallpaper_path: data.wallpaper_path.clone(),
        pre_timeout: config.hooks.pre_timeout().unwrap_or(DEFAULT_PRE_TIMEOUT),
        post_timeout: config.hooks.post_timeout().unwrap_or(DEFAULT_POST_TIMEOUT),
    };

    tracing::debug!(plugins = ?selection, dry_run = args.dry_run, "starting generation");

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let summary = runtime.block_on(host::run(registry, &selection, &data, &options));

    output::print_summary(&summary);

    if summary.is_success() { Ok(()) } else { Err(PigmentError::NothingGenerated) }
}
