//! Config CLI commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{config_paths, get_config_path};
use crate::error::PigmentError;

/// Config management commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a configuration file at the default location with every
    /// option commented out.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  pigment config init              # Create config at default location
  pigment config init --force      # Overwrite existing config
  pigment config init --path ~/my-config.jsonc  # Create at custom path
  pigment config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/pigment/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show where Pigment looks for its configuration file.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be written.
pub fn execute(cmd: &ConfigCommands) -> Result<(), PigmentError> {
    match cmd {
        ConfigCommands::Init { stdout: true, .. } => {
            println!("{}", generate_config_template());
            Ok(())
        }
        ConfigCommands::Init { force, path, stdout: false } => {
            let path = path.clone().unwrap_or_else(default_config_path);
            init_config(&path, *force)?;

            println!("Configuration file created at: {}", path.display());
            println!("\nAll options are commented out by default.");
            println!("Edit the file and uncomment the options you want to configure.");
            Ok(())
        }
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
    }
}

fn default_config_path() -> PathBuf {
    config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
}

/// Writes the commented template to `path`.
///
/// # Errors
///
/// Returns [`PigmentError::InvalidArguments`] if the file exists and `force`
/// is not set, or an IO error if it cannot be written.
pub fn init_config(path: &Path, force: bool) -> Result<(), PigmentError> {
    if path.exists() && !force {
        return Err(PigmentError::InvalidArguments(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            path.display()
        )));
    }

    create_config_file(path)?;
    Ok(())
}

fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let active = get_config_path();
    let mut found_config = false;

    for (i, path) in config_paths().iter().enumerate() {
        let marker = if active == Some(path) || (active.is_none() && !found_config && path.exists()) {
            found_config = true;
            " (active)"
        } else if path.exists() {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if let Some(path) = active
        && !found_config
    {
        println!("\nUsing --config file: {}", path.display());
    } else if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'pigment config init' to create one.");
    }
}
