//! Plugin listing commands.

use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use crate::cli::output::{display_path, truncate};
use crate::error::PigmentError;
use crate::plugin::{Entry, Registry};

/// Plugin subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(next_display_order = None)]
pub enum PluginsCommands {
    /// List the available output plugins.
    ///
    /// Shows each plugin's capabilities and the directory it writes to,
    /// including any override from the configuration file.
    List {
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Serialisable view of a registered plugin.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: Vec<&'static str>,
    pub output_dir: String,
}

impl From<&Entry> for PluginSummary {
    fn from(entry: &Entry) -> Self {
        let caps = entry.capabilities;
        let capabilities = [
            (caps.verbose, "verbose"),
            (caps.pre_execute, "pre-execute"),
            (caps.post_execute, "post-execute"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();

        Self {
            name: entry.plugin.name(),
            description: entry.plugin.description(),
            capabilities,
            output_dir: entry.plugin.default_output_dir().display().to_string(),
        }
    }
}

/// Execute plugin subcommands.
///
/// # Errors
///
/// Returns an error if the JSON output cannot be serialised.
pub fn execute(cmd: &PluginsCommands, registry: &Registry) -> Result<(), PigmentError> {
    match cmd {
        PluginsCommands::List { json: true } => {
            let summaries: Vec<PluginSummary> = registry.entries().map(PluginSummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        PluginsCommands::List { json: false } => {
            for entry in registry.entries() {
                println!(
                    "{:<10} {:<44} {}",
                    entry.plugin.name().bold(),
                    truncate(entry.plugin.description(), 44),
                    display_path(&entry.plugin.default_output_dir()).dimmed()
                );
                println!("{:<10} {}", "", format!("capabilities: {}", entry.capabilities).dimmed());
            }
        }
    }
    Ok(())
}
