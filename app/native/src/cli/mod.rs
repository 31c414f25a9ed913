//! CLI module for Pigment.
//!
//! Parses the command line against the bundled plugin registry, loads the
//! configuration, installs logging, and dispatches the command.

mod commands;
mod output;

pub use commands::{Cli, build_command};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use crate::error::PigmentError;
use crate::plugins;

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn default_filter(verbose: bool) -> EnvFilter { EnvFilter::new(if verbose { "info" } else { "warn" }) }

/// Installs the `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `info` when verbose. The
/// returned handle can raise the level later and is `None` when `RUST_LOG`
/// is in charge.
fn init_tracing(verbose: bool) -> Option<FilterHandle> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let env_controlled = from_env.is_some();
    let (filter, handle) = reload::Layer::new(from_env.unwrap_or_else(|| default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .try_init()
        .ok()?;

    (!env_controlled).then_some(handle)
}

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), PigmentError> {
    let mut registry = plugins::default_registry()?;
    let (cli, matches) = Cli::try_parse_with(&registry, std::env::args_os()).unwrap_or_else(|err| err.exit());

    let filter = init_tracing(cli.verbose);
    let config = cli.load_config()?;
    if config.verbose
        && !cli.verbose
        && let Some(handle) = filter
        && let Err(err) = handle.reload(default_filter(true))
    {
        tracing::debug!(error = %err, "could not raise log level");
    }

    cli.execute(&matches, &mut registry, config)
}
