//! The output plugin contract.
//!
//! An output plugin turns [`ThemeData`] into a set of configuration files
//! for one desktop application. Beyond generation, a plugin may opt into
//! three capabilities by returning `Some` from the matching accessor:
//!
//! - [`Verbose`] - receives the run's verbosity
//! - [`PreExecute`] - checks preconditions and may skip the plugin
//! - [`PostExecute`] - applies side effects after files are written
//!
//! The [`Registry`] probes the accessors once, when the plugin is
//! registered, and the [`host`] drives the lifecycle from that record.

pub mod host;
mod registry;
mod shared;

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgMatches, Command};
use thiserror::Error;

pub use self::registry::{CapabilitySet, Entry, Registry, RegistryError};
pub use self::shared::{Diagnostics, PluginCore, ensure_dir, home_relative, home_relative_in, output_dir_flag};
use crate::colour::ThemeData;
use crate::template::{TemplateError, TemplatePhase};

/// Generated files keyed by file name, relative to the output directory.
pub type FileSet = BTreeMap<String, Vec<u8>>;

/// Errors raised by output plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("theme data is required")]
    NilInput,
    #[error("failed to {phase} {template} template: {source}")]
    Template { phase: TemplatePhase, template: String, source: TemplateError },
    #[error("{0}")]
    Validation(String),
    #[error("{context}: {source}")]
    Io { context: String, source: std::io::Error },
}

impl PluginError {
    /// Tags a template failure with the template it came from.
    #[must_use]
    pub fn template(template: &str, source: TemplateError) -> Self {
        Self::Template { phase: source.phase(), template: template.to_string(), source }
    }
}

/// Per-invocation facts handed to lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub dry_run: bool,
    pub verbose: bool,
    pub output_dir: PathBuf,
    pub wallpaper_path: Option<PathBuf>,
}

/// Result of a pre-execution check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreExecuteOutcome {
    Proceed,
    /// Preconditions are unmet; the plugin is skipped without failing the run.
    Skip(String),
}

/// A theme output target.
pub trait OutputPlugin: Send + Sync {
    /// Stable identifier used for flags and default directories.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Adds this plugin's `--<name>.output-dir` flag.
    fn register_flags(&self, cmd: Command) -> Command;

    /// Reads back the flags added by [`register_flags`](Self::register_flags).
    fn apply_flags(&mut self, matches: &ArgMatches);

    /// Replaces the output directory without going through flags.
    fn set_output_dir(&mut self, dir: Option<PathBuf>);

    /// Opts into reloading the running application after a write.
    ///
    /// Plugins that always reload, or never do, ignore it.
    fn set_reload(&mut self, _enabled: bool) {}

    /// Checks plugin configuration before anything runs.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Validation`] when required configuration is missing.
    fn validate(&self) -> Result<(), PluginError> { Ok(()) }

    /// Where files are written. Never empty.
    fn default_output_dir(&self) -> PathBuf;

    /// Renders the complete file set.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NilInput`] for `None`, or a tagged template
    /// error. No partial file set is ever returned.
    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError>;

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { None }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { None }

    fn as_post_execute(&self) -> Option<&dyn PostExecute> { None }
}

/// Plugins that emit extra diagnostics when asked to.
pub trait Verbose {
    fn set_verbose(&mut self, verbose: bool);
}

/// Precondition check run before generation.
#[async_trait]
pub trait PreExecute: Send + Sync {
    /// # Errors
    ///
    /// Errors are reserved for abnormal failures; unmet preconditions are
    /// reported as [`PreExecuteOutcome::Skip`].
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError>;
}

/// Best-effort side effects run after files are written.
#[async_trait]
pub trait PostExecute: Send + Sync {
    /// # Errors
    ///
    /// Implementations log and swallow their own failures; an error here
    /// means the hook could not run at all.
    async fn post_execute(
        &self,
        ctx: &ExecutionContext,
        written: &[PathBuf],
    ) -> Result<(), PluginError>;
}
