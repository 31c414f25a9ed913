//! kitty terminal.
//!
//! Running instances re-read their configuration on `SIGUSR1`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::signal_processes;
use crate::colour::ThemeData;
use crate::platform::{ProcessSignaller, ReloadSignal, SystemSignaller};
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PostExecute, PreExecute,
    PreExecuteOutcome, Verbose, ensure_dir,
};
use crate::template::{EmbeddedTemplate, TemplateLoader};

pub const NAME: &str = "kitty";
pub const THEME_FILE: &str = "pigment.conf";
const THEME_TEMPLATE: &str = "pigment.conf.tmpl";

pub const TEMPLATES: &[EmbeddedTemplate] = &[EmbeddedTemplate {
    name: THEME_TEMPLATE,
    content: include_str!("../../templates/kitty/pigment.conf.tmpl"),
}];

const DEFAULT_SUBDIR: &str = ".config/kitty/themes";

pub struct Kitty {
    core: PluginCore,
    signaller: Arc<dyn ProcessSignaller>,
}

impl Kitty {
    #[must_use]
    pub fn new() -> Self { Self::with_signaller(Arc::new(SystemSignaller)) }

    #[must_use]
    pub fn with_signaller(signaller: Arc<dyn ProcessSignaller>) -> Self {
        Self { core: PluginCore::new(NAME, DEFAULT_SUBDIR, TEMPLATES), signaller }
    }

    #[must_use]
    pub fn with_loader(templates: TemplateLoader, signaller: Arc<dyn ProcessSignaller>) -> Self {
        Self { core: PluginCore::with_loader(DEFAULT_SUBDIR, templates), signaller }
    }
}

impl Default for Kitty {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Kitty {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate a kitty colour theme and reload running terminals" }

    fn register_flags(&self, cmd: Command) -> Command { self.core.register_flags(cmd) }

    fn apply_flags(&mut self, matches: &ArgMatches) { self.core.apply_flags(matches); }

    fn set_output_dir(&mut self, dir: Option<PathBuf>) { self.core.set_output_dir(dir); }

    fn default_output_dir(&self) -> PathBuf { self.core.output_dir() }

    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
        self.core.render_all(data, &[(THEME_FILE, THEME_TEMPLATE)])
    }

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }

    fn as_post_execute(&self) -> Option<&dyn PostExecute> { Some(self) }
}

impl Verbose for Kitty {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Kitty {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("kitty") {
            return Ok(skip);
        }
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}

#[async_trait]
impl PostExecute for Kitty {
    async fn post_execute(&self, _ctx: &ExecutionContext, _written: &[PathBuf]) -> Result<(), PluginError> {
        signal_processes(self.signaller.as_ref(), self.core.diagnostics(), ReloadSignal::User1, "kitty");
        Ok(())
    }
}
