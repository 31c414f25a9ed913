//! dunst notification daemon.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use crate::colour::ThemeData;
use crate::platform::{CommandRunner, SystemRunner};
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PostExecute, PreExecute,
    PreExecuteOutcome, Verbose, ensure_dir,
};
use crate::template::EmbeddedTemplate;

pub const NAME: &str = "dunst";
pub const THEME_FILE: &str = "pigment.dunstrc";
const THEME_TEMPLATE: &str = "pigment.dunstrc.tmpl";

pub const TEMPLATES: &[EmbeddedTemplate] = &[EmbeddedTemplate {
    name: THEME_TEMPLATE,
    content: include_str!("../../templates/dunst/pigment.dunstrc.tmpl"),
}];

pub struct Dunst {
    core: PluginCore,
    runner: Arc<dyn CommandRunner>,
}

impl Dunst {
    #[must_use]
    pub fn new() -> Self { Self::with_runner(Arc::new(SystemRunner)) }

    #[must_use]
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { core: PluginCore::new(NAME, ".config/dunst", TEMPLATES), runner }
    }
}

impl Default for Dunst {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Dunst {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate dunst notification colours" }

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

impl Verbose for Dunst {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Dunst {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("dunst") {
            return Ok(skip);
        }
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}

#[async_trait]
impl PostExecute for Dunst {
    async fn post_execute(&self, _ctx: &ExecutionContext, _written: &[PathBuf]) -> Result<(), PluginError> {
        match self.runner.run("dunstctl", &["reload"]).await {
            Ok(_) => self.core.diagnostics().note("reloaded dunst"),
            Err(err) => self.core.diagnostics().note(format_args!("could not reload dunst: {err}")),
        }
        Ok(())
    }
}
