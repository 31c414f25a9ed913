//! Hyprland compositor.
//!
//! Writes colour variables plus an example settings file that uses them.
//! `hyprctl reload` re-reads the whole compositor configuration, so it only
//! runs when the `reload` config key lists `hyprland`.

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
use crate::template::{EmbeddedTemplate, TemplateLoader};

pub const NAME: &str = "hyprland";
pub const COLOURS_FILE: &str = "pigment-colours.conf";
pub const EXAMPLE_FILE: &str = "pigment.conf";

const DEFAULT_SUBDIR: &str = ".config/hypr";

pub const TEMPLATES: &[EmbeddedTemplate] = &[
    EmbeddedTemplate {
        name: "pigment-colours.conf.tmpl",
        content: include_str!("../../templates/hyprland/pigment-colours.conf.tmpl"),
    },
    EmbeddedTemplate {
        name: "pigment.conf.tmpl",
        content: include_str!("../../templates/hyprland/pigment.conf.tmpl"),
    },
];

pub struct Hyprland {
    core: PluginCore,
    runner: Arc<dyn CommandRunner>,
    reload: bool,
}

impl Hyprland {
    #[must_use]
    pub fn new() -> Self { Self::with_runner(Arc::new(SystemRunner)) }

    #[must_use]
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { core: PluginCore::new(NAME, DEFAULT_SUBDIR, TEMPLATES), runner, reload: false }
    }

    #[must_use]
    pub fn with_loader(templates: TemplateLoader, runner: Arc<dyn CommandRunner>) -> Self {
        Self { core: PluginCore::with_loader(DEFAULT_SUBDIR, templates), runner, reload: false }
    }
}

impl Default for Hyprland {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Hyprland {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate Hyprland colour variables and example settings" }

    fn register_flags(&self, cmd: Command) -> Command { self.core.register_flags(cmd) }

    fn apply_flags(&mut self, matches: &ArgMatches) { self.core.apply_flags(matches); }

    fn set_output_dir(&mut self, dir: Option<PathBuf>) { self.core.set_output_dir(dir); }

    fn set_reload(&mut self, enabled: bool) { self.reload = enabled; }

    fn default_output_dir(&self) -> PathBuf { self.core.output_dir() }

    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
        self.core.render_all(
            data,
            &[(COLOURS_FILE, "pigment-colours.conf.tmpl"), (EXAMPLE_FILE, "pigment.conf.tmpl")],
        )
    }

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }

    fn as_post_execute(&self) -> Option<&dyn PostExecute> { Some(self) }
}

impl Verbose for Hyprland {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Hyprland {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}

#[async_trait]
impl PostExecute for Hyprland {
    async fn post_execute(&self, _ctx: &ExecutionContext, _written: &[PathBuf]) -> Result<(), PluginError> {
        if !self.reload {
            return Ok(());
        }
        match self.runner.run("hyprctl", &["reload"]).await {
            Ok(_) => self.core.diagnostics().note("reloaded hyprland"),
            Err(err) => self.core.diagnostics().note(format_args!("could not reload hyprland: {err}")),
        }
        Ok(())
    }
}
