//! hyprlock screen locker.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use crate::colour::ThemeData;
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PreExecute, PreExecuteOutcome,
    Verbose, ensure_dir,
};
use crate::template::{EmbeddedTemplate, TemplateLoader};

pub const NAME: &str = "hyprlock";
pub const THEME_FILE: &str = "pigment-hyprlock.conf";
const THEME_TEMPLATE: &str = "pigment-hyprlock.conf.tmpl";
const DEFAULT_SUBDIR: &str = ".config/hypr";

pub const TEMPLATES: &[EmbeddedTemplate] = &[EmbeddedTemplate {
    name: THEME_TEMPLATE,
    content: include_str!("../../templates/hyprlock/pigment-hyprlock.conf.tmpl"),
}];

pub struct Hyprlock {
    core: PluginCore,
}

impl Hyprlock {
    #[must_use]
    pub fn new() -> Self { Self { core: PluginCore::new(NAME, DEFAULT_SUBDIR, TEMPLATES) } }

    #[must_use]
    pub fn with_loader(templates: TemplateLoader) -> Self {
        Self { core: PluginCore::with_loader(DEFAULT_SUBDIR, templates) }
    }
}

impl Default for Hyprlock {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Hyprlock {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate hyprlock colour variables" }

    fn register_flags(&self, cmd: Command) -> Command { self.core.register_flags(cmd) }

    fn apply_flags(&mut self, matches: &ArgMatches) { self.core.apply_flags(matches); }

    fn set_output_dir(&mut self, dir: Option<PathBuf>) { self.core.set_output_dir(dir); }

    fn default_output_dir(&self) -> PathBuf { self.core.output_dir() }

    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
        self.core.render_all(data, &[(THEME_FILE, THEME_TEMPLATE)])
    }

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }
}

impl Verbose for Hyprlock {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Hyprlock {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("hyprlock") {
            return Ok(skip);
        }
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}
