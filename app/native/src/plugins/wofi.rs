//! wofi launcher.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use crate::colour::ThemeData;
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PreExecute,
    PreExecuteOutcome, Verbose, ensure_dir,
};
use crate::template::EmbeddedTemplate;

pub const NAME: &str = "wofi";
pub const COLOURS_FILE: &str = "pigment-colours";
pub const STYLE_FILE: &str = "style.css";

pub const TEMPLATES: &[EmbeddedTemplate] = &[
    EmbeddedTemplate {
        name: "pigment-colours.tmpl",
        content: include_str!("../../templates/wofi/pigment-colours.tmpl"),
    },
    EmbeddedTemplate { name: "style.css.tmpl", content: include_str!("../../templates/wofi/style.css.tmpl") },
];

pub struct Wofi {
    core: PluginCore,
}

impl Wofi {
    #[must_use]
    pub fn new() -> Self { Self { core: PluginCore::new(NAME, ".config/wofi", TEMPLATES) } }
}

impl Default for Wofi {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Wofi {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate a wofi colour list and stylesheet" }

    fn register_flags(&self, cmd: Command) -> Command { self.core.register_flags(cmd) }

    fn apply_flags(&mut self, matches: &ArgMatches) { self.core.apply_flags(matches); }

    fn set_output_dir(&mut self, dir: Option<PathBuf>) { self.core.set_output_dir(dir); }

    fn default_output_dir(&self) -> PathBuf { self.core.output_dir() }

    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
        self.core.render_all(data, &[(COLOURS_FILE, "pigment-colours.tmpl"), (STYLE_FILE, "style.css.tmpl")])
    }

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }
}

impl Verbose for Wofi {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Wofi {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("wofi") {
            return Ok(skip);
        }
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}
