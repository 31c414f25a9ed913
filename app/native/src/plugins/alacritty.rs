//! alacritty terminal.
//!
//! alacritty watches imported files itself, so there is nothing to reload;
//! in verbose mode the post hook prints how to import the theme.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use crate::colour::ThemeData;
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PostExecute, PreExecute,
    PreExecuteOutcome, Verbose, ensure_dir,
};
use crate::template::EmbeddedTemplate;

pub const NAME: &str = "alacritty";
pub const THEME_FILE: &str = "pigment-colours.toml";
const THEME_TEMPLATE: &str = "pigment-colours.toml.tmpl";

pub const TEMPLATES: &[EmbeddedTemplate] = &[EmbeddedTemplate {
    name: THEME_TEMPLATE,
    content: include_str!("../../templates/alacritty/pigment-colours.toml.tmpl"),
}];

pub struct Alacritty {
    core: PluginCore,
}

impl Alacritty {
    #[must_use]
    pub fn new() -> Self { Self { core: PluginCore::new(NAME, ".config/alacritty", TEMPLATES) } }

    /// The `import` line to add to `alacritty.toml`.
    #[must_use]
    pub fn import_hint(&self) -> String {
        format!("[general]\nimport = [\"{}\"]", self.core.output_dir().join(THEME_FILE).display())
    }
}

impl Default for Alacritty {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Alacritty {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate alacritty colours for import" }

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

impl Verbose for Alacritty {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Alacritty {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("alacritty") {
            return Ok(skip);
        }
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}

#[async_trait]
impl PostExecute for Alacritty {
    async fn post_execute(&self, _ctx: &ExecutionContext, _written: &[PathBuf]) -> Result<(), PluginError> {
        let diagnostics = self.core.diagnostics();
        if diagnostics.verbose() {
            diagnostics.note(format_args!("to use this theme, add to alacritty.toml:\n{}", self.import_hint()));
        }
        Ok(())
    }
}
