//! fuzzel application launcher.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use crate::colour::ThemeData;
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PreExecute,
    PreExecuteOutcome, Verbose, ensure_dir,
};
use crate::template::EmbeddedTemplate;

pub const NAME: &str = "fuzzel";
pub const THEME_FILE: &str = "pigment.ini";
const THEME_TEMPLATE: &str = "pigment.ini.tmpl";

pub const TEMPLATES: &[EmbeddedTemplate] = &[EmbeddedTemplate {
    name: THEME_TEMPLATE,
    content: include_str!("../../templates/fuzzel/pigment.ini.tmpl"),
}];

pub struct Fuzzel {
    core: PluginCore,
}

impl Fuzzel {
    #[must_use]
    pub fn new() -> Self { Self { core: PluginCore::new(NAME, ".config/fuzzel", TEMPLATES) } }
}

impl Default for Fuzzel {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Fuzzel {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate fuzzel launcher colours" }

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

impl Verbose for Fuzzel {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Fuzzel {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("fuzzel") {
            return Ok(skip);
        }
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::{CategorisedPalette, ColourRole, ThemeType};

    #[test]
    fn colours_have_no_hash_and_carry_alpha() {
        let palette = CategorisedPalette::new(ThemeType::Dark).with(ColourRole::Background, "#112233").unwrap();
        let files = Fuzzel::new().generate(Some(&ThemeData::new(palette))).unwrap();
        let ini = String::from_utf8(files[THEME_FILE].clone()).unwrap();

        assert!(ini.contains("background=112233f2"));
        assert!(ini.lines().filter(|line| line.contains('=') && !line.starts_with('#')).all(|line| !line.contains("=#")));
    }
}
