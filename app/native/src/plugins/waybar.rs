//! waybar status bar.
//!
//! Writes a colour definition sheet plus a stylesheet that imports it.
//! Unlike the other plugins, waybar's config directory is never created:
//! a missing directory means waybar is not set up for this user.
//!
//! `SIGUSR2` makes waybar reload its whole configuration, so running bars
//! are only reloaded when the `reload` config key lists `waybar`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::signal_processes;
use crate::colour::ThemeData;
use crate::platform::{ProcessSignaller, ReloadSignal, SystemSignaller};
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PostExecute, PreExecute,
    PreExecuteOutcome, Verbose,
};
use crate::template::{EmbeddedTemplate, TemplateLoader};

pub const NAME: &str = "waybar";
pub const COLOURS_FILE: &str = "pigment-colours.css";
pub const STYLE_FILE: &str = "pigment.css";

pub const TEMPLATES: &[EmbeddedTemplate] = &[
    EmbeddedTemplate {
        name: "pigment-colours.css.tmpl",
        content: include_str!("../../templates/waybar/pigment-colours.css.tmpl"),
    },
    EmbeddedTemplate {
        name: "pigment.css.tmpl",
        content: include_str!("../../templates/waybar/pigment.css.tmpl"),
    },
];

const DEFAULT_SUBDIR: &str = ".config/waybar";

pub struct Waybar {
    core: PluginCore,
    signaller: Arc<dyn ProcessSignaller>,
    reload: bool,
}

impl Waybar {
    #[must_use]
    pub fn new() -> Self { Self::with_signaller(Arc::new(SystemSignaller)) }

    #[must_use]
    pub fn with_signaller(signaller: Arc<dyn ProcessSignaller>) -> Self {
        Self { core: PluginCore::new(NAME, DEFAULT_SUBDIR, TEMPLATES), signaller, reload: false }
    }

    #[must_use]
    pub fn with_loader(templates: TemplateLoader, signaller: Arc<dyn ProcessSignaller>) -> Self {
        Self { core: PluginCore::with_loader(DEFAULT_SUBDIR, templates), signaller, reload: false }
    }
}

impl Default for Waybar {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Waybar {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate waybar colour definitions and stylesheet" }

    fn register_flags(&self, cmd: Command) -> Command { self.core.register_flags(cmd) }

    fn apply_flags(&mut self, matches: &ArgMatches) { self.core.apply_flags(matches); }

    fn set_output_dir(&mut self, dir: Option<PathBuf>) { self.core.set_output_dir(dir); }

    fn set_reload(&mut self, enabled: bool) { self.reload = enabled; }

    fn default_output_dir(&self) -> PathBuf { self.core.output_dir() }

    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
        self.core.render_all(
            data,
            &[(COLOURS_FILE, "pigment-colours.css.tmpl"), (STYLE_FILE, "pigment.css.tmpl")],
        )
    }

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }

    fn as_post_execute(&self) -> Option<&dyn PostExecute> { Some(self) }
}

impl Verbose for Waybar {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Waybar {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        if let Some(skip) = self.core.require_binary("waybar") {
            return Ok(skip);
        }
        if !ctx.output_dir.is_dir() {
            return Ok(PreExecuteOutcome::Skip(format!(
                "waybar config directory does not exist: {}",
                ctx.output_dir.display()
            )));
        }
        Ok(PreExecuteOutcome::Proceed)
    }
}

#[async_trait]
impl PostExecute for Waybar {
    async fn post_execute(&self, _ctx: &ExecutionContext, _written: &[PathBuf]) -> Result<(), PluginError> {
        if self.reload {
            signal_processes(self.signaller.as_ref(), self.core.diagnostics(), ReloadSignal::User2, "waybar");
        } else {
            self.core.diagnostics().note("reload not enabled; running bars keep their old colours");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;
    use crate::colour::CategorisedPalette;
    use crate::platform::SignalError;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, ReloadSignal)>>,
    }

    impl ProcessSignaller for Recorder {
        fn signal_by_name(&self, name: &str, signal: ReloadSignal) -> Result<usize, SignalError> {
            self.sent.lock().unwrap().push((name.to_string(), signal));
            Ok(1)
        }
    }

    fn waybar(templates: &TempDir, signaller: Arc<Recorder>) -> Waybar {
        Waybar::with_loader(TemplateLoader::with_base_dir(NAME, TEMPLATES, templates.path().to_path_buf()), signaller)
    }

    #[test]
    fn stylesheet_imports_colour_sheet() {
        let templates = TempDir::new().unwrap();
        let files = waybar(&templates, Arc::default())
            .generate(Some(&ThemeData::new(CategorisedPalette::default())))
            .unwrap();
        let style = String::from_utf8(files[STYLE_FILE].clone()).unwrap();
        let colours = String::from_utf8(files[COLOURS_FILE].clone()).unwrap();

        assert!(style.contains(&format!("@import \"{COLOURS_FILE}\";")));
        assert!(colours.contains("@define-color background-alpha rgba(26,27,38,0.851);"));
    }

    #[tokio::test]
    async fn missing_config_dir_is_skipped_not_created() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("waybar");
        let ctx = ExecutionContext { output_dir: missing.clone(), ..ExecutionContext::default() };

        let outcome = waybar(&dir, Arc::default()).pre_execute(&ctx).await.unwrap();
        assert!(matches!(outcome, PreExecuteOutcome::Skip(_)));
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn running_bars_are_left_alone_by_default() {
        let templates = TempDir::new().unwrap();
        let signaller = Arc::new(Recorder::default());

        waybar(&templates, signaller.clone()).post_execute(&ExecutionContext::default(), &[]).await.unwrap();
        assert!(signaller.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enabled_reload_sends_usr2() {
        let templates = TempDir::new().unwrap();
        let signaller = Arc::new(Recorder::default());
        let mut plugin = waybar(&templates, signaller.clone());
        plugin.set_reload(true);

        plugin.post_execute(&ExecutionContext::default(), &[]).await.unwrap();
        assert_eq!(*signaller.sent.lock().unwrap(), vec![("waybar".to_string(), ReloadSignal::User2)]);
    }
}
