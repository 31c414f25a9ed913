//! hyprpaper wallpaper daemon.
//!
//! Writes a hyprpaper configuration and, when a wallpaper is supplied,
//! pushes it to the running daemon through [`reconcile`].

pub mod reconcile;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clap::{ArgMatches, Command};

pub use self::reconcile::{ApplyReport, ReconcileError};
use crate::colour::ThemeData;
use crate::platform::{self, CommandRunner, SystemRunner};
use crate::plugin::{
    ExecutionContext, FileSet, OutputPlugin, PluginCore, PluginError, PostExecute, PreExecute,
    PreExecuteOutcome, Verbose, ensure_dir,
};
use crate::template::{EmbeddedTemplate, TemplateLoader};

pub const NAME: &str = "hyprpaper";
pub const CONFIG_FILE: &str = "pigment-hyprpaper.conf";
const CONFIG_TEMPLATE: &str = "pigment-hyprpaper.conf.tmpl";

pub const TEMPLATES: &[EmbeddedTemplate] = &[EmbeddedTemplate {
    name: CONFIG_TEMPLATE,
    content: include_str!("../../../templates/hyprpaper/pigment-hyprpaper.conf.tmpl"),
}];

pub struct Hyprpaper {
    core: PluginCore,
    runner: Arc<dyn CommandRunner>,
}

impl Hyprpaper {
    #[must_use]
    pub fn new() -> Self { Self::with_runner(Arc::new(SystemRunner)) }

    #[must_use]
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self { core: PluginCore::new(NAME, ".config/hypr", TEMPLATES), runner }
    }

    /// Uses an explicit template loader, e.g. one rooted in a temporary directory.
    #[must_use]
    pub fn with_loader(loader: TemplateLoader, runner: Arc<dyn CommandRunner>) -> Self {
        Self { core: PluginCore::with_loader(".config/hypr", loader), runner }
    }

    /// Pushes `wallpaper` to the daemon if it is running.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Preload`] if the daemon rejects the image.
    pub async fn apply_wallpaper(&self, wallpaper: &Path) -> Result<Option<ApplyReport>, ReconcileError> {
        let diagnostics = self.core.diagnostics();

        if !reconcile::daemon_running(self.runner.as_ref()).await {
            diagnostics.note("skipping wallpaper (hyprpaper not running)");
            return Ok(None);
        }

        let absolute = match platform::absolute(wallpaper) {
            Ok(path) => path,
            Err(err) => {
                diagnostics.note(format_args!("skipping wallpaper {}: {err}", wallpaper.display()));
                return Ok(None);
            }
        };

        let report = reconcile::reconcile(self.runner.as_ref(), &absolute, diagnostics).await?;
        diagnostics.note(format_args!(
            "set wallpaper on {}/{} target(s) ({}): {}",
            report.applied,
            report.targets.len(),
            report.describe_targets(),
            absolute.display()
        ));
        Ok(Some(report))
    }
}

impl Default for Hyprpaper {
    fn default() -> Self { Self::new() }
}

impl OutputPlugin for Hyprpaper {
    fn name(&self) -> &'static str { NAME }

    fn description(&self) -> &'static str { "Generate hyprpaper configuration and apply the wallpaper live" }

    fn register_flags(&self, cmd: Command) -> Command { self.core.register_flags(cmd) }

    fn apply_flags(&mut self, matches: &ArgMatches) { self.core.apply_flags(matches); }

    fn set_output_dir(&mut self, dir: Option<PathBuf>) { self.core.set_output_dir(dir); }

    fn default_output_dir(&self) -> PathBuf { self.core.output_dir() }

    fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
        self.core.render_all(data, &[(CONFIG_FILE, CONFIG_TEMPLATE)])
    }

    fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

    fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }

    fn as_post_execute(&self) -> Option<&dyn PostExecute> { Some(self) }
}

impl Verbose for Hyprpaper {
    fn set_verbose(&mut self, verbose: bool) { self.core.set_verbose(verbose); }
}

#[async_trait]
impl PreExecute for Hyprpaper {
    async fn pre_execute(&self, ctx: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
        Ok(ensure_dir(&ctx.output_dir, ctx.dry_run))
    }
}

#[async_trait]
impl PostExecute for Hyprpaper {
    async fn post_execute(&self, ctx: &ExecutionContext, _written: &[PathBuf]) -> Result<(), PluginError> {
        let Some(wallpaper) = ctx.wallpaper_path.as_deref() else {
            return Ok(());
        };

        if let Err(err) = self.apply_wallpaper(wallpaper).await {
            self.core.diagnostics().note(format_args!("failed to set wallpaper: {err}"));
        }
        Ok(())
    }
}
