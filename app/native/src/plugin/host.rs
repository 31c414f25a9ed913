//! Drives the plugin lifecycle for one `generate` run.
//!
//! Plugins run one after another. For each selected plugin the host sets
//! verbosity, validates, runs the pre-execute hook, generates, writes the
//! file set (or only plans it in dry-run mode), and finally runs the
//! post-execute hook on the written files. Hooks are bounded by timeouts;
//! a hook that overruns is dropped, which also kills any child process it
//! spawned.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{
    CapabilitySet, Entry, ExecutionContext, FileSet, OutputPlugin, PluginError,
    PreExecuteOutcome, Registry,
};
use crate::colour::ThemeData;

pub const DEFAULT_PRE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_POST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOptions {
    pub dry_run: bool,
    pub verbose: bool,
    pub wallpaper_path: Option<PathBuf>,
    pub pre_timeout: Duration,
    pub post_timeout: Duration,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            verbose: false,
            wallpaper_path: None,
            pre_timeout: DEFAULT_PRE_TIMEOUT,
            post_timeout: DEFAULT_POST_TIMEOUT,
        }
    }
}

/// What happened to one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Files were written to disk.
    Written(Vec<PathBuf>),
    /// Dry run: files that would have been written, with their sizes.
    Planned(Vec<(PathBuf, usize)>),
    /// The pre-execute hook declined to run the plugin.
    Skipped(String),
    Failed(String),
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool { matches!(self, Self::Written(_) | Self::Planned(_)) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginReport {
    pub plugin: &'static str,
    pub output_dir: PathBuf,
    pub outcome: Outcome,
}

/// Per-plugin results of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub dry_run: bool,
    pub reports: Vec<PluginReport>,
}

impl RunSummary {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|report| report.outcome.is_success()).count()
    }

    /// A run succeeds when at least one plugin succeeded. Dry runs always succeed.
    #[must_use]
    pub fn is_success(&self) -> bool { self.dry_run || self.succeeded() > 0 }
}

/// Runs the selected plugins against `data`.
///
/// Names not present in the registry are ignored; resolve the selection
/// with [`Registry::select`] first.
pub async fn run(
    registry: &mut Registry,
    selection: &[&str],
    data: &ThemeData,
    options: &HostOptions,
) -> RunSummary {
    let mut summary = RunSummary { dry_run: options.dry_run, reports: Vec::new() };

    for name in selection {
        let Some(entry) = registry.get_mut(name) else {
            tracing::warn!(plugin = name, "skipping unregistered plugin");
            continue;
        };
        summary.reports.push(run_plugin(entry, data, options).await);
    }

    summary
}

async fn run_plugin(entry: &mut Entry, data: &ThemeData, options: &HostOptions) -> PluginReport {
    let capabilities = entry.capabilities;
    if capabilities.verbose
        && let Some(verbose) = entry.plugin.as_verbose()
    {
        verbose.set_verbose(options.verbose);
    }

    let plugin = entry.plugin.as_ref();
    let ctx = ExecutionContext {
        dry_run: options.dry_run,
        verbose: options.verbose,
        output_dir: plugin.default_output_dir(),
        wallpaper_path: options.wallpaper_path.clone(),
    };

    let outcome = drive(plugin, capabilities, data, &ctx, options).await;
    match &outcome {
        Outcome::Written(files) => {
            tracing::info!(plugin = plugin.name(), files = files.len(), "generated theme files");
        }
        Outcome::Planned(files) => {
            tracing::info!(plugin = plugin.name(), files = files.len(), "dry run, nothing written");
        }
        Outcome::Skipped(reason) => tracing::info!(plugin = plugin.name(), %reason, "skipped"),
        Outcome::Failed(reason) => tracing::warn!(plugin = plugin.name(), %reason, "plugin failed"),
    }

    PluginReport { plugin: plugin.name(), output_dir: ctx.output_dir, outcome }
}

async fn drive(
    plugin: &dyn OutputPlugin,
    capabilities: CapabilitySet,
    data: &ThemeData,
    ctx: &ExecutionContext,
    options: &HostOptions,
) -> Outcome {
    if let Err(err) = plugin.validate() {
        return Outcome::Failed(format!("validation failed: {err}"));
    }

    if capabilities.pre_execute
        && let Some(hook) = plugin.as_pre_execute()
    {
        match tokio::time::timeout(options.pre_timeout, hook.pre_execute(ctx)).await {
            Ok(Ok(PreExecuteOutcome::Proceed)) => {}
            Ok(Ok(PreExecuteOutcome::Skip(reason))) => return Outcome::Skipped(reason),
            Ok(Err(err)) => return Outcome::Failed(format!("pre-execute hook failed: {err}")),
            Err(_) => {
                return Outcome::Failed(format!(
                    "pre-execute hook timed out after {}s",
                    options.pre_timeout.as_secs_f32()
                ));
            }
        }
    }

    let files = match plugin.generate(Some(data)) {
        Ok(files) => files,
        Err(err) => return Outcome::Failed(format!("generation failed: {err}")),
    };

    if ctx.dry_run {
        return Outcome::Planned(
            files.iter().map(|(name, content)| (ctx.output_dir.join(name), content.len())).collect(),
        );
    }

    let written = match write_files(&ctx.output_dir, &files) {
        Ok(written) => written,
        Err(err) => return Outcome::Failed(format!("write failed: {err}")),
    };

    if capabilities.post_execute
        && !written.is_empty()
        && let Some(hook) = plugin.as_post_execute()
    {
        match tokio::time::timeout(options.post_timeout, hook.post_execute(ctx, &written)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(plugin = plugin.name(), error = %err, "post-execute hook failed");
            }
            Err(_) => tracing::warn!(
                plugin = plugin.name(),
                timeout_secs = options.post_timeout.as_secs_f32(),
                "post-execute hook timed out"
            ),
        }
    }

    Outcome::Written(written)
}

fn write_files(dir: &Path, files: &FileSet) -> Result<Vec<PathBuf>, PluginError> {
    fs::create_dir_all(dir).map_err(|err| PluginError::Io {
        context: format!("failed to create {}", dir.display()),
        source: err,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content).map_err(|err| PluginError::Io {
            context: format!("failed to write {}", path.display()),
            source: err,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use clap::{ArgMatches, Command};
    use tempfile::TempDir;

    use super::*;
    use crate::colour::CategorisedPalette;
    use crate::plugin::{PostExecute, PreExecute, Verbose};

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Behaviour {
        Write,
        Skip,
        FailGenerate,
        HangPre,
    }

    struct Fake {
        name: &'static str,
        dir: PathBuf,
        behaviour: Behaviour,
        verbose: Arc<Mutex<Option<bool>>>,
        post_calls: Arc<Mutex<Vec<Vec<PathBuf>>>>,
    }

    impl Verbose for Fake {
        fn set_verbose(&mut self, verbose: bool) { *self.verbose.lock().unwrap() = Some(verbose); }
    }

    #[async_trait]
    impl PreExecute for Fake {
        async fn pre_execute(&self, _: &ExecutionContext) -> Result<PreExecuteOutcome, PluginError> {
            match self.behaviour {
                Behaviour::Skip => Ok(PreExecuteOutcome::Skip("tool missing".to_string())),
                Behaviour::HangPre => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(PreExecuteOutcome::Proceed)
                }
                _ => Ok(PreExecuteOutcome::Proceed),
            }
        }
    }

    #[async_trait]
    impl PostExecute for Fake {
        async fn post_execute(&self, _: &ExecutionContext, written: &[PathBuf]) -> Result<(), PluginError> {
            self.post_calls.lock().unwrap().push(written.to_vec());
            Ok(())
        }
    }

    impl OutputPlugin for Fake {
        fn name(&self) -> &'static str { self.name }

        fn description(&self) -> &'static str { "fake" }

        fn register_flags(&self, cmd: Command) -> Command { cmd }

        fn apply_flags(&mut self, _: &ArgMatches) {}

        fn set_output_dir(&mut self, _: Option<PathBuf>) {}

        fn default_output_dir(&self) -> PathBuf { self.dir.clone() }

        fn generate(&self, data: Option<&ThemeData>) -> Result<FileSet, PluginError> {
            data.ok_or(PluginError::NilInput)?;
            if self.behaviour == Behaviour::FailGenerate {
                return Err(PluginError::Validation("broken template".to_string()));
            }
            Ok(FileSet::from([
                ("a.conf".to_string(), b"a".to_vec()),
                ("b.conf".to_string(), b"bb".to_vec()),
            ]))
        }

        fn as_verbose(&mut self) -> Option<&mut dyn Verbose> { Some(self) }

        fn as_pre_execute(&self) -> Option<&dyn PreExecute> { Some(self) }

        fn as_post_execute(&self) -> Option<&dyn PostExecute> { Some(self) }
    }

    struct Harness {
        dir: TempDir,
        registry: Registry,
        verbose: Arc<Mutex<Option<bool>>>,
        post_calls: Arc<Mutex<Vec<Vec<PathBuf>>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                registry: Registry::new(),
                verbose: Arc::default(),
                post_calls: Arc::default(),
            }
        }

        fn add(&mut self, name: &'static str, behaviour: Behaviour) {
            let plugin = Fake {
                name,
                dir: self.dir.path().join(name),
                behaviour,
                verbose: Arc::clone(&self.verbose),
                post_calls: Arc::clone(&self.post_calls),
            };
            self.registry.register(Box::new(plugin)).unwrap();
        }

        async fn execute(&mut self, selection: &[&str], options: &HostOptions) -> RunSummary {
            let data = ThemeData::new(CategorisedPalette::default());
            run(&mut self.registry, selection, &data, options).await
        }
    }

    #[tokio::test]
    async fn writes_files_and_runs_post_hook() {
        let mut harness = Harness::new();
        harness.add("ok", Behaviour::Write);

        let options = HostOptions { verbose: true, ..HostOptions::default() };
        let summary = harness.execute(&["ok"], &options).await;

        let dir = harness.dir.path().join("ok");
        let expected = vec![dir.join("a.conf"), dir.join("b.conf")];
        assert_eq!(summary.reports[0].outcome, Outcome::Written(expected.clone()));
        assert_eq!(fs::read(dir.join("b.conf")).unwrap(), b"bb");
        assert_eq!(*harness.post_calls.lock().unwrap(), vec![expected]);
        assert_eq!(*harness.verbose.lock().unwrap(), Some(true));
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn dry_run_writes_nothing_and_skips_post_hook() {
        let mut harness = Harness::new();
        harness.add("ok", Behaviour::Write);

        let options = HostOptions { dry_run: true, ..HostOptions::default() };
        let summary = harness.execute(&["ok"], &options).await;

        let Outcome::Planned(planned) = &summary.reports[0].outcome else {
            panic!("expected a planned outcome");
        };
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[1].1, 2);
        assert!(!harness.dir.path().join("ok").exists());
        assert!(harness.post_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_run() {
        let mut harness = Harness::new();
        harness.add("broken", Behaviour::FailGenerate);
        harness.add("skipped", Behaviour::Skip);
        harness.add("ok", Behaviour::Write);

        let summary = harness.execute(&["broken", "skipped", "ok"], &HostOptions::default()).await;

        assert!(matches!(&summary.reports[0].outcome, Outcome::Failed(reason) if reason.contains("broken template")));
        assert_eq!(summary.reports[1].outcome, Outcome::Skipped("tool missing".to_string()));
        assert!(summary.reports[2].outcome.is_success());
        assert_eq!(summary.succeeded(), 1);
        assert!(summary.is_success());
        assert_eq!(harness.post_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn run_fails_when_nothing_succeeded() {
        let mut harness = Harness::new();
        harness.add("broken", Behaviour::FailGenerate);

        let summary = harness.execute(&["broken"], &HostOptions::default()).await;
        assert!(!summary.is_success());
    }

    #[tokio::test]
    async fn pre_hook_is_bounded_by_timeout() {
        let mut harness = Harness::new();
        harness.add("slow", Behaviour::HangPre);

        let options = HostOptions { pre_timeout: Duration::from_millis(20), ..HostOptions::default() };
        let summary = harness.execute(&["slow"], &options).await;
        assert!(matches!(&summary.reports[0].outcome, Outcome::Failed(reason) if reason.contains("timed out")));
    }
}
