//! End-to-end runs of the plugin host with real plugins.
//!
//! External commands go through a scripted runner, so nothing here touches
//! a running desktop session.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pigment_lib::colour::{CategorisedPalette, ColourRole, ThemeData, ThemeType};
use pigment_lib::platform::{CommandError, CommandOutput, CommandRunner, ProcessSignaller, ReloadSignal, SignalError};
use pigment_lib::plugin::host::{self, HostOptions, Outcome};
use pigment_lib::plugin::{OutputPlugin, Registry};
use pigment_lib::plugins::{hyprpaper, kitty};
use pigment_lib::template::TemplateLoader;
use tempfile::TempDir;

/// Answers like a healthy hyprpaper with one monitor and records every call.
#[derive(Default)]
struct Scripted {
    calls: Mutex<Vec<String>>,
}

impl Scripted {
    fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }
}

#[async_trait]
impl CommandRunner for Scripted {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(format!("{program} {}", args.join(" ")));
        match args {
            ["hyprpaper", "listactive"] => Ok(CommandOutput::new("DP-1 = /walls/old.png\n")),
            _ => Ok(CommandOutput::new("")),
        }
    }
}

/// Pretends no application is running.
struct NothingRunning;

impl ProcessSignaller for NothingRunning {
    fn signal_by_name(&self, _name: &str, _signal: ReloadSignal) -> Result<usize, SignalError> { Ok(0) }
}

struct Fixture {
    templates: TempDir,
    out: TempDir,
    runner: Arc<Scripted>,
    registry: Registry,
}

impl Fixture {
    fn new() -> Self {
        let templates = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let runner = Arc::new(Scripted::default());

        let mut paper = hyprpaper::Hyprpaper::with_loader(
            TemplateLoader::with_base_dir(hyprpaper::NAME, hyprpaper::TEMPLATES, templates.path().to_path_buf()),
            runner.clone(),
        );
        paper.set_output_dir(Some(out.path().join("hypr")));

        let mut term = kitty::Kitty::with_loader(
            TemplateLoader::with_base_dir(kitty::NAME, kitty::TEMPLATES, templates.path().to_path_buf()),
            Arc::new(NothingRunning),
        );
        term.set_output_dir(Some(out.path().join("kitty")));

        let mut registry = Registry::new();
        registry.register(Box::new(paper)).unwrap();
        registry.register(Box::new(term)).unwrap();

        Self { templates, out, runner, registry }
    }

    fn templates_dir(&self) -> PathBuf { self.templates.path().to_path_buf() }

    fn run(&mut self, selection: &[&str], options: &HostOptions) -> host::RunSummary {
        let data = ThemeData::new(
            CategorisedPalette::new(ThemeType::Dark).with(ColourRole::Accent1, "#ff8800").unwrap(),
        )
        .with_wallpaper(options.wallpaper_path.clone());

        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(host::run(&mut self.registry, selection, &data, options))
    }
}

#[test]
fn writes_files_and_applies_wallpaper() {
    let mut fixture = Fixture::new();
    let options = HostOptions { wallpaper_path: Some(PathBuf::from("/walls/new.png")), ..HostOptions::default() };

    let summary = fixture.run(&["hyprpaper"], &options);
    assert!(summary.is_success());

    let config = fs::read_to_string(fixture.out.path().join("hypr").join(hyprpaper::CONFIG_FILE)).unwrap();
    assert!(config.contains("preload = /walls/new.png"));

    assert_eq!(
        fixture.runner.calls(),
        vec![
            "hyprctl hyprpaper listloaded",
            "hyprctl hyprpaper listactive",
            "hyprctl hyprpaper unload all",
            "hyprctl hyprpaper preload /walls/new.png",
            "hyprctl hyprpaper wallpaper DP-1,/walls/new.png",
        ]
    );
}

#[test]
fn dry_run_writes_nothing_and_runs_no_post_hooks() {
    let mut fixture = Fixture::new();
    let options = HostOptions {
        dry_run: true,
        wallpaper_path: Some(PathBuf::from("/walls/new.png")),
        ..HostOptions::default()
    };

    let summary = fixture.run(&["hyprpaper"], &options);
    assert!(summary.is_success());
    assert!(matches!(&summary.reports[0].outcome, Outcome::Planned(files) if files.len() == 1));
    assert!(!fixture.out.path().join("hypr").exists());
    assert!(fixture.runner.calls().is_empty());
}

#[test]
fn broken_template_fails_the_plugin_and_the_run() {
    let mut fixture = Fixture::new();
    let custom = fixture.templates_dir().join(hyprpaper::NAME);
    fs::create_dir_all(&custom).unwrap();
    fs::write(custom.join("pigment-hyprpaper.conf.tmpl"), "{{ shout background }}\n").unwrap();

    let summary = fixture.run(&["hyprpaper"], &HostOptions::default());
    assert!(!summary.is_success());
    match &summary.reports[0].outcome {
        Outcome::Failed(reason) => assert!(reason.contains("failed to parse pigment-hyprpaper.conf.tmpl template")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!fixture.out.path().join("hypr").join(hyprpaper::CONFIG_FILE).exists());
}

#[test]
fn one_failure_does_not_sink_the_others() {
    let mut fixture = Fixture::new();
    let custom = fixture.templates_dir().join(hyprpaper::NAME);
    fs::create_dir_all(&custom).unwrap();
    fs::write(custom.join("pigment-hyprpaper.conf.tmpl"), "{{ wallpaper }}\n").unwrap();

    // kitty is skipped or written depending on whether it is installed; either
    // way hyprpaper's execute error must not stop it from being attempted.
    let summary = fixture.run(&["hyprpaper", "kitty"], &HostOptions::default());
    assert_eq!(summary.reports.len(), 2);
    assert!(matches!(summary.reports[0].outcome, Outcome::Failed(_)));
    assert_eq!(summary.reports[1].plugin, "kitty");
    assert!(matches!(summary.reports[1].outcome, Outcome::Written(_) | Outcome::Skipped(_)));
}
