//! State and helpers shared by the bundled plugins.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgMatches, Command};

use super::{FileSet, PluginError, PreExecuteOutcome};
use crate::colour::ThemeData;
use crate::platform;
use crate::template::{EmbeddedTemplate, Template, TemplateLoader};

/// Name of the output directory flag for `plugin`.
#[must_use]
pub fn output_dir_flag(plugin: &str) -> String { format!("{plugin}.output-dir") }

/// `subpath` under the home directory, or `subpath` itself when there is no home.
#[must_use]
pub fn home_relative(subpath: &str) -> PathBuf { home_relative_in(dirs::home_dir().as_deref(), subpath) }

/// [`home_relative`] against an explicit home directory.
#[must_use]
pub fn home_relative_in(home: Option<&Path>, subpath: &str) -> PathBuf {
    home.map_or_else(|| PathBuf::from(subpath), |home| home.join(subpath))
}

/// Creates `dir` (and parents), skipping instead of failing.
///
/// In dry-run mode nothing is created.
#[must_use]
pub fn ensure_dir(dir: &Path, dry_run: bool) -> PreExecuteOutcome {
    if dry_run {
        return PreExecuteOutcome::Proceed;
    }

    match fs::create_dir_all(dir) {
        Ok(()) => PreExecuteOutcome::Proceed,
        Err(err) => PreExecuteOutcome::Skip(format!(
            "cannot create config directory {}: {err}",
            dir.display()
        )),
    }
}

/// Verbose-aware diagnostics for one plugin.
///
/// Notes go to `info` when the run is verbose and to `debug` otherwise, so
/// `RUST_LOG` can still surface them.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    plugin: &'static str,
    verbose: bool,
}

impl Diagnostics {
    #[must_use]
    pub const fn new(plugin: &'static str) -> Self { Self { plugin, verbose: false } }

    #[must_use]
    pub const fn verbose(&self) -> bool { self.verbose }

    pub const fn set_verbose(&mut self, verbose: bool) { self.verbose = verbose; }

    pub fn note(&self, message: impl Display) {
        if self.verbose {
            tracing::info!(plugin = self.plugin, "{message}");
        } else {
            tracing::debug!(plugin = self.plugin, "{message}");
        }
    }
}

/// Identity, output location, verbosity, and templates of a plugin.
#[derive(Debug, Clone)]
pub struct PluginCore {
    name: &'static str,
    default_subdir: &'static str,
    output_dir: Option<PathBuf>,
    diagnostics: Diagnostics,
    templates: TemplateLoader,
}

impl PluginCore {
    #[must_use]
    pub fn new(
        name: &'static str,
        default_subdir: &'static str,
        templates: &'static [EmbeddedTemplate],
    ) -> Self {
        Self::with_loader(default_subdir, TemplateLoader::new(name, templates))
    }

    /// Uses an explicit loader, e.g. one rooted in a temporary directory.
    #[must_use]
    pub fn with_loader(default_subdir: &'static str, templates: TemplateLoader) -> Self {
        let name = templates.plugin();
        Self {
            name,
            default_subdir,
            output_dir: None,
            diagnostics: Diagnostics::new(name),
            templates,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str { self.name }

    #[must_use]
    pub const fn templates(&self) -> &TemplateLoader { &self.templates }

    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics { &self.diagnostics }

    pub const fn set_verbose(&mut self, verbose: bool) { self.diagnostics.set_verbose(verbose); }

    pub fn register_flags(&self, cmd: Command) -> Command {
        let flag = output_dir_flag(self.name);
        cmd.arg(
            Arg::new(flag.clone())
                .long(flag)
                .value_name("DIR")
                .default_value("")
                .hide_default_value(true)
                .help(format!("Output directory for {} (default: ~/{})", self.name, self.default_subdir)),
        )
    }

    /// An empty flag leaves the current directory in place, so values set
    /// earlier from configuration survive.
    pub fn apply_flags(&mut self, matches: &ArgMatches) {
        let value = matches.try_get_one::<String>(&output_dir_flag(self.name)).ok().flatten();
        if let Some(dir) = value.filter(|dir| !dir.is_empty()) {
            self.set_output_dir(Some(platform::expand(dir)));
        }
    }

    /// Empty paths count as unset.
    pub fn set_output_dir(&mut self, dir: Option<PathBuf>) {
        self.output_dir = dir.filter(|dir| !dir.as_os_str().is_empty());
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| home_relative(self.default_subdir))
    }

    /// Loads, parses, and renders one template.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Template`] tagged with the failing phase.
    pub fn render(&self, template: &str, data: &ThemeData) -> Result<Vec<u8>, PluginError> {
        let tag = |err| PluginError::template(template, err);

        let loaded = self.templates.load(template).map_err(tag)?;
        if loaded.from_override {
            self.diagnostics.note(format_args!(
                "using custom template {}",
                self.templates.custom_path(template).display()
            ));
        }

        Template::parse(template, &loaded.content).and_then(|parsed| parsed.render(data)).map_err(tag)
    }

    /// Renders `(file name, template)` pairs into a complete file set.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NilInput`] for `None` and the first template
    /// failure otherwise; no partial set is returned.
    pub fn render_all(
        &self,
        data: Option<&ThemeData>,
        files: &[(&str, &str)],
    ) -> Result<FileSet, PluginError> {
        let data = data.ok_or(PluginError::NilInput)?;
        files
            .iter()
            .map(|(file, template)| self.render(template, data).map(|bytes| ((*file).to_string(), bytes)))
            .collect()
    }

    /// Skips when `binary` is not installed.
    #[must_use]
    pub fn require_binary(&self, binary: &str) -> Option<PreExecuteOutcome> {
        if platform::binary_exists(binary) {
            None
        } else {
            Some(PreExecuteOutcome::Skip(format!("{binary} not found on $PATH")))
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::colour::CategorisedPalette;

    const TEMPLATES: &[EmbeddedTemplate] = &[
        EmbeddedTemplate { name: "ok.tmpl", content: "bg={{ hex background }}\n" },
        EmbeddedTemplate { name: "broken.tmpl", content: "{{ nope }}" },
    ];

    fn demo_core(dir: &TempDir) -> PluginCore {
        PluginCore::with_loader(
            ".config/demo",
            TemplateLoader::with_base_dir("demo", TEMPLATES, dir.path().to_path_buf()),
        )
    }

    #[test]
    fn test_output_dir_flag_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut core = demo_core(&dir);
        let cmd = core.register_flags(Command::new("generate"));

        let matches = cmd.clone().try_get_matches_from(["generate", "--demo.output-dir", "/tmp/out"]).unwrap();
        core.apply_flags(&matches);
        assert_eq!(core.output_dir(), PathBuf::from("/tmp/out"));

        let matches = cmd.try_get_matches_from(["generate"]).unwrap();
        core.apply_flags(&matches);
        assert_eq!(core.output_dir(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_home_relative_without_home_is_still_a_path() {
        assert_eq!(home_relative_in(None, ".config/demo"), PathBuf::from(".config/demo"));
        assert_eq!(
            home_relative_in(Some(Path::new("/home/ada")), ".config/demo"),
            PathBuf::from("/home/ada/.config/demo")
        );
    }

    #[test]
    fn test_unset_flag_keeps_default() {
        let dir = TempDir::new().unwrap();
        let mut core = demo_core(&dir);
        let matches = core.register_flags(Command::new("generate")).try_get_matches_from(["generate"]).unwrap();
        core.apply_flags(&matches);
        assert!(core.output_dir().ends_with(".config/demo"));
    }

    #[test]
    fn test_empty_output_dir_means_default() {
        let dir = TempDir::new().unwrap();
        let mut core = demo_core(&dir);
        core.set_output_dir(Some(PathBuf::new()));
        assert!(core.output_dir().ends_with(".config/demo"));
    }

    #[test]
    fn test_render_all_requires_data() {
        let dir = TempDir::new().unwrap();
        let err = demo_core(&dir).render_all(None, &[("ok", "ok.tmpl")]).unwrap_err();
        assert!(matches!(err, PluginError::NilInput));
    }

    #[test]
    fn test_render_all_never_returns_partial_sets() {
        let dir = TempDir::new().unwrap();
        let data = ThemeData::new(CategorisedPalette::default());
        let err = demo_core(&dir)
            .render_all(Some(&data), &[("ok", "ok.tmpl"), ("broken", "broken.tmpl")])
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to parse broken.tmpl template"));
    }

    #[test]
    fn test_render_reports_missing_template_as_load_failure() {
        let dir = TempDir::new().unwrap();
        let data = ThemeData::new(CategorisedPalette::default());
        let err = demo_core(&dir).render("missing.tmpl", &data).unwrap_err();
        assert!(err.to_string().starts_with("failed to load missing.tmpl template"));
    }

    #[test]
    fn test_ensure_dir_creates_and_skips() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a/b");
        assert_eq!(ensure_dir(&target, false), PreExecuteOutcome::Proceed);
        assert!(target.is_dir());

        let blocked = dir.path().join("file");
        fs::write(&blocked, "x").unwrap();
        assert!(matches!(ensure_dir(&blocked.join("sub"), false), PreExecuteOutcome::Skip(_)));
    }

    #[test]
    fn test_ensure_dir_is_inert_in_dry_run() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("never");
        assert_eq!(ensure_dir(&target, true), PreExecuteOutcome::Proceed);
        assert!(!target.exists());
    }
}
