//! Resolution of plugin templates with user overrides.
//!
//! Custom templates live under `<templates-dir>/<plugin>/<name>`. The
//! templates directory defaults to `templates/` inside the pigment config
//! directory and may be replaced once at startup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::TemplateError;
use crate::config;

/// Templates directory override (set from config or CLI).
static CUSTOM_TEMPLATES_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Replaces the default templates directory.
///
/// Returns `false` if a directory was already set.
pub fn set_custom_templates_dir(path: PathBuf) -> bool { CUSTOM_TEMPLATES_DIR.set(path).is_ok() }

/// The directory searched for custom templates.
#[must_use]
pub fn templates_dir() -> PathBuf {
    CUSTOM_TEMPLATES_DIR
        .get()
        .cloned()
        .unwrap_or_else(|| config::config_home().join("templates"))
}

/// A default template compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTemplate {
    pub name: &'static str,
    pub content: &'static str,
}

/// Raw template bytes and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    pub content: Vec<u8>,
    pub from_override: bool,
}

/// Listing entry for `templates list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub name: &'static str,
    pub custom_path: PathBuf,
    pub customised: bool,
}

/// Outcome of dumping embedded templates to the custom directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DumpReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Loads a plugin's templates, preferring custom files over embedded defaults.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    plugin: &'static str,
    embedded: &'static [EmbeddedTemplate],
    /// `None` follows [`templates_dir`] at the time of each lookup.
    base_dir: Option<PathBuf>,
}

impl TemplateLoader {
    /// Creates a loader rooted at the configured templates directory.
    #[must_use]
    pub const fn new(plugin: &'static str, embedded: &'static [EmbeddedTemplate]) -> Self {
        Self { plugin, embedded, base_dir: None }
    }

    /// Creates a loader rooted at an explicit templates directory.
    #[must_use]
    pub const fn with_base_dir(
        plugin: &'static str,
        embedded: &'static [EmbeddedTemplate],
        base_dir: PathBuf,
    ) -> Self {
        Self { plugin, embedded, base_dir: Some(base_dir) }
    }

    #[must_use]
    pub const fn plugin(&self) -> &'static str { self.plugin }

    /// Directory holding this plugin's custom templates.
    #[must_use]
    pub fn custom_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(templates_dir).join(self.plugin)
    }

    /// Where a custom version of `name` would live.
    #[must_use]
    pub fn custom_path(&self, name: &str) -> PathBuf { self.custom_dir().join(name) }

    /// Names of the embedded templates, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.embedded.iter().map(|template| template.name)
    }

    fn embedded(&self, name: &str) -> Option<&'static EmbeddedTemplate> {
        self.embedded.iter().find(|template| template.name == name)
    }

    /// Loads `name`, preferring a custom file when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Read`] if a custom file exists but cannot be
    /// read, or [`TemplateError::NotFound`] if there is neither a custom file
    /// nor an embedded default.
    pub fn load(&self, name: &str) -> Result<LoadedTemplate, TemplateError> {
        let path = self.custom_path(name);
        match fs::read(&path) {
            Ok(content) => {
                tracing::debug!(plugin = self.plugin, path = %path.display(), "using custom template");
                return Ok(LoadedTemplate { content, from_override: true });
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(TemplateError::Read { path, source: err }),
        }

        self.embedded(name)
            .map(|template| LoadedTemplate {
                content: template.content.as_bytes().to_vec(),
                from_override: false,
            })
            .ok_or_else(|| TemplateError::NotFound {
                plugin: self.plugin.to_string(),
                name: name.to_string(),
            })
    }

    /// Lists every embedded template and whether it is overridden.
    #[must_use]
    pub fn list(&self) -> Vec<TemplateInfo> {
        self.embedded
            .iter()
            .map(|template| {
                let custom_path = self.custom_path(template.name);
                TemplateInfo { name: template.name, customised: custom_path.is_file(), custom_path }
            })
            .collect()
    }

    /// Writes the embedded default of `name` to its custom location.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown, the file exists and
    /// `force` is not set, or the file cannot be written.
    pub fn dump(&self, name: &str, force: bool) -> Result<PathBuf, TemplateError> {
        let template = self.embedded(name).ok_or_else(|| TemplateError::NotFound {
            plugin: self.plugin.to_string(),
            name: name.to_string(),
        })?;
        let path = self.custom_path(name);

        if path.exists() && !force {
            return Err(TemplateError::AlreadyExists(path));
        }

        write_template(&path, template.content)?;
        Ok(path)
    }

    /// Dumps every embedded template, skipping existing files unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    pub fn dump_all(&self, force: bool) -> Result<DumpReport, TemplateError> {
        let mut report = DumpReport::default();
        for template in self.embedded {
            match self.dump(template.name, force) {
                Ok(path) => report.written.push(path),
                Err(TemplateError::AlreadyExists(path)) => report.skipped.push(path),
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }
}

fn write_template(path: &Path, content: &str) -> Result<(), TemplateError> {
    let write_err = |err| TemplateError::Write { path: path.to_path_buf(), source: err };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, content).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const EMBEDDED: &[EmbeddedTemplate] = &[
        EmbeddedTemplate { name: "a.conf", content: "embedded a" },
        EmbeddedTemplate { name: "b.conf", content: "embedded b" },
    ];

    fn loader(dir: &TempDir) -> TemplateLoader {
        TemplateLoader::with_base_dir("demo", EMBEDDED, dir.path().to_path_buf())
    }

    #[test]
    fn test_load_falls_back_to_embedded() {
        let dir = TempDir::new().unwrap();
        let loaded = loader(&dir).load("a.conf").unwrap();
        assert_eq!(loaded.content, b"embedded a");
        assert!(!loaded.from_override);
    }

    #[test]
    fn test_load_prefers_custom_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("demo")).unwrap();
        fs::write(dir.path().join("demo/a.conf"), "custom a").unwrap();

        let loaded = loader(&dir).load("a.conf").unwrap();
        assert_eq!(loaded.content, b"custom a");
        assert!(loaded.from_override);
    }

    #[test]
    fn test_load_unknown_template() {
        let dir = TempDir::new().unwrap();
        let err = loader(&dir).load("missing.conf").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
    }

    #[test]
    fn test_custom_path_layout() {
        let dir = TempDir::new().unwrap();
        assert_eq!(loader(&dir).custom_path("b.conf"), dir.path().join("demo").join("b.conf"));
    }

    #[test]
    fn test_dump_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let loader = loader(&dir);

        let path = loader.dump("a.conf", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "embedded a");

        fs::write(&path, "edited").unwrap();
        assert!(matches!(loader.dump("a.conf", false), Err(TemplateError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "edited");

        loader.dump("a.conf", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "embedded a");
    }

    #[test]
    fn test_dump_all_reports_skipped() {
        let dir = TempDir::new().unwrap();
        let loader = loader(&dir);
        loader.dump("b.conf", false).unwrap();

        let report = loader.dump_all(false).unwrap();
        assert_eq!(report.written, vec![loader.custom_path("a.conf")]);
        assert_eq!(report.skipped, vec![loader.custom_path("b.conf")]);
    }

    #[test]
    fn test_list_marks_customised_templates() {
        let dir = TempDir::new().unwrap();
        let loader = loader(&dir);
        loader.dump("b.conf", false).unwrap();

        let listing = loader.list();
        assert_eq!(listing.len(), 2);
        assert!(!listing[0].customised);
        assert!(listing[1].customised);
    }
}
