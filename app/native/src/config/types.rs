//! Configuration types for Pigment.
//!
//! These types represent the structure of the `config.jsonc` file and are
//! used for JSON Schema generation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform;

/// Timeouts applied to plugin lifecycle hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HooksConfig {
    /// Seconds a pre-execution check may take before the plugin fails.
    /// Defaults to 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_timeout_secs: Option<u64>,

    /// Seconds a post-execution hook may take before it is abandoned.
    /// Defaults to 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_timeout_secs: Option<u64>,
}

impl HooksConfig {
    #[must_use]
    pub fn pre_timeout(&self) -> Option<Duration> { self.pre_timeout_secs.map(Duration::from_secs) }

    #[must_use]
    pub fn post_timeout(&self) -> Option<Duration> { self.post_timeout_secs.map(Duration::from_secs) }
}

/// Root configuration structure for Pigment.
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PigmentConfig {
    /// Plugins to run when `generate` is given neither `--plugins` nor `--all`.
    /// An empty list runs every plugin.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    /// Output directory per plugin name. `~` is expanded.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output_dirs: BTreeMap<String, String>,

    /// Directory holding custom templates, one subdirectory per plugin.
    /// Relative paths are taken from the pigment config directory.
    /// Defaults to `templates/` there.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<String>,

    /// Emit plugin diagnostics as if `--verbose` was passed.
    #[serde(default)]
    pub verbose: bool,

    /// Lifecycle hook timeouts.
    #[serde(default)]
    pub hooks: HooksConfig,

    /// Plugins allowed to reload their running application after writing.
    /// Only plugins whose reload is disruptive (waybar) consult this list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reload: Vec<String>,
}

impl PigmentConfig {
    /// Configured output directory for `plugin`, expanded.
    #[must_use]
    pub fn output_dir(&self, plugin: &str) -> Option<PathBuf> {
        self.output_dirs
            .get(plugin)
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| platform::expand(dir))
    }

    /// Whether `plugin` is listed under `reload`.
    #[must_use]
    pub fn reloads(&self, plugin: &str) -> bool { self.reload.iter().any(|name| name == plugin) }

    /// Configured templates directory, expanded and anchored at [`config_home`].
    #[must_use]
    pub fn templates_dir(&self) -> Option<PathBuf> {
        self.templates_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| platform::expand_and_resolve(dir, &config_home()))
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at $XDG_CONFIG_HOME/pigment/config.jsonc or ~/.config/pigment/config.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Directories that may hold a `pigment` configuration, in priority order.
fn config_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        candidates.push(PathBuf::from(xdg_config).join("pigment"));
    }

    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".config").join("pigment");
        // XDG_CONFIG_HOME might be ~/.config
        if !candidates.contains(&dir) {
            candidates.push(dir);
        }
    }

    candidates
}

/// The preferred pigment configuration directory.
///
/// `$XDG_CONFIG_HOME/pigment` when set, otherwise `~/.config/pigment`.
#[must_use]
pub fn config_home() -> PathBuf {
    config_dirs().into_iter().next().unwrap_or_else(|| PathBuf::from(".config").join("pigment"))
}

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/pigment/config.jsonc` or `config.json`
/// 2. `~/.config/pigment/config.jsonc` or `config.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    config_dirs()
        .into_iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}

/// Loads the configuration from a specific path.
///
/// Comments (`//` and `/* */`) are stripped before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::Io` if it cannot be read, and `ConfigError::Parse` for
/// invalid JSON.
pub fn load_config_from_path(path: &Path) -> Result<(PigmentConfig, PathBuf), ConfigError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(ConfigError::NotFound),
        Err(err) => return Err(ConfigError::Io { path: path.to_path_buf(), source: err }),
    };

    let reader = json_comments::StripComments::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|err| ConfigError::Parse { path: path.to_path_buf(), source: err })?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the error from reading the first one found.
pub fn load_config() -> Result<(PigmentConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}
