//! Categorised palettes and the theme data handed to plugins.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ColourError, ColourRole, ColourValue};

/// Whether a palette is meant for a dark or a light theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
}

impl ThemeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for ThemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A palette whose colours have already been assigned semantic roles.
///
/// Not every role is guaranteed to be present; callers fall back to
/// [`ColourRole::fallback_hex`] on a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorisedPalette {
    #[serde(default)]
    pub theme_type: ThemeType,
    #[serde(default)]
    pub colours: BTreeMap<ColourRole, ColourValue>,
}

impl CategorisedPalette {
    #[must_use]
    pub fn new(theme_type: ThemeType) -> Self { Self { theme_type, colours: BTreeMap::new() } }

    /// Assigns a colour to a role, replacing any previous assignment.
    pub fn insert(&mut self, role: ColourRole, value: ColourValue) { self.colours.insert(role, value); }

    /// Builder-style [`insert`](Self::insert) from a hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if `hex` is not a valid colour.
    pub fn with(mut self, role: ColourRole, hex: &str) -> Result<Self, ColourError> {
        self.insert(role, ColourValue::parse(hex)?);
        Ok(self)
    }

    /// Role lookup; `None` when the categoriser did not assign the role.
    #[must_use]
    pub fn get(&self, role: ColourRole) -> Option<&ColourValue> { self.colours.get(&role) }

    /// Whether the role was assigned.
    #[must_use]
    pub fn has(&self, role: ColourRole) -> bool { self.colours.contains_key(&role) }

    /// Role lookup that substitutes the documented fallback on a miss.
    #[must_use]
    pub fn get_or_fallback(&self, role: ColourRole) -> ColourValue {
        self.get(role).cloned().unwrap_or_else(|| fallback_value(role))
    }

    /// Decodes a palette document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains invalid colours.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(json) }

    /// Reads and decodes a palette document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, ColourError> {
        let content = fs::read_to_string(path)
            .map_err(|err| ColourError::Read { path: path.to_path_buf(), source: err })?;
        Self::from_json_str(&content)
            .map_err(|err| ColourError::Decode { path: path.to_path_buf(), source: err })
    }
}

fn fallback_value(role: ColourRole) -> ColourValue {
    // Fallbacks are compile-time constants covered by tests.
    ColourValue::parse(role.fallback_hex()).unwrap_or_else(|_| unreachable!("invalid fallback for {role}"))
}

/// Everything a template can see: the palette plus invocation metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeData {
    pub palette: CategorisedPalette,
    pub wallpaper_path: Option<PathBuf>,
    pub theme_name: Option<String>,
}

impl ThemeData {
    #[must_use]
    pub const fn new(palette: CategorisedPalette) -> Self {
        Self { palette, wallpaper_path: None, theme_name: None }
    }

    #[must_use]
    pub fn with_wallpaper(mut self, path: Option<PathBuf>) -> Self {
        self.wallpaper_path = path;
        self
    }

    #[must_use]
    pub fn with_theme_name(mut self, name: Option<String>) -> Self {
        self.theme_name = name;
        self
    }

    #[must_use]
    pub const fn theme_type(&self) -> ThemeType { self.palette.theme_type }

    /// Colour for `role`, substituting the documented fallback on a miss.
    #[must_use]
    pub fn colour(&self, role: ColourRole) -> ColourValue { self.palette.get_or_fallback(role) }
}
