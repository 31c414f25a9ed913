//! Semantic colour roles.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ColourError;

/// A semantic role a palette colour can play.
///
/// Roles are ordered so that iterating a role-keyed map is deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ColourRole {
    Background,
    BackgroundMuted,
    Foreground,
    ForegroundMuted,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Danger,
    Warning,
    Success,
    Info,
}

impl ColourRole {
    /// Every role, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Background,
        Self::BackgroundMuted,
        Self::Foreground,
        Self::ForegroundMuted,
        Self::Accent1,
        Self::Accent2,
        Self::Accent3,
        Self::Accent4,
        Self::Danger,
        Self::Warning,
        Self::Success,
        Self::Info,
    ];

    /// Returns the identifier used in palette documents and templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::BackgroundMuted => "backgroundMuted",
            Self::Foreground => "foreground",
            Self::ForegroundMuted => "foregroundMuted",
            Self::Accent1 => "accent1",
            Self::Accent2 => "accent2",
            Self::Accent3 => "accent3",
            Self::Accent4 => "accent4",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Info => "info",
        }
    }

    /// Returns the documented fallback colour used when a palette lacks this role.
    #[must_use]
    pub const fn fallback_hex(self) -> &'static str {
        match self {
            Self::Background => "#1a1b26",
            Self::BackgroundMuted => "#16161e",
            Self::Foreground => "#c0caf5",
            Self::ForegroundMuted => "#a9b1d6",
            Self::Accent1 | Self::Info => "#7aa2f7",
            Self::Accent2 => "#bb9af7",
            Self::Accent3 => "#7dcfff",
            Self::Accent4 | Self::Success => "#9ece6a",
            Self::Danger => "#f7768e",
            Self::Warning => "#e0af68",
        }
    }
}

impl fmt::Display for ColourRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ColourRole {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ColourError::UnknownRole(s.to_string()))
    }
}
