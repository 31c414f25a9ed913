//! Error types for Pigment.
//!
//! Each subsystem owns a focused error enum; this module provides the
//! top-level error the CLI reports before exiting.

use thiserror::Error;

use crate::colour::ColourError;
use crate::config::ConfigError;
use crate::plugin::{PluginError, RegistryError};
use crate::template::TemplateError;

/// Errors that can surface from a CLI invocation.
#[derive(Debug, Error)]
pub enum PigmentError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// The palette document could not be read or decoded.
    #[error("Palette error: {0}")]
    Palette(String),
    /// A colour value was malformed.
    #[error("Colour error: {0}")]
    Colour(#[from] ColourError),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Template management failed.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    /// A plugin failed outside of the best-effort lifecycle hooks.
    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),
    /// The plugin registry could not be assembled.
    #[error("Plugin registry error: {0}")]
    Registry(#[from] RegistryError),
    /// No selected plugin produced output.
    #[error("no output plugins succeeded")]
    NothingGenerated,
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PigmentError {
    fn from(err: serde_json::Error) -> Self { Self::Palette(err.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = PigmentError::InvalidArguments("Cannot combine --all with --plugins".to_string());
        assert_eq!(err.to_string(), "Cannot combine --all with --plugins");
    }

    #[test]
    fn test_palette_error_display() {
        let err = PigmentError::Palette("missing field `colours`".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Palette error"));
        assert!(msg.contains("colours"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: PigmentError = io_err.into();
        assert!(matches!(err, PigmentError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_json_error_becomes_palette_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PigmentError = json_err.into();
        assert!(matches!(err, PigmentError::Palette(_)));
    }

    #[test]
    fn test_nothing_generated_display() {
        assert_eq!(PigmentError::NothingGenerated.to_string(), "no output plugins succeeded");
    }

    #[test]
    fn test_plugin_error_wraps() {
        let err: PigmentError = PluginError::NilInput.into();
        assert!(err.to_string().starts_with("Plugin error"));
    }
}
