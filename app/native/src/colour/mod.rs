//! Colour model consumed by the output plugins.
//!
//! Categorisation happens upstream; this module only describes the result:
//! semantic roles, concrete colour values, and the theme data passed to
//! templates.

mod palette;
mod role;
mod value;

use std::path::PathBuf;

pub use palette::{CategorisedPalette, ThemeData, ThemeType};
pub use role::ColourRole;
use thiserror::Error;
pub use value::{ColourValue, Rgba};

/// Errors raised while decoding colours and palettes.
#[derive(Debug, Error)]
pub enum ColourError {
    #[error("invalid hex colour {0:?} (expected #RRGGBB or #RRGGBBAA)")]
    InvalidHex(String),
    #[error("unknown colour role {0:?}")]
    UnknownRole(String),
    #[error("failed to read palette {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to decode palette {}: {source}", path.display())]
    Decode { path: PathBuf, source: serde_json::Error },
}
