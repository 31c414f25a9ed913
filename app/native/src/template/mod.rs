//! Template resolution and rendering.
//!
//! Every plugin ships embedded default templates. The [`TemplateLoader`]
//! prefers a user override from the templates directory when one exists,
//! and [`Template`] evaluates the small placeholder language the templates
//! are written in.

mod engine;
mod loader;

use std::fmt;
use std::path::PathBuf;

pub use engine::Template;
pub use loader::{
    DumpReport, EmbeddedTemplate, LoadedTemplate, TemplateInfo, TemplateLoader,
    set_custom_templates_dir, templates_dir,
};
use thiserror::Error;

/// The stage of template handling that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePhase {
    Load,
    Parse,
    Execute,
}

impl fmt::Display for TemplatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Parse => "parse",
            Self::Execute => "execute",
        })
    }
}

/// Errors raised while resolving, parsing, or evaluating templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no template {name:?} for plugin {plugin:?}")]
    NotFound { plugin: String, name: String },
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: {message}")]
    Execute { line: usize, message: String },
    #[error("custom template already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

impl TemplateError {
    /// Which phase produced this error.
    #[must_use]
    pub const fn phase(&self) -> TemplatePhase {
        match self {
            Self::NotFound { .. } | Self::Read { .. } | Self::AlreadyExists(_) | Self::Write { .. } => {
                TemplatePhase::Load
            }
            Self::Parse { .. } => TemplatePhase::Parse,
            Self::Execute { .. } => TemplatePhase::Execute,
        }
    }
}
