//! Path expansion for user-supplied locations.
//!
//! Paths from the command line and the config file may use `~`; paths
//! handed to external tools must be absolute.

use std::io;
use std::path::{Path, PathBuf};

/// Expands a leading tilde to the user's home directory.
///
/// Absolute and relative paths are returned unchanged (after trimming).
/// Use [`expand_and_resolve`] to anchor relative paths.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands a tilde and resolves relative paths against `base_dir`.
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = expand(path);
    if expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

/// Makes `path` absolute against the current directory without touching the filesystem.
///
/// # Errors
///
/// Returns an error if the path is empty or the current directory cannot be determined.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand(&path.to_string_lossy());
    std::path::absolute(expanded)
}
