//! Locating and running external programs.
//!
//! Plugins talk to the desktop through commands such as `hyprctl` or
//! `pkill`. They never spawn processes directly; they go through a
//! [`CommandRunner`] so the command sequence can be scripted in tests.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while running an external program.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unable to locate executable '{0}' in known search paths")]
    NotFound(String),
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("{program} exited with {}: {}", status.map_or_else(|| "a signal".to_string(), |code| format!("status {code}")), stderr.trim())]
    Failed { program: String, status: Option<i32>, stderr: String },
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn new(stdout: impl Into<String>) -> Self {
        Self { stdout: stdout.into(), stderr: String::new() }
    }
}

/// Runs a program to completion.
///
/// A non-zero exit status is reported as [`CommandError::Failed`]. Callers
/// bound the call with their own timeout; implementations must not leave
/// the child running when the returned future is dropped.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let binary = resolve_binary(program)?;
        tracing::debug!(program, ?args, "running command");

        let output = tokio::process::Command::new(&binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| CommandError::Spawn { program: program.to_string(), source: err })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(CommandError::Failed {
                program: program.to_string(),
                status: output.status.code(),
                stderr,
            })
        }
    }
}

/// Resolves the absolute path to an executable.
///
/// Absolute paths are checked as-is. Bare names are searched for in:
/// 1. Directories listed in `PIGMENT_EXTRA_PATHS` (colon-separated).
/// 2. The current process `PATH`.
/// 3. `~/.local/bin` and `~/.cargo/bin`.
///
/// # Errors
///
/// Returns [`CommandError::NotFound`] when no executable file matches.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, CommandError> {
    if binary.is_empty() {
        return Err(CommandError::NotFound(String::new()));
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(CommandError::NotFound(binary.to_string()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var("PIGMENT_EXTRA_PATHS") {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    if let Some(home) = dirs::home_dir() {
        search_paths.push(home.join(".local/bin"));
        search_paths.push(home.join(".cargo/bin"));
    }

    search_paths
        .into_iter()
        .filter(|directory| !directory.as_os_str().is_empty())
        .map(|directory| directory.join(binary))
        .find(|path| is_executable(path))
        .ok_or_else(|| CommandError::NotFound(binary.to_string()))
}

/// Whether `binary` can be found by [`resolve_binary`].
#[must_use]
pub fn binary_exists(binary: &str) -> bool { resolve_binary(binary).is_ok() }

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };

    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
