//! Applying a wallpaper to a running hyprpaper daemon.
//!
//! The daemon keeps its own idea of which output shows which image. To
//! switch wallpapers without disturbing that layout, reconciliation:
//!
//! 1. discovers the current assignments (`listactive`),
//! 2. drops every cached image (`unload all`),
//! 3. preloads the new image once and assigns it to each discovered target.
//!
//! An empty target name is hyprpaper's wildcard: the default for outputs
//! without an explicit assignment.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::platform::{CommandError, CommandRunner};
use crate::plugin::Diagnostics;

/// The wildcard target.
pub const WILDCARD: &str = "";

const HYPRCTL: &str = "hyprctl";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to preload wallpaper {}: {source}", path.display())]
    Preload { path: PathBuf, source: CommandError },
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub targets: Vec<String>,
    pub applied: usize,
    pub failed: usize,
}

impl ApplyReport {
    /// Human readable target list; a lone wildcard reads as "wildcard".
    #[must_use]
    pub fn describe_targets(&self) -> String {
        self.targets.iter().map(|target| target_label(target)).collect::<Vec<_>>().join(", ")
    }
}

fn target_label(target: &str) -> &str { if target == WILDCARD { "wildcard" } else { target } }

/// Parses `listactive` output into target names, in order.
///
/// Lines look like `<output> = <path>`; the wildcard row has nothing before
/// the separator. Blank lines and lines without ` = ` are ignored.
#[must_use]
pub fn parse_active_assignments(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(" = "))
        .map(|(target, _)| target.trim().to_string())
        .collect()
}

/// Whether hyprpaper answers IPC requests.
pub async fn daemon_running(runner: &dyn CommandRunner) -> bool {
    runner.run(HYPRCTL, &["hyprpaper", "listloaded"]).await.is_ok()
}

/// Current targets, degrading to the wildcard when they cannot be determined.
pub async fn discover_targets(runner: &dyn CommandRunner, diagnostics: &Diagnostics) -> Vec<String> {
    match runner.run(HYPRCTL, &["hyprpaper", "listactive"]).await {
        Ok(output) => {
            let targets = parse_active_assignments(&output.stdout);
            if targets.is_empty() {
                diagnostics.note("no active wallpaper assignments, using wildcard");
                vec![WILDCARD.to_string()]
            } else {
                targets
            }
        }
        Err(err) => {
            diagnostics.note(format_args!("failed to query active wallpapers, using wildcard: {err}"));
            vec![WILDCARD.to_string()]
        }
    }
}

/// Shows `wallpaper` on every target hyprpaper currently manages.
///
/// `wallpaper` must already be absolute.
///
/// # Errors
///
/// Returns [`ReconcileError::Preload`] if the daemon refuses the image.
/// Failures to assign individual targets are counted in the report instead.
pub async fn reconcile(
    runner: &dyn CommandRunner,
    wallpaper: &Path,
    diagnostics: &Diagnostics,
) -> Result<ApplyReport, ReconcileError> {
    let targets = discover_targets(runner, diagnostics).await;
    let path = wallpaper.to_string_lossy();

    if let Err(err) = runner.run(HYPRCTL, &["hyprpaper", "unload", "all"]).await {
        tracing::debug!(error = %err, "unload all failed");
    }

    runner
        .run(HYPRCTL, &["hyprpaper", "preload", path.as_ref()])
        .await
        .map_err(|err| ReconcileError::Preload { path: wallpaper.to_path_buf(), source: err })?;

    let mut report = ApplyReport { targets, applied: 0, failed: 0 };
    for target in &report.targets {
        let assignment = format!("{target},{path}");
        match runner.run(HYPRCTL, &["hyprpaper", "wallpaper", assignment.as_str()]).await {
            Ok(_) => {
                report.applied += 1;
                diagnostics.note(format_args!("set wallpaper on {}", target_label(target)));
            }
            Err(err) => {
                report.failed += 1;
                diagnostics.note(format_args!(
                    "failed to set wallpaper on {}: {err}",
                    target_label(target)
                ));
            }
        }
    }

    Ok(report)
}
