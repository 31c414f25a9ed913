//! CLI output formatting utilities.

use std::path::Path;

use colored::Colorize;

use crate::plugin::host::{Outcome, PluginReport, RunSummary};

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// Counts characters rather than bytes, so multi-byte input is cut on a
/// character boundary.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let truncate_at = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..truncate_at])
    }
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

/// Shortens `path` by replacing the home directory with `~`.
#[must_use]
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return Path::new("~").join(rest).display().to_string();
    }
    path.display().to_string()
}

/// One line per file (or one line per skipped/failed plugin).
#[must_use]
pub fn report_lines(report: &PluginReport) -> Vec<String> {
    let name = report.plugin.bold();
    match &report.outcome {
        Outcome::Written(files) => files
            .iter()
            .map(|file| format!("{} {name} wrote {}", "✓".green(), display_path(file)))
            .collect(),
        Outcome::Planned(files) => files
            .iter()
            .map(|(file, bytes)| {
                format!("{} {name} would write {} ({bytes} bytes)", "•".cyan(), display_path(file))
            })
            .collect(),
        Outcome::Skipped(reason) => vec![format!("{} {name} skipped: {reason}", "-".yellow())],
        Outcome::Failed(reason) => vec![format!("{} {name} failed: {}", "✗".red(), reason.red())],
    }
}

/// Prints every plugin's outcome followed by a one-line tally.
pub fn print_summary(summary: &RunSummary) {
    for report in &summary.reports {
        for line in report_lines(report) {
            println!("{line}");
        }
    }

    let total = summary.reports.len();
    let succeeded = summary.succeeded();
    let tally = if summary.dry_run {
        format!("dry run: {succeeded}/{total} plugin(s) would write files")
    } else {
        format!("{succeeded}/{total} plugin(s) succeeded")
    };
    println!("\n{}", if summary.is_success() { tally.green() } else { tally.red() });
}
