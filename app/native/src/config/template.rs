//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::io;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Pigment Configuration File
// ==========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
// Command-line flags always win over values set here.

{
  // Plugins to run when `pigment generate` gets neither --plugins nor --all.
  // An empty list runs every plugin. See `pigment plugins list`.
  // "plugins": ["kitty", "waybar", "hyprpaper"],

  // Output directory per plugin. `~` is expanded.
  // "outputDirs": {
  //   "kitty": "~/.config/kitty/themes",
  //   "waybar": "~/.config/waybar"
  // },

  // Directory holding custom templates, laid out as <plugin>/<template>.
  // Relative paths start from the pigment config directory.
  // Defaults to the `templates` directory there.
  // Run `pigment templates dump <plugin>` to start from the defaults.
  // "templatesDir": "~/.config/pigment/templates",

  // Print plugin diagnostics on every run.
  // "verbose": false,

  // Lifecycle hook timeouts in seconds.
  // "hooks": {
  //   // Precondition checks; a timeout fails the plugin.
  //   "preTimeoutSecs": 5,
  //
  //   // Reloads and wallpaper changes; a timeout is logged and ignored.
  //   "postTimeoutSecs": 10
  // },

  // Plugins allowed to reload their running application after writing.
  // waybar reloads its whole configuration on SIGUSR2, so it only does
  // so when listed here.
  // "reload": ["waybar"]
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
