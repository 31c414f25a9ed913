//! Bundled output plugins.

pub mod alacritty;
pub mod dunst;
pub mod fuzzel;
pub mod hyprland;
pub mod hyprlock;
pub mod hyprpaper;
pub mod kitty;
pub mod waybar;
pub mod wofi;
pub mod zellij;

use crate::platform::{ProcessSignaller, ReloadSignal};
use crate::plugin::{Diagnostics, OutputPlugin, Registry, RegistryError};
use crate::template::{EmbeddedTemplate, TemplateLoader};

/// One fresh instance of every bundled plugin, in registration order.
#[must_use]
pub fn all_plugins() -> Vec<Box<dyn OutputPlugin>> {
    vec![
        Box::new(alacritty::Alacritty::new()),
        Box::new(dunst::Dunst::new()),
        Box::new(fuzzel::Fuzzel::new()),
        Box::new(hyprland::Hyprland::new()),
        Box::new(hyprlock::Hyprlock::new()),
        Box::new(hyprpaper::Hyprpaper::new()),
        Box::new(kitty::Kitty::new()),
        Box::new(waybar::Waybar::new()),
        Box::new(wofi::Wofi::new()),
        Box::new(zellij::Zellij::new()),
    ]
}

/// A registry holding every bundled plugin.
///
/// # Errors
///
/// Returns [`RegistryError::Duplicate`] if two bundled plugins share a name.
pub fn default_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    for plugin in all_plugins() {
        registry.register(plugin)?;
    }
    Ok(registry)
}

/// Embedded templates per bundled plugin.
const EMBEDDED: &[(&str, &[EmbeddedTemplate])] = &[
    (alacritty::NAME, alacritty::TEMPLATES),
    (dunst::NAME, dunst::TEMPLATES),
    (fuzzel::NAME, fuzzel::TEMPLATES),
    (hyprland::NAME, hyprland::TEMPLATES),
    (hyprlock::NAME, hyprlock::TEMPLATES),
    (hyprpaper::NAME, hyprpaper::TEMPLATES),
    (kitty::NAME, kitty::TEMPLATES),
    (waybar::NAME, waybar::TEMPLATES),
    (wofi::NAME, wofi::TEMPLATES),
    (zellij::NAME, zellij::TEMPLATES),
];

/// Template loader for a bundled plugin, rooted at the configured templates directory.
#[must_use]
pub fn template_loader(plugin: &str) -> Option<TemplateLoader> {
    EMBEDDED
        .iter()
        .find(|(name, _)| *name == plugin)
        .map(|&(name, templates)| TemplateLoader::new(name, templates))
}

/// Sends `signal` to every process named exactly `process`.
///
/// Best effort: failures are noted, and no matching process only means the
/// application is not running.
pub(crate) fn signal_processes(
    signaller: &dyn ProcessSignaller,
    diagnostics: &Diagnostics,
    signal: ReloadSignal,
    process: &str,
) {
    match signaller.signal_by_name(process, signal) {
        Ok(0) => diagnostics.note(format_args!("{process} is not running; nothing to reload")),
        Ok(count) => diagnostics.note(format_args!("sent {signal} to {count} {process} process(es)")),
        Err(err) => diagnostics.note(format_args!("could not signal {process}: {err}")),
    }
}
