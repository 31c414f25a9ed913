//! Pigment - render a categorised colour palette into desktop application themes.
//!
//! A palette whose colours already carry semantic roles is rendered through
//! templates into the native configuration format of each supported
//! application. Plugins may check preconditions before generating and apply
//! side effects (reloads, wallpaper changes) after writing.

pub mod cli;
pub mod colour;
pub mod config;
pub mod error;
pub mod platform;
pub mod plugin;
pub mod plugins;
pub mod schema;
pub mod template;
