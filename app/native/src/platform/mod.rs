//! Host platform helpers: path expansion, external commands and signals.
//!
//! - [`path`] - Tilde expansion and absolute path resolution
//! - [`command`] - Locating executables and running them asynchronously
//! - [`process`] - Signalling running applications by name

pub mod command;
pub mod path;
pub mod process;

pub use command::{
    CommandError, CommandOutput, CommandRunner, SystemRunner, binary_exists, resolve_binary,
};
pub use path::{absolute, expand, expand_and_resolve};
pub use process::{ProcessSignaller, ReloadSignal, SignalError, SystemSignaller};
