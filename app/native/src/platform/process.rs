//! Signalling running applications by process name.
//!
//! Reloading an application means sending it a user signal. Processes are
//! matched on their exact name, the same name `ps -o comm` reports.

use std::ffi::OsStr;
use std::fmt;

use sysinfo::{ProcessesToUpdate, Signal, System};
use thiserror::Error;

/// Signals the bundled plugins use to ask applications to reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadSignal {
    User1,
    User2,
}

impl ReloadSignal {
    const fn as_sysinfo(self) -> Signal {
        match self {
            Self::User1 => Signal::User1,
            Self::User2 => Signal::User2,
        }
    }
}

impl fmt::Display for ReloadSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User1 => "SIGUSR1",
            Self::User2 => "SIGUSR2",
        })
    }
}

/// Errors raised while signalling processes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("{0} is not supported on this platform")]
    Unsupported(ReloadSignal),
    #[error("failed to send {signal} to {failed} of {matched} {name} processes")]
    Delivery { name: String, signal: ReloadSignal, matched: usize, failed: usize },
}

/// Delivers signals to processes; replaced by fakes in tests.
pub trait ProcessSignaller: Send + Sync {
    /// Sends `signal` to every process named exactly `name`.
    ///
    /// Returns how many processes received it; zero means none are running.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal is unsupported or any delivery failed.
    fn signal_by_name(&self, name: &str, signal: ReloadSignal) -> Result<usize, SignalError>;
}

/// Signals real processes, enumerated through sysinfo.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSignaller;

impl ProcessSignaller for SystemSignaller {
    fn signal_by_name(&self, name: &str, signal: ReloadSignal) -> Result<usize, SignalError> {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut matched = 0;
        let mut failed = 0;
        for process in sys.processes_by_exact_name(OsStr::new(name)) {
            matched += 1;
            match process.kill_with(signal.as_sysinfo()) {
                Some(true) => {}
                Some(false) => failed += 1,
                None => return Err(SignalError::Unsupported(signal)),
            }
        }

        if failed > 0 {
            return Err(SignalError::Delivery { name: name.to_string(), signal, matched, failed });
        }
        Ok(matched)
    }
}
