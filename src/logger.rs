//! Explicit logging handle passed to every build component.
//!
//! The process-wide `log` backend (env_logger) is initialised once in `main`;
//! whether a given build is chatty is decided by the [`Logger`] it carries,
//! never by mutating global state.

use std::fmt::Display;

const TARGET: &str = "webapp";

/// Logging handle for one build.
///
/// `quiet` suppresses debug and info output. Warnings and errors always pass
/// through since they carry remediation hints.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logger {
    quiet: bool,
}

impl Logger {
    /// Create a new logger
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Returns a copy with the quiet flag replaced.
    pub fn with_quiet(self, quiet: bool) -> Self {
        Self { quiet }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Debug-level progress detail
    pub fn debug(&self, message: impl Display) {
        if !self.quiet {
            log::debug!(target: TARGET, "{}", message);
        }
    }

    /// Info-level progress
    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            log::info!(target: TARGET, "{}", message);
        }
    }

    /// Warning (always emitted)
    pub fn warn(&self, message: impl Display) {
        log::warn!(target: TARGET, "{}", message);
    }

    /// Error (always emitted)
    pub fn error(&self, message: impl Display) {
        log::error!(target: TARGET, "{}", message);
    }
}
