//! Result type for best-effort steps.

/// Value produced by a step that may complete in a degraded state.
///
/// Best-effort steps (Linux desktop integration, macOS framework cleanup)
/// never fail the build. Instead of swallowing their problems they report
/// them here, so callers and tests can tell a clean run from a degraded one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
    /// What the step produced
    pub value: T,
    /// Problems encountered along the way, with remediation text
    pub warnings: Vec<String>,
}

impl<T> Outcome<T> {
    /// A step that completed without problems.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Record a problem without changing the value.
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// True when at least one warning was recorded.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
