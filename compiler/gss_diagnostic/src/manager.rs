//! Error manager: collect diagnostics without throwing.
//!
//! Passes report through the [`ErrorManager`] trait and keep going;
//! whether any accumulated diagnostic fails the build is the driver's
//! decision after all passes have run. The manager never panics and
//! never unwinds — hard structural violations bypass it entirely.

use crate::diagnostic::GssError;

/// Reporting interface handed to every pass.
pub trait ErrorManager {
    /// Record an error.
    fn report(&mut self, error: GssError);

    /// Record a warning.
    fn report_warning(&mut self, error: GssError);

    /// Whether any error has been recorded so far.
    fn has_errors(&self) -> bool;
}

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorManagerConfig {
    /// Maximum number of errors before further reports are dropped
    /// (0 = unlimited).
    pub error_limit: usize,
}

impl Default for ErrorManagerConfig {
    fn default() -> Self {
        ErrorManagerConfig { error_limit: 100 }
    }
}

impl ErrorManagerConfig {
    /// A config with no limits (for testing).
    pub fn unlimited() -> Self {
        ErrorManagerConfig { error_limit: 0 }
    }
}

/// The standard collector: accumulates errors and warnings in order,
/// enforces the error limit, and hands everything back sorted by
/// position on [`AccumulatingErrorManager::flush`].
#[derive(Default)]
pub struct AccumulatingErrorManager {
    errors: Vec<GssError>,
    warnings: Vec<GssError>,
    dropped: usize,
    config: ErrorManagerConfig,
}

impl AccumulatingErrorManager {
    /// Create a manager with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with custom configuration.
    pub fn with_config(config: ErrorManagerConfig) -> Self {
        AccumulatingErrorManager {
            config,
            ..Self::default()
        }
    }

    /// Number of errors recorded.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of reports dropped because the limit was reached.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Errors recorded so far, in report order.
    pub fn errors(&self) -> &[GssError] {
        &self.errors
    }

    /// Warnings recorded so far, in report order.
    pub fn warnings(&self) -> &[GssError] {
        &self.warnings
    }

    /// Whether the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.errors.len() >= self.config.error_limit
    }

    /// Sort errors by (line, column) and drain them.
    ///
    /// Skips sorting when already in order — the common case for a
    /// single traversal reporting front to back. Warnings are left in
    /// place; drain them with [`Self::take_warnings`].
    pub fn flush(&mut self) -> Vec<GssError> {
        let already_sorted = self
            .errors
            .windows(2)
            .all(|w| w[0].line_and_column() <= w[1].line_and_column());
        if !already_sorted {
            self.errors.sort_by_key(GssError::line_and_column);
        }
        self.dropped = 0;
        std::mem::take(&mut self.errors)
    }

    /// Drain the accumulated warnings, in report order.
    pub fn take_warnings(&mut self) -> Vec<GssError> {
        std::mem::take(&mut self.warnings)
    }
}

impl ErrorManager for AccumulatingErrorManager {
    fn report(&mut self, error: GssError) {
        if self.limit_reached() {
            self.dropped += 1;
            return;
        }
        self.errors.push(error);
    }

    fn report_warning(&mut self, error: GssError) {
        self.warnings.push(error);
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
