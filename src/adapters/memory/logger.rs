//! Loggers that discard or capture diagnostics.

use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::logger::{LogLevel, Logger};

/// Drops every message.
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: LogLevel, _component: &str, _message: &str) {}
}

/// One captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLog {
    /// Severity.
    pub level: LogLevel,
    /// Emitting component.
    pub component: String,
    /// Message text.
    pub message: String,
}

/// Keeps every message for later assertions.
#[derive(Clone, Default)]
pub struct CapturingLogger {
    records: Arc<Mutex<Vec<CapturedLog>>>,
}

impl CapturingLogger {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything logged so far.
    #[must_use]
    pub fn records(&self) -> Vec<CapturedLog> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages logged at `level` or above.
    #[must_use]
    pub fn messages_at_least(&self, level: LogLevel) -> Vec<String> {
        self.records().into_iter().filter(|r| r.level >= level).map(|r| r.message).collect()
    }
}

impl Logger for CapturingLogger {
    fn log(&self, level: LogLevel, component: &str, message: &str) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(CapturedLog {
            level,
            component: component.to_string(),
            message: message.to_string(),
        });
    }
}
