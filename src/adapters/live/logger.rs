//! Live logger that forwards diagnostics to `tracing`.

use crate::ports::logger::{LogLevel, Logger};

/// Emits each diagnostic as a `tracing` event with a `component` field.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, component: &str, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(component, "{message}"),
            LogLevel::Info => tracing::info!(component, "{message}"),
            LogLevel::Warn => tracing::warn!(component, "{message}"),
            LogLevel::Error => tracing::error!(component, "{message}"),
        }
    }
}
