//! Logger port for diagnostics emitted by the resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Step-by-step tracing of discovery and lookup.
    Debug,
    /// Notable but expected outcomes.
    Info,
    /// Degraded results, such as a discovery miss.
    Warn,
    /// Failures that still have a fallback.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Receives diagnostics from the resolver components.
///
/// Injected rather than global so callers can silence, redirect, or
/// capture output per resolution.
pub trait Logger: Send + Sync {
    /// Emits one message tagged with the component that produced it.
    fn log(&self, level: LogLevel, component: &str, message: &str);

    /// Emits a [`LogLevel::Debug`] message.
    fn debug(&self, component: &str, message: &str) {
        self.log(LogLevel::Debug, component, message);
    }

    /// Emits a [`LogLevel::Info`] message.
    fn info(&self, component: &str, message: &str) {
        self.log(LogLevel::Info, component, message);
    }

    /// Emits a [`LogLevel::Warn`] message.
    fn warn(&self, component: &str, message: &str) {
        self.log(LogLevel::Warn, component, message);
    }
}
