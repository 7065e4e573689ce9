//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolver core and the
//! outside world (time, HTTP, clipboard, diagnostics).
//! Implementations live in `src/adapters/`.

pub mod clipboard;
pub mod clock;
pub mod http;
pub mod logger;

pub use clipboard::{Clipboard, ClipboardError};
pub use clock::Clock;
pub use http::{FetchFuture, FetchRequest, FetchResponse, HttpError, HttpFetcher};
pub use logger::{LogLevel, Logger};
