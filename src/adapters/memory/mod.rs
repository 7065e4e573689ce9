//! In-memory adapters for tests, demos, and embedding.
//!
//! Each adapter is cheaply cloneable; clones share state, so a test can keep
//! one handle for inspection while the [`ServiceContext`](crate::context::ServiceContext)
//! owns another.

pub mod clipboard;
pub mod clock;
pub mod http;
pub mod logger;

pub use clipboard::MemoryClipboard;
pub use clock::ManualClock;
pub use http::StaticFetcher;
pub use logger::{CapturedLog, CapturingLogger, NullLogger};
