//! Live adapters for real external interactions.

pub mod clipboard;
pub mod clock;
pub mod http;
pub mod logger;
