//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod http;

pub use clock::ReplayingClock;
pub use http::ReplayingHttpFetcher;
