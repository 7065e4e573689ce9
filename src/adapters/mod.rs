//! Adapter implementations of the port traits.
//!
//! - `live`: real clock, `reqwest`, OS clipboard commands, `tracing`.
//! - `memory`: in-process doubles for tests and embedding.
//! - `recording` / `replaying`: cassette-backed clock and HTTP.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
