//! Replaying adapter for the Clock port.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Replays recorded clock values from a cassette.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a new replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        let output = {
            let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
            replayer.next_interaction("clock", "now").output.clone()
        };
        serde_json::from_value(output).expect("clock::now: failed to deserialize DateTime<Utc>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    #[test]
    fn replaying_clock_serves_recorded_times() {
        let tick = |seq, ts: &str| Interaction {
            seq,
            port: "clock".into(),
            method: "now".into(),
            input: json!(null),
            output: json!(ts),
        };
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            page_url: None,
            interactions: vec![tick(0, "2024-01-01T00:00:00Z"), tick(1, "2024-01-01T00:11:00Z")],
        };
        let clock = ReplayingClock::new(CassetteReplayer::new(&cassette));

        let first = clock.now();
        let second = clock.now();
        assert_eq!(first.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!((second - first).num_minutes(), 11);
    }
}
