//! Replaying adapter for the Clock port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::next_output;
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
        let output = next_output(&self.replayer, "clock", "now");
        serde_json::from_value(output).expect("clock::now: failed to deserialize DateTime<Utc>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    fn make_replayer(times: &[&str]) -> CassetteReplayer {
        let interactions = times
            .iter()
            .zip(0..)
            .map(|(t, seq)| Interaction {
                seq,
                port: "clock".into(),
                method: "now".into(),
                input: json!(null),
                output: json!(t),
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            backend_url: String::new(),
            interactions,
        })
    }

    #[test]
    fn serves_recorded_times_in_order() {
        let clock = ReplayingClock::new(make_replayer(&[
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:01:00Z",
        ]));
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:01:00+00:00");
    }
}
