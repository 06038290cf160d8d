//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`"backend"` or `"clock"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port, `{"Ok": ..}` / `{"Err": ..}` for fallible calls.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Backend the session talked to.
    #[serde(default)]
    pub backend_url: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Parses a cassette from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid cassette.
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        serde_yaml::from_str(text).map_err(|e| format!("Failed to parse cassette: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_round_trip() {
        let cassette = Cassette {
            name: "generate-todo".into(),
            recorded_at: Utc::now(),
            backend_url: "http://localhost:8000".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "backend".into(),
                method: "generate_project".into(),
                input: json!({"description": "todo app", "features": ""}),
                output: json!({"Ok": {"files": {"/App.js": "x"}, "project_id": "p-1"}}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        assert_eq!(Cassette::from_yaml(&yaml).unwrap(), cassette);
    }

    #[test]
    fn backend_url_is_optional() {
        let yaml = "name: old\nrecorded_at: 2025-01-01T00:00:00Z\ninteractions: []\n";
        let cassette = Cassette::from_yaml(yaml).unwrap();
        assert!(cassette.backend_url.is_empty());
    }
}
