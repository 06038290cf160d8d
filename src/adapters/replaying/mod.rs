//! Replaying adapters that serve recorded interactions.

pub mod backend;
pub mod clock;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::BackendError;

pub use backend::ReplayingBackend;
pub use clock::ReplayingClock;

/// Pull the next recorded output for `port::method`.
///
/// Mirror of `recording::record_interaction`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output.clone()
}

/// Decode a recorded `{"Ok": v}` / `{"Err": e}` output.
///
/// Mirror of `recording::record_result`. A bare string under `Err` is read as
/// a network failure so hand-written cassettes stay short.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, BackendError> {
    let decode = |e: serde_json::Error| BackendError::Decode(format!("{context}: {e}"));

    let serde_json::Value::Object(mut map) = output else {
        return Err(BackendError::Decode(format!("{context}: expected an Ok/Err object")));
    };
    if let Some(err) = map.remove("Err") {
        return Err(match err {
            serde_json::Value::String(message) => BackendError::Network(message),
            other => serde_json::from_value(other).map_err(decode)?,
        });
    }
    let value = map
        .remove("Ok")
        .ok_or_else(|| BackendError::Decode(format!("{context}: missing Ok or Err")))?;
    serde_json::from_value(value).map_err(decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replay_result_decodes_ok_and_err() {
        let ok: Result<String, _> = replay_result(json!({"Ok": "p-1"}), "store_manual");
        assert_eq!(ok.unwrap(), "p-1");

        let err: Result<String, _> = replay_result(
            json!({"Err": {"kind": "rejected", "detail": "nope"}}),
            "store_manual",
        );
        assert_eq!(err.unwrap_err(), BackendError::Rejected("nope".into()));

        let short: Result<String, _> = replay_result(json!({"Err": "offline"}), "x");
        assert_eq!(short.unwrap_err(), BackendError::Network("offline".into()));
    }

    #[test]
    fn replay_result_flags_malformed_output() {
        let err: Result<String, _> = replay_result(json!(42), "fetch_project");
        assert!(matches!(err, Err(BackendError::Decode(m)) if m.contains("fetch_project")));
    }
}
