//! Local persistence.
//!
//! [`StateStore`] is a key-value store over the filesystem port;
//! [`PersistentState`] layers JSON encoding on top and absorbs every
//! failure, so a broken state file never stops a command.

pub mod app_state;
pub mod store;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::context::ServiceContext;
use crate::error::StorageError;

pub use app_state::{AppState, SCHEMA_VERSION, STATE_KEY};
pub use store::StateStore;

/// JSON values in a [`StateStore`], with failures logged and absorbed.
pub struct PersistentState<'a> {
    store: StateStore<'a>,
}

impl<'a> PersistentState<'a> {
    /// Accessor over the store rooted at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { store: StateStore::new(ctx, root) }
    }

    /// Value under `key`, or `default` when missing, unreadable or corrupt.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key, error = %e, "failed to load state, using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                let e = StorageError::Corrupt { key: key.to_string(), message: e.to_string() };
                warn!(key, error = %e, "failed to load state, using default");
                default
            }
        }
    }

    /// Stores `value` under `key`. A failed write is logged and dropped.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| StorageError::Write { key: key.to_string(), message: e.to_string() })
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = result {
            warn!(key, error = %e, "failed to save state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::ports::{FileSystem, PortError};

    #[test]
    fn round_trips_values() {
        let ctx = ServiceContext::for_tests(MemoryFileSystem::new());
        let state = PersistentState::new(&ctx, Path::new("/state"));

        assert_eq!(state.load("project_version", 1_u64), 1);
        state.save("project_version", &2_u64);
        assert_eq!(state.load("project_version", 1_u64), 2);
    }

    #[test]
    fn corrupt_value_yields_default() {
        let fs = MemoryFileSystem::new().with_file("/state/selectedFiles.json", "{not json");
        let ctx = ServiceContext::for_tests(fs);
        let state = PersistentState::new(&ctx, Path::new("/state"));

        let files: Vec<String> = state.load("selectedFiles", Vec::new());
        assert!(files.is_empty());
    }

    struct ReadOnlyFileSystem;

    impl FileSystem for ReadOnlyFileSystem {
        fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
            Err("permission denied".into())
        }
        fn read_bytes(&self, _path: &Path) -> Result<Vec<u8>, PortError> {
            Err("permission denied".into())
        }
        fn write_bytes(&self, _path: &Path, _contents: &[u8]) -> Result<(), PortError> {
            Err("read-only filesystem".into())
        }
        fn exists(&self, _path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn io_failures_are_absorbed() {
        let ctx = ServiceContext::new(
            Box::new(crate::adapters::memory::FixedClock::parse("2025-01-01T00:00:00Z")),
            Box::new(ReadOnlyFileSystem),
            ServiceContext::for_tests(MemoryFileSystem::new()).backend,
        );
        let state = PersistentState::new(&ctx, Path::new("/state"));

        state.save("current_project_id", &"p-1");
        assert_eq!(state.load("current_project_id", String::from("none")), "none");
    }
}
