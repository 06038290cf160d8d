//! Key-value store: the local-storage analogue.
//!
//! Each key lives in its own file under the store root:
//!
//! ```text
//! <root>/
//!   └── <key>.json
//! ```

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::error::StorageError;

const SUFFIX: &str = ".json";

/// String values under string keys, persisted through `ctx.fs`.
pub struct StateStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> StateStore<'a> {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Reads the raw value under `key`; `None` if never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !self.ctx.fs.exists(&path) {
            return Ok(None);
        }
        self.ctx
            .fs
            .read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Read { key: key.to_string(), message: e.to_string() })
    }

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ctx
            .fs
            .write(&self.key_path(key), value)
            .map_err(|e| StorageError::Write { key: key.to_string(), message: e.to_string() })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{SUFFIX}", sanitize(key)))
    }
}

/// Maps a key onto a safe file stem.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn set_then_get() {
        let ctx = ServiceContext::for_tests(MemoryFileSystem::new());
        let store = StateStore::new(&ctx, Path::new("/state"));

        assert_eq!(store.get("selectedFile").unwrap(), None);
        store.set("selectedFile", "\"/App.js\"").unwrap();
        assert_eq!(store.get("selectedFile").unwrap().as_deref(), Some("\"/App.js\""));

        store.set("selectedFile", "\"/index.js\"").unwrap();
        assert_eq!(store.get("selectedFile").unwrap().as_deref(), Some("\"/index.js\""));
    }

    #[test]
    fn unsafe_key_characters_are_replaced() {
        assert_eq!(sanitize("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize("appgen-state"), "appgen-state");
    }
}
