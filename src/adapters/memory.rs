//! In-process adapters for tests: a fixed clock and an in-memory filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::ports::{Clock, FileSystem, PortError};

/// Clock frozen at one instant.
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Clock frozen at `at`.
    #[must_use]
    pub fn at(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Clock frozen at an RFC 3339 timestamp.
    ///
    /// # Panics
    ///
    /// Panics if `rfc3339` is not a valid timestamp.
    #[must_use]
    pub fn parse(rfc3339: &str) -> Self {
        let at = DateTime::parse_from_rfc3339(rfc3339).expect("invalid RFC 3339 timestamp");
        Self(at.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Filesystem held in a map of path to bytes.
///
/// Directories are implicit: a path "exists" as a directory when some file
/// lives below it.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.lock().expect("memory fs lock poisoned").insert(path.into(), contents.into());
        self
    }

    /// All file paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().expect("memory fs lock poisoned").keys().cloned().collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(String::from_utf8(self.read_bytes(path)?)?)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        let files = self.files.lock().expect("memory fs lock poisoned");
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<(), PortError> {
        let mut files = self.files.lock().expect("memory fs lock poisoned");
        files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().expect("memory fs lock poisoned");
        files.keys().any(|k| k.starts_with(path))
    }
}
