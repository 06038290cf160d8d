//! Error taxonomy shared by the library layers.
//!
//! Commands flatten these into `String` at the dispatch boundary; below that
//! everything is typed so callers can tell a local validation failure from a
//! backend rejection or a storage hiccup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure talking to the generator backend.
///
/// Serializable so that cassettes can replay failures exactly as recorded.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum BackendError {
    /// The request never produced an HTTP response.
    #[error("backend request failed: {0}")]
    Network(String),
    /// The backend answered with a non-success status code.
    #[error("backend returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided `detail`, or the raw body.
        message: String,
    },
    /// The backend answered `{"success": false, ...}`.
    #[error("{0}")]
    Rejected(String),
    /// The response body did not match the expected envelope.
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

/// Failure reading or writing the local key-value store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The value for `key` could not be read.
    #[error("failed to read `{key}`: {message}")]
    Read {
        /// Store key.
        key: String,
        /// Underlying cause.
        message: String,
    },
    /// The value for `key` could not be written or removed.
    #[error("failed to write `{key}`: {message}")]
    Write {
        /// Store key.
        key: String,
        /// Underlying cause.
        message: String,
    },
    /// The stored value is not valid JSON for the requested type.
    #[error("corrupt value under `{key}`: {message}")]
    Corrupt {
        /// Store key.
        key: String,
        /// Underlying cause.
        message: String,
    },
}

/// Top-level error for library operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad user input, rejected before any side effect.
    #[error("{0}")]
    Validation(String),
    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Local store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Reading an input file or writing an export failed.
    #[error("{0}")]
    Io(String),
    /// Building a ZIP archive failed.
    #[error("failed to build archive: {0}")]
    Archive(String),
}

impl AppError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
