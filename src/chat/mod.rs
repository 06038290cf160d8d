//! Chat with the backend assistant about the current project.
//!
//! - [`session`] binds a project to its server-side id and version.
//! - [`history`] holds the per-project transcripts and reconciles them with
//!   the server copy.

pub mod history;
pub mod session;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub use history::{ChatExport, Reconciliation, Transcripts};
pub use session::{ChatSession, SessionState};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person driving the CLI.
    User,
    /// The backend assistant.
    Assistant,
}

/// One entry of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// ISO-8601 creation time. Kept as text so server values round-trip untouched.
    #[serde(default)]
    pub timestamp: String,
}

impl ChatMessage {
    /// A message stamped with `at`, formatted like a browser `toISOString()`.
    pub fn new(role: Role, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
