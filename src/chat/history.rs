//! Per-project chat transcripts.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ChatMessage;

/// What [`reconcile`] did to the local transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The server had strictly more messages; local was replaced.
    ReplacedFromServer,
    /// Local had strictly more messages; kept as-is and not pushed back.
    KeptLocal,
    /// Same length on both sides; nothing done.
    Unchanged,
}

/// Reconciles a local transcript with the server copy by message count.
///
/// Equal-length histories with different content are not detected and
/// interleaved histories are not merged.
pub fn reconcile(local: &mut Vec<ChatMessage>, server: Vec<ChatMessage>) -> Reconciliation {
    use std::cmp::Ordering;

    match server.len().cmp(&local.len()) {
        Ordering::Greater => {
            info!(server = server.len(), local = local.len(), "syncing chat history from server");
            *local = server;
            Reconciliation::ReplacedFromServer
        }
        Ordering::Less => {
            info!(server = server.len(), local = local.len(), "local chat history is newer");
            Reconciliation::KeptLocal
        }
        Ordering::Equal => Reconciliation::Unchanged,
    }
}

/// Chat history export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExport {
    /// Project the transcript belongs to.
    pub project_id: String,
    /// When the export was produced.
    pub export_date: String,
    /// Number of messages.
    pub message_count: usize,
    /// The transcript.
    pub messages: Vec<ChatMessage>,
}

/// Transcripts keyed by project id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcripts {
    by_project: BTreeMap<String, Vec<ChatMessage>>,
}

impl Transcripts {
    /// Messages for `project_id`, empty if none were stored.
    #[must_use]
    pub fn messages(&self, project_id: &str) -> &[ChatMessage] {
        self.by_project.get(project_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mutable transcript for `project_id`, created on first use.
    pub fn messages_mut(&mut self, project_id: &str) -> &mut Vec<ChatMessage> {
        self.by_project.entry(project_id.to_string()).or_default()
    }

    /// Appends one message to the transcript of `project_id`.
    pub fn push(&mut self, project_id: &str, message: ChatMessage) {
        self.messages_mut(project_id).push(message);
    }

    /// Project ids that have a stored transcript.
    #[must_use]
    pub fn project_ids(&self) -> Vec<String> {
        self.by_project.keys().cloned().collect()
    }

    /// Drops the transcript of one project. Returns whether one existed.
    pub fn clear_project(&mut self, project_id: &str) -> bool {
        let removed = self.by_project.remove(project_id).is_some();
        if removed {
            debug!(project_id, "cleared chat history");
        }
        removed
    }

    /// Drops every transcript. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let count = self.by_project.len();
        self.by_project.clear();
        count
    }

    /// Builds the export document for `project_id`, or `None` if it has no transcript.
    #[must_use]
    pub fn export(&self, project_id: &str, at: DateTime<Utc>) -> Option<ChatExport> {
        let messages = self.by_project.get(project_id)?;
        Some(ChatExport {
            project_id: project_id.to_string(),
            export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            message_count: messages.len(),
            messages: messages.clone(),
        })
    }
}

/// File name used when exporting the transcript of `project_id`.
#[must_use]
pub fn export_file_name(project_id: &str) -> String {
    let short: String = project_id.chars().take(8).collect();
    format!("chat-history-{short}.json")
}
