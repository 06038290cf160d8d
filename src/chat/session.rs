//! Binding between the local project and its server-side chat state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ChatMessage;
use crate::error::AppError;
use crate::ports::backend::{BackendClient, ChatReply, GeneratedProject, StoreRequest};
use crate::ports::Clock;

/// Where the session stands, derived from [`ChatSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No server-side project yet; chatting is not possible.
    Unbound,
    /// Chat messages go to `project_id`.
    Bound {
        /// Server-assigned project id.
        project_id: String,
        /// Last version the backend reported.
        version: u64,
    },
}

/// Persisted chat session fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSession {
    /// Server id of the current project.
    pub project_id: Option<String>,
    /// Backend-reported version, starting at 1.
    pub project_version: u64,
    /// Project whose history was last reconciled with the server.
    pub last_synced_project: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self { project_id: None, project_version: 1, last_synced_project: None }
    }
}

impl ChatSession {
    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.project_id {
            Some(id) => SessionState::Bound { project_id: id.clone(), version: self.project_version },
            None => SessionState::Unbound,
        }
    }

    /// Id of the bound project.
    ///
    /// # Errors
    ///
    /// Returns a validation error while unbound.
    pub fn bound_id(&self) -> Result<&str, AppError> {
        self.project_id.as_deref().ok_or_else(|| {
            AppError::validation("No project is linked to the chat; generate or import one first")
        })
    }

    /// Binds to `project_id` at version 1.
    pub fn bind(&mut self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        info!(project_id = %project_id, "chat session bound");
        self.project_id = Some(project_id);
        self.project_version = 1;
    }

    /// Binds the session to a generated or imported project.
    ///
    /// Adopts the id the backend already assigned; otherwise stores the
    /// files under a `manual-<millis>` id and adopts the id the backend
    /// confirms. Returns the bound id.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the manual store fails; the session is
    /// left unchanged.
    pub async fn store_project(
        &mut self,
        backend: &dyn BackendClient,
        clock: &dyn Clock,
        generated: &GeneratedProject,
    ) -> Result<String, AppError> {
        let project_id = match &generated.project_id {
            Some(id) => id.clone(),
            None => {
                let request = StoreRequest {
                    project_id: format!("manual-{}", clock.now().timestamp_millis()),
                    project_data: generated.files.clone(),
                };
                debug!(proposed = %request.project_id, "storing project manually");
                backend.store_manual(&request).await?
            }
        };
        self.bind(project_id.clone());
        Ok(project_id)
    }

    /// Sends `message` about the bound project.
    ///
    /// Advances the version when the reply carries one. Transcript
    /// bookkeeping is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns a validation error while unbound or for a blank message, and
    /// the backend error when the call fails.
    pub async fn send_chat_message(
        &mut self,
        backend: &dyn BackendClient,
        message: &str,
    ) -> Result<ChatReply, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::validation("Message must not be empty"));
        }
        let project_id = self.bound_id()?.to_string();
        let reply = backend.send_chat(&project_id, message).await?;
        if let Some(version) = reply.project_version {
            info!(project_id = %project_id, version, "project version advanced");
            self.project_version = version;
        }
        Ok(reply)
    }

    /// Fetches the server-held history of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the call fails.
    pub async fn get_chat_history(
        &self,
        backend: &dyn BackendClient,
        project_id: &str,
    ) -> Result<Vec<ChatMessage>, AppError> {
        Ok(backend.chat_history(project_id).await?)
    }

    /// Project whose history should be reconciled now, if any.
    ///
    /// `None` while unbound, or when the bound project was already synced
    /// and `force` is off.
    #[must_use]
    pub fn pending_sync(&self, force: bool) -> Option<&str> {
        let project_id = self.project_id.as_deref()?;
        (force || self.last_synced_project.as_deref() != Some(project_id)).then_some(project_id)
    }

    /// Records that `project_id` has been reconciled.
    pub fn mark_synced(&mut self, project_id: &str) {
        self.last_synced_project = Some(project_id.to_string());
    }

    /// Drops the binding and resets the version. Transcripts are untouched.
    pub fn reset(&mut self) {
        self.project_id = None;
        self.project_version = 1;
    }

    /// Forgets every session field. Returns how many held a value.
    pub fn clear(&mut self) -> usize {
        let cleared = usize::from(self.project_id.is_some())
            + usize::from(self.project_id.is_some() || self.project_version != 1)
            + usize::from(self.last_synced_project.is_some());
        *self = Self::default();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::FixedClock;
    use crate::adapters::replaying::ReplayingBackend;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use crate::project::Project;
    use chrono::Utc;
    use serde_json::json;

    fn backend(interactions: &[(&str, serde_json::Value)]) -> ReplayingBackend {
        ReplayingBackend::new(CassetteReplayer::new(&Cassette {
            name: "session".into(),
            recorded_at: Utc::now(),
            backend_url: String::new(),
            interactions: interactions
                .iter()
                .enumerate()
                .map(|(seq, (method, output))| Interaction {
                    seq: seq as u64,
                    port: "backend".into(),
                    method: (*method).into(),
                    input: json!({}),
                    output: output.clone(),
                })
                .collect(),
        }))
    }

    fn generated(project_id: Option<&str>) -> GeneratedProject {
        GeneratedProject {
            files: [("/App.js", "app")].into_iter().collect::<Project>(),
            project_id: project_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn adopts_backend_assigned_id_without_a_call() {
        let mut session = ChatSession { project_version: 4, ..ChatSession::default() };
        let clock = FixedClock::parse("2025-03-15T14:30:00Z");

        let id = session.store_project(&backend(&[]), &clock, &generated(Some("p-1"))).await;

        assert_eq!(id.unwrap(), "p-1");
        assert_eq!(
            session.state(),
            SessionState::Bound { project_id: "p-1".into(), version: 1 }
        );
    }

    #[tokio::test]
    async fn stores_manually_when_no_id_was_assigned() {
        let mut session = ChatSession::default();
        let clock = FixedClock::parse("2025-03-15T14:30:00Z");
        let backend = backend(&[("store_manual", json!({"Ok": "manual-1742049000000"}))]);

        let id = session.store_project(&backend, &clock, &generated(None)).await.unwrap();

        assert_eq!(id, "manual-1742049000000");
        assert_eq!(session.project_id.as_deref(), Some("manual-1742049000000"));
    }

    #[tokio::test]
    async fn failed_manual_store_leaves_session_unbound() {
        let mut session = ChatSession::default();
        let clock = FixedClock::parse("2025-03-15T14:30:00Z");
        let backend =
            backend(&[("store_manual", json!({"Err": {"kind": "network", "detail": "refused"}}))]);

        assert!(session.store_project(&backend, &clock, &generated(None)).await.is_err());
        assert_eq!(session.state(), SessionState::Unbound);
    }

    #[tokio::test]
    async fn chat_requires_a_binding() {
        let mut session = ChatSession::default();
        let err = session.send_chat_message(&backend(&[]), "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn reply_with_version_advances_it() {
        let mut session = ChatSession::default();
        session.bind("p-1");
        let backend = backend(&[
            ("send_chat", json!({"Ok": {"message": "Done", "project_version": 2}})),
            ("send_chat", json!({"Ok": {"message": "Just talking"}})),
        ]);

        session.send_chat_message(&backend, "make background blue").await.unwrap();
        assert_eq!(session.project_version, 2);
        session.send_chat_message(&backend, "thanks").await.unwrap();
        assert_eq!(session.project_version, 2);
    }

    #[test]
    fn sync_is_pending_once_per_project_unless_forced() {
        let mut session = ChatSession::default();
        assert_eq!(session.pending_sync(true), None);

        session.bind("p-1");
        assert_eq!(session.pending_sync(false), Some("p-1"));
        session.mark_synced("p-1");
        assert_eq!(session.pending_sync(false), None);
        assert_eq!(session.pending_sync(true), Some("p-1"));
    }

    #[test]
    fn reset_keeps_sync_marker_but_clear_drops_everything() {
        let mut session = ChatSession::default();
        session.bind("p-1");
        session.mark_synced("p-1");
        session.project_version = 3;

        session.reset();
        assert_eq!(session.state(), SessionState::Unbound);
        assert_eq!(session.project_version, 1);
        assert_eq!(session.last_synced_project.as_deref(), Some("p-1"));

        session.bind("p-2");
        assert_eq!(session.clear(), 3);
        assert_eq!(session, ChatSession::default());
        assert_eq!(session.clear(), 0);
    }
}
