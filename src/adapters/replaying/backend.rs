//! Replaying adapter for the `BackendClient` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::chat::ChatMessage;
use crate::ports::backend::{
    BackendClient, BackendFuture, ChatReply, GenerateRequest, GeneratedProject, StoreRequest,
};
use crate::project::Project;

/// Serves recorded backend responses from a cassette.
///
/// Inputs are not matched; calls are answered in recorded order per method.
pub struct ReplayingBackend {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingBackend {
    /// Create a replaying backend from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn answer<T>(&self, method: &'static str) -> BackendFuture<'_, T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let output = next_output(&self.replayer, "backend", method);
        Box::pin(async move { replay_result(output, method) })
    }
}

impl BackendClient for ReplayingBackend {
    fn generate_project(&self, _request: &GenerateRequest) -> BackendFuture<'_, GeneratedProject> {
        self.answer("generate_project")
    }

    fn store_manual(&self, _request: &StoreRequest) -> BackendFuture<'_, String> {
        self.answer("store_manual")
    }

    fn send_chat(&self, _project_id: &str, _message: &str) -> BackendFuture<'_, ChatReply> {
        self.answer("send_chat")
    }

    fn chat_history(&self, _project_id: &str) -> BackendFuture<'_, Vec<ChatMessage>> {
        self.answer("chat_history")
    }

    fn fetch_project(&self, _project_id: &str) -> BackendFuture<'_, Project> {
        self.answer("fetch_project")
    }

    fn extract_pdf_text(&self, _file_name: &str, _bytes: Vec<u8>) -> BackendFuture<'_, String> {
        self.answer("extract_pdf_text")
    }
}
