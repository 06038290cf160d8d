//! Backend port for the remote project generator and chat service.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::error::BackendError;
use crate::project::Project;

/// Boxed future type alias used by [`BackendClient`] to keep the trait dyn-compatible.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// Body of a project generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// What the application should do, with any files context appended.
    pub description: String,
    /// Optional feature list.
    pub features: String,
}

/// A generated project and, when the backend already stored it, its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProject {
    /// Generated files.
    pub files: Project,
    /// Server-assigned project id.
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Body of a manual store request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRequest {
    /// Client-proposed id.
    pub project_id: String,
    /// Files to store.
    pub project_data: Project,
}

/// Successful answer to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text.
    pub message: String,
    /// New project files when the assistant modified the project.
    #[serde(default)]
    pub updated_project: Option<Project>,
    /// New project version when the assistant modified the project.
    #[serde(default)]
    pub project_version: Option<u64>,
}

/// Talks to the generator backend.
///
/// Implementations decode the `{success, ...}` envelopes once, so callers
/// only ever see `Ok(payload)` or a [`BackendError`].
pub trait BackendClient: Send + Sync {
    /// Generates a new project from a description.
    fn generate_project(&self, request: &GenerateRequest) -> BackendFuture<'_, GeneratedProject>;

    /// Stores a project that has no server id yet; returns the confirmed id.
    fn store_manual(&self, request: &StoreRequest) -> BackendFuture<'_, String>;

    /// Sends a chat message about a stored project.
    fn send_chat(&self, project_id: &str, message: &str) -> BackendFuture<'_, ChatReply>;

    /// Fetches the server-held chat history of a project.
    fn chat_history(&self, project_id: &str) -> BackendFuture<'_, Vec<ChatMessage>>;

    /// Fetches the server-held copy of a project.
    fn fetch_project(&self, project_id: &str) -> BackendFuture<'_, Project>;

    /// Extracts the text of a PDF document.
    fn extract_pdf_text(&self, file_name: &str, bytes: Vec<u8>) -> BackendFuture<'_, String>;
}
