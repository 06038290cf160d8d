//! Live adapter for the `BackendClient` port over HTTP.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::ChatMessage;
use crate::error::BackendError;
use crate::ports::backend::{
    BackendClient, BackendFuture, ChatReply, GenerateRequest, GeneratedProject, StoreRequest,
};
use crate::project::Project;

const GENERIC_FAILURE: &str = "An error occurred";

/// Live backend client talking JSON over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url` (no trailing path).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { client: Client::new(), base_url: base_url.trim_end_matches('/').to_string() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// URL of a per-project route. Each segment is percent-encoded, so an id
    /// containing `/`, `?` or `#` stays one path segment.
    fn project_url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let invalid = || BackendError::Network(format!("invalid backend URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|()| invalid())?.pop_if_empty().extend(segments);
        Ok(url)
    }
}

/// `project_data` is either a flat file map or `{files, project_id}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectPayload {
    Envelope {
        files: Project,
        #[serde(default)]
        project_id: Option<String>,
    },
    Flat(Project),
}

impl From<ProjectPayload> for GeneratedProject {
    fn from(payload: ProjectPayload) -> Self {
        match payload {
            ProjectPayload::Envelope { files, project_id } => Self { files, project_id },
            ProjectPayload::Flat(files) => Self { files, project_id: None },
        }
    }
}

#[derive(Deserialize)]
struct GenerateEnvelope {
    success: bool,
    project_data: Option<ProjectPayload>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct StoreEnvelope {
    project_id: String,
}

#[derive(Deserialize)]
struct ChatEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    updated_project: Option<Project>,
    #[serde(default)]
    project_version: Option<u64>,
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    success: bool,
    #[serde(default)]
    chat_history: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ProjectEnvelope {
    success: bool,
    project_data: Option<ProjectPayload>,
}

#[derive(Deserialize)]
struct PdfEnvelope {
    success: bool,
    text_content: Option<String>,
    error: Option<String>,
}

/// FastAPI error body. `detail` is a string, or a list for validation errors.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

fn network(e: &reqwest::Error) -> BackendError {
    BackendError::Network(e.to_string())
}

/// Decodes a response, turning non-2xx statuses into [`BackendError::Status`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| network(&e))?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody { detail: serde_json::Value::String(s) }) => s,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) => text,
        };
        return Err(BackendError::Status { status: status.as_u16(), message });
    }

    serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
}

impl BackendClient for HttpBackend {
    fn generate_project(&self, request: &GenerateRequest) -> BackendFuture<'_, GeneratedProject> {
        let body = request.clone();
        Box::pin(async move {
            debug!(chars = body.description.len(), "POST /generate-project");
            let response = self
                .client
                .post(self.url("/generate-project"))
                .json(&body)
                .send()
                .await
                .map_err(|e| network(&e))?;
            let envelope: GenerateEnvelope = read_json(response).await?;
            match envelope {
                GenerateEnvelope { success: true, project_data: Some(data), .. } => Ok(data.into()),
                GenerateEnvelope { error, .. } => {
                    Err(BackendError::Rejected(error.unwrap_or_else(|| GENERIC_FAILURE.into())))
                }
            }
        })
    }

    fn store_manual(&self, request: &StoreRequest) -> BackendFuture<'_, String> {
        let body = request.clone();
        Box::pin(async move {
            debug!(project_id = %body.project_id, "POST /api/chat/projects/store-manual");
            let response = self
                .client
                .post(self.url("/api/chat/projects/store-manual"))
                .json(&body)
                .send()
                .await
                .map_err(|e| network(&e))?;
            let envelope: StoreEnvelope = read_json(response).await?;
            Ok(envelope.project_id)
        })
    }

    fn send_chat(&self, project_id: &str, message: &str) -> BackendFuture<'_, ChatReply> {
        let url = self.project_url(&["api", "chat", "chat", project_id]);
        let message = message.to_string();
        Box::pin(async move {
            let url = url?;
            debug!(%url, "POST chat message");
            let response = self
                .client
                .post(url)
                .json(&ChatBody { message: &message })
                .send()
                .await
                .map_err(|e| network(&e))?;
            let envelope: ChatEnvelope = read_json(response).await?;
            if !envelope.success {
                return Err(BackendError::Rejected(
                    envelope.message.unwrap_or_else(|| GENERIC_FAILURE.into()),
                ));
            }
            Ok(ChatReply {
                message: envelope.message.unwrap_or_default(),
                updated_project: envelope.updated_project,
                project_version: envelope.project_version,
            })
        })
    }

    fn chat_history(&self, project_id: &str) -> BackendFuture<'_, Vec<ChatMessage>> {
        let url = self.project_url(&["api", "chat", "chat", project_id, "history"]);
        Box::pin(async move {
            let url = url?;
            debug!(%url, "GET chat history");
            let response = self.client.get(url).send().await.map_err(|e| network(&e))?;
            let envelope: HistoryEnvelope = read_json(response).await?;
            if !envelope.success {
                return Err(BackendError::Rejected("chat history unavailable".into()));
            }
            Ok(envelope.chat_history)
        })
    }

    fn fetch_project(&self, project_id: &str) -> BackendFuture<'_, Project> {
        let url = self.project_url(&["api", "chat", "projects", project_id]);
        Box::pin(async move {
            let url = url?;
            debug!(%url, "GET stored project");
            let response = self.client.get(url).send().await.map_err(|e| network(&e))?;
            let envelope: ProjectEnvelope = read_json(response).await?;
            match envelope {
                ProjectEnvelope { success: true, project_data: Some(data) } => {
                    Ok(GeneratedProject::from(data).files)
                }
                _ => Err(BackendError::Rejected("project not found".into())),
            }
        })
    }

    fn extract_pdf_text(&self, file_name: &str, bytes: Vec<u8>) -> BackendFuture<'_, String> {
        let file_name = file_name.to_string();
        Box::pin(async move {
            debug!(%file_name, size = bytes.len(), "POST /api/pdf/extract-pdf-text");
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("application/pdf")
                .map_err(|e| network(&e))?;
            let response = self
                .client
                .post(self.url("/api/pdf/extract-pdf-text"))
                .multipart(Form::new().part("file", part))
                .send()
                .await
                .map_err(|e| network(&e))?;
            let envelope: PdfEnvelope = read_json(response).await?;
            match envelope {
                PdfEnvelope { success: true, text_content: Some(text), .. } if !text.is_empty() => {
                    Ok(text)
                }
                PdfEnvelope { error, .. } => Err(BackendError::Rejected(
                    error.unwrap_or_else(|| "could not extract text from the PDF".into()),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn server() -> mockito::ServerGuard {
        mockito::Server::new_async().await
    }

    #[tokio::test]
    async fn generate_decodes_flat_project_in_order() {
        let mut server = server().await;
        let mock = server
            .mock("POST", "/generate-project")
            .match_body(mockito::Matcher::PartialJson(
                serde_json::json!({"description": "todo app"}),
            ))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success": true, "project_data": {"/index.js": "i", "/App.js": "a"}}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let generated = backend
            .generate_project(&GenerateRequest {
                description: "todo app".into(),
                features: String::new(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(generated.project_id, None);
        assert_eq!(generated.files.paths().collect::<Vec<_>>(), ["/index.js", "/App.js"]);
    }

    #[tokio::test]
    async fn generate_decodes_envelope_with_project_id() {
        let mut server = server().await;
        server
            .mock("POST", "/generate-project")
            .with_body(
                r#"{"success": true, "project_data": {"files": {"/App.js": "a"}, "project_id": "p-1"}}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let generated = backend
            .generate_project(&GenerateRequest { description: "x".into(), features: String::new() })
            .await
            .unwrap();

        assert_eq!(generated.project_id.as_deref(), Some("p-1"));
        assert_eq!(generated.files.get("/App.js"), Some("a"));
    }

    #[tokio::test]
    async fn generate_surfaces_rejection_message_untouched() {
        let mut server = server().await;
        server
            .mock("POST", "/generate-project")
            .with_body(r#"{"success": false, "error": "LLM quota exceeded"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let err = backend
            .generate_project(&GenerateRequest { description: "x".into(), features: String::new() })
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Rejected("LLM quota exceeded".into()));
    }

    #[tokio::test]
    async fn non_success_status_uses_fastapi_detail() {
        let mut server = server().await;
        server
            .mock("GET", "/api/chat/chat/p-9/history")
            .with_status(404)
            .with_body(r#"{"detail": "Project not found"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let err = backend.chat_history("p-9").await.unwrap_err();

        assert_eq!(err, BackendError::Status { status: 404, message: "Project not found".into() });
    }

    #[tokio::test]
    async fn chat_reply_carries_update_and_version() {
        let mut server = server().await;
        server
            .mock("POST", "/api/chat/chat/p-1")
            .match_body(mockito::Matcher::Json(serde_json::json!({"message": "make background blue"})))
            .with_body(
                r#"{"success": true, "message": "Done", "updated_project": {"/App.js": "blue"}, "project_version": 2}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let reply = backend.send_chat("p-1", "make background blue").await.unwrap();

        assert_eq!(reply.message, "Done");
        assert_eq!(reply.project_version, Some(2));
        assert_eq!(reply.updated_project.unwrap().get("/App.js"), Some("blue"));
    }

    #[tokio::test]
    async fn store_manual_returns_confirmed_id() {
        let mut server = server().await;
        server
            .mock("POST", "/api/chat/projects/store-manual")
            .with_body(r#"{"success": true, "project_id": "server-42"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(&format!("{}/", server.url()));
        let id = backend
            .store_manual(&StoreRequest { project_id: "manual-1".into(), project_data: Project::new() })
            .await
            .unwrap();

        assert_eq!(id, "server-42");
    }

    #[tokio::test]
    async fn pdf_text_is_extracted_via_multipart() {
        let mut server = server().await;
        server
            .mock("POST", "/api/pdf/extract-pdf-text")
            .match_header(
                "content-type",
                mockito::Matcher::Regex("multipart/form-data".into()),
            )
            .with_body(r#"{"success": true, "filename": "brief.pdf", "text_content": "Hello PDF"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let text = backend.extract_pdf_text("brief.pdf", b"%PDF-1.4".to_vec()).await.unwrap();

        assert_eq!(text, "Hello PDF");
    }

    #[tokio::test]
    async fn history_decodes_messages_and_ignores_current_project() {
        let mut server = server().await;
        server
            .mock("GET", "/api/chat/chat/p-3/history")
            .with_body(
                r#"{"success": true, "chat_history": [
                    {"role": "user", "content": "add a footer", "timestamp": "2025-03-15T14:30:00.000Z"},
                    {"role": "assistant", "content": "Footer added"}
                ], "current_project": {"/App.js": "footer"}}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let history = backend.chat_history("p-3").await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, crate::chat::Role::User);
        assert_eq!(history[0].timestamp, "2025-03-15T14:30:00.000Z");
        assert_eq!(history[1].content, "Footer added");
        assert_eq!(history[1].timestamp, "");
    }

    #[tokio::test]
    async fn fetch_project_decodes_stored_files() {
        let mut server = server().await;
        server
            .mock("GET", "/api/chat/projects/p-3")
            .with_body(
                r#"{"success": true, "project_id": "p-3", "project_data": {"files": {"/index.js": "i", "/App.js": "a"}, "project_id": "p-3"}}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let project = backend.fetch_project("p-3").await.unwrap();

        assert_eq!(project.paths().collect::<Vec<_>>(), ["/index.js", "/App.js"]);
    }

    #[tokio::test]
    async fn fetch_missing_project_maps_detail_to_status() {
        let mut server = server().await;
        server
            .mock("GET", "/api/chat/projects/p-404")
            .with_status(404)
            .with_body(r#"{"detail": "Project not found"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let err = backend.fetch_project("p-404").await.unwrap_err();

        assert_eq!(err, BackendError::Status { status: 404, message: "Project not found".into() });
    }

    #[tokio::test]
    async fn project_ids_are_percent_encoded_in_paths() {
        let mut server = server().await;
        let mock = server
            .mock("GET", "/api/chat/chat/team%2Fapp%3Fv%231/history")
            .with_body(r#"{"success": true, "chat_history": []}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(&server.url());
        let history = backend.chat_history("team/app?v#1").await.unwrap();

        mock.assert_async().await;
        assert!(history.is_empty());
    }

    #[test]
    fn project_url_keeps_base_path_prefix() {
        let backend = HttpBackend::new("http://localhost:8000/backend/");
        let url = backend.project_url(&["api", "chat", "projects", "a b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/backend/api/chat/projects/a%20b");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let backend = HttpBackend::new("http://127.0.0.1:1");
        let err = backend.fetch_project("p-1").await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
    }
}
