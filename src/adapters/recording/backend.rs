//! Recording adapter for the `BackendClient` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::backend::{
    BackendClient, BackendFuture, ChatReply, GenerateRequest, GeneratedProject, StoreRequest,
};
use crate::chat::ChatMessage;
use crate::project::Project;

/// Records backend calls while delegating to an inner implementation.
pub struct RecordingBackend {
    inner: Box<dyn BackendClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBackend {
    /// Creates a new recording backend wrapping the given implementation.
    pub fn new(inner: Box<dyn BackendClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ProjectIdInput<'a> {
    project_id: &'a str,
}

#[derive(Serialize)]
struct ChatInput<'a> {
    project_id: &'a str,
    message: &'a str,
}

/// PDF bodies are not stored in cassettes; name and size identify the call.
#[derive(Serialize)]
struct PdfInput<'a> {
    file_name: &'a str,
    size: usize,
}

impl BackendClient for RecordingBackend {
    fn generate_project(&self, request: &GenerateRequest) -> BackendFuture<'_, GeneratedProject> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate_project(&request).await;
            record_result(&self.recorder, "backend", "generate_project", &request, &result);
            result
        })
    }

    fn store_manual(&self, request: &StoreRequest) -> BackendFuture<'_, String> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.store_manual(&request).await;
            record_result(&self.recorder, "backend", "store_manual", &request, &result);
            result
        })
    }

    fn send_chat(&self, project_id: &str, message: &str) -> BackendFuture<'_, ChatReply> {
        let project_id = project_id.to_string();
        let message = message.to_string();
        Box::pin(async move {
            let result = self.inner.send_chat(&project_id, &message).await;
            let input = ChatInput { project_id: &project_id, message: &message };
            record_result(&self.recorder, "backend", "send_chat", &input, &result);
            result
        })
    }

    fn chat_history(&self, project_id: &str) -> BackendFuture<'_, Vec<ChatMessage>> {
        let project_id = project_id.to_string();
        Box::pin(async move {
            let result = self.inner.chat_history(&project_id).await;
            let input = ProjectIdInput { project_id: &project_id };
            record_result(&self.recorder, "backend", "chat_history", &input, &result);
            result
        })
    }

    fn fetch_project(&self, project_id: &str) -> BackendFuture<'_, Project> {
        let project_id = project_id.to_string();
        Box::pin(async move {
            let result = self.inner.fetch_project(&project_id).await;
            let input = ProjectIdInput { project_id: &project_id };
            record_result(&self.recorder, "backend", "fetch_project", &input, &result);
            result
        })
    }

    fn extract_pdf_text(&self, file_name: &str, bytes: Vec<u8>) -> BackendFuture<'_, String> {
        let file_name = file_name.to_string();
        let size = bytes.len();
        Box::pin(async move {
            let result = self.inner.extract_pdf_text(&file_name, bytes).await;
            let input = PdfInput { file_name: &file_name, size };
            record_result(&self.recorder, "backend", "extract_pdf_text", &input, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::ReplayingBackend;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use crate::error::BackendError;
    use chrono::Utc;
    use serde_json::json;

    fn replaying(interactions: Vec<Interaction>) -> ReplayingBackend {
        ReplayingBackend::new(CassetteReplayer::new(&Cassette {
            name: "inner".into(),
            recorded_at: Utc::now(),
            backend_url: String::new(),
            interactions,
        }))
    }

    #[tokio::test]
    async fn records_results_and_errors() {
        let inner = replaying(vec![
            Interaction {
                seq: 0,
                port: "backend".into(),
                method: "send_chat".into(),
                input: json!({}),
                output: json!({"Ok": {"message": "Done", "project_version": 2}}),
            },
            Interaction {
                seq: 1,
                port: "backend".into(),
                method: "chat_history".into(),
                input: json!({}),
                output: json!({"Err": {"kind": "network", "detail": "connection refused"}}),
            },
        ]);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("/unused", "rec", "")));

        {
            let backend = RecordingBackend::new(Box::new(inner), Arc::clone(&recorder));
            let reply = backend.send_chat("p-1", "make background blue").await.unwrap();
            assert_eq!(reply.project_version, Some(2));
            let err = backend.chat_history("p-1").await.unwrap_err();
            assert_eq!(err, BackendError::Network("connection refused".into()));
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        assert_eq!(recorder.len(), 2);
    }
}
