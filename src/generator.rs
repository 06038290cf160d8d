//! Project generation requests.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::ports::backend::{BackendClient, GenerateRequest, GeneratedProject};

/// Generator form fields, persisted between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorForm {
    /// What the application should do.
    pub description: String,
    /// Optional feature list.
    pub features: String,
}

/// Asks the backend to generate a project.
///
/// `files_context` is appended verbatim to the description.
///
/// # Errors
///
/// Returns a validation error for a blank description, before any network
/// call, and the backend error when generation fails.
pub async fn generate(
    backend: &dyn BackendClient,
    description: &str,
    features: &str,
    files_context: &str,
) -> Result<GeneratedProject, AppError> {
    if description.trim().is_empty() {
        return Err(AppError::validation("Please describe the application to generate"));
    }
    let request = GenerateRequest {
        description: format!("{description}{files_context}"),
        features: features.to_string(),
    };
    debug!(chars = request.description.len(), "requesting project generation");
    Ok(backend.generate_project(&request).await?)
}
