//! Reference files attached to generation requests.
//!
//! Text files are read as UTF-8; PDFs are sent to the backend for text
//! extraction. The extracted text is folded into the generation prompt by
//! [`UploadSet::files_context`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::ports::{BackendClient, FileSystem};

const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Metadata of one attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name without directories.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Media type guessed from the extension; empty when unknown.
    #[serde(rename = "type")]
    pub media_type: String,
}

impl FileDescriptor {
    /// Whether the file is handled as a PDF.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE || self.name.to_lowercase().ends_with(".pdf")
    }

    /// Label shown in the files context: `PDF`, or the upper-cased extension.
    #[must_use]
    pub fn type_label(&self) -> String {
        if self.is_pdf() {
            return "PDF".to_string();
        }
        self.name.rsplit('.').next().unwrap_or_default().to_uppercase()
    }

    /// Key of this file's text in [`UploadSet::contents`]. Name and size
    /// together identify an attachment.
    #[must_use]
    pub fn content_key(&self) -> String {
        format!("{}:{}", self.size, self.name)
    }
}

/// Result of [`UploadSet::add_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The file was read and attached.
    Added,
    /// A file with the same name and size is already attached.
    Duplicate,
}

/// Attached files and their text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSet {
    /// Descriptors in attachment order.
    pub files: Vec<FileDescriptor>,
    /// Text content keyed by [`FileDescriptor::content_key`].
    pub contents: BTreeMap<String, String>,
}

impl UploadSet {
    /// Attaches the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not UTF-8 text, or
    /// PDF extraction fails. Nothing is attached in that case.
    pub async fn add_file(
        &mut self,
        fs: &dyn FileSystem,
        backend: &dyn BackendClient,
        path: &Path,
    ) -> Result<UploadOutcome, AppError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::validation(format!("Not a file: {}", path.display())))?;
        let bytes = fs
            .read_bytes(path)
            .map_err(|e| AppError::Io(format!("Failed to read {}: {e}", path.display())))?;
        let descriptor = FileDescriptor {
            size: bytes.len() as u64,
            media_type: media_type_for(&name).to_string(),
            name,
        };

        if self.files.iter().any(|f| f.name == descriptor.name && f.size == descriptor.size) {
            warn!(name = %descriptor.name, "file already attached");
            return Ok(UploadOutcome::Duplicate);
        }

        let content = if descriptor.is_pdf() {
            debug!(name = %descriptor.name, size = descriptor.size, "extracting PDF text");
            backend.extract_pdf_text(&descriptor.name, bytes).await?
        } else {
            String::from_utf8(bytes).map_err(|_| {
                AppError::Io(format!("{} is not a UTF-8 text file", descriptor.name))
            })?
        };

        self.contents.insert(descriptor.content_key(), content);
        self.files.push(descriptor);
        Ok(UploadOutcome::Added)
    }

    /// Detaches the file at `index`. Out of range is a no-op.
    pub fn remove_file(&mut self, index: usize) -> Option<FileDescriptor> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        self.contents.remove(&removed.content_key());
        Some(removed)
    }

    /// Detaches everything.
    pub fn clear_all(&mut self) {
        self.files.clear();
        self.contents.clear();
    }

    /// Text block appended to the generation description.
    ///
    /// Empty when nothing is attached. Files without content are skipped.
    #[must_use]
    pub fn files_context(&self) -> String {
        if self.files.is_empty() {
            return String::new();
        }

        let mut context = String::from("\n\n--- REFERENCE FILES ---\n");
        for file in &self.files {
            let Some(content) = self.contents.get(&file.content_key()).filter(|c| !c.is_empty()) else {
                continue;
            };
            context.push_str(&format!("\n📄 {} ({}):\n", file.name, file.type_label()));
            context.push_str("```\n");
            context.push_str(content);
            context.push_str("\n```\n");
        }
        context.push_str("\n--- END OF REFERENCE FILES ---\n");
        context.push_str(
            "Please take the content of these files into account when generating the project.\n",
        );
        context
    }
}

/// Media type for a file name, by extension.
#[must_use]
pub fn media_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "txt" => "text/plain",
        "md" => "text/markdown",
        "json" => "application/json",
        "js" | "jsx" => "text/javascript",
        "ts" | "tsx" => "application/typescript",
        "css" => "text/css",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "yaml" | "yml" => "application/yaml",
        _ => "",
    }
}
