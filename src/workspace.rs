//! The persisted application state plus the operations that change it.
//!
//! Every mutating operation writes the document back before returning, so
//! an interrupted command never loses more than the step in flight.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::chat::history::{export_file_name, reconcile};
use crate::chat::{ChatMessage, Reconciliation, Role};
use crate::context::ServiceContext;
use crate::error::{AppError, BackendError};
use crate::export::{self, ExportOutcome};
use crate::generator;
use crate::ports::backend::{ChatReply, GeneratedProject};
use crate::state::{AppState, PersistentState, STATE_KEY};
use crate::upload::{FileDescriptor, UploadOutcome};

/// Transcript entry appended when the backend could not be reached.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error. Check that the backend server is running.";

/// Loaded application state bound to a service context.
pub struct Workspace<'a> {
    ctx: &'a ServiceContext,
    persist: PersistentState<'a>,
    state: AppState,
}

impl<'a> Workspace<'a> {
    /// Loads the state kept under `state_dir`, or starts fresh.
    #[must_use]
    pub fn open(ctx: &'a ServiceContext, state_dir: &Path) -> Self {
        let persist = PersistentState::new(ctx, state_dir);
        let state = persist.load(STATE_KEY, AppState::default()).checked();
        Self { ctx, persist, state }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Writes the state back to the store.
    pub fn commit(&self) {
        self.persist.save(STATE_KEY, &self.state);
    }

    /// Updates the persisted generator form. `None` keeps a field as is.
    pub fn set_form(&mut self, description: Option<String>, features: Option<String>) {
        if let Some(description) = description {
            self.state.form.description = description;
        }
        if let Some(features) = features {
            self.state.form.features = features;
        }
        self.commit();
    }

    /// Generates a project from the persisted form and attached files.
    ///
    /// The files replace the current project; a backend-assigned id binds
    /// the chat session.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank description and the backend
    /// error when generation fails. State is unchanged in both cases.
    pub async fn generate(&mut self) -> Result<GeneratedProject, AppError> {
        let form = &self.state.form;
        let generated = generator::generate(
            self.ctx.backend.as_ref(),
            &form.description,
            &form.features,
            &self.state.uploads.files_context(),
        )
        .await?;

        self.state.project.import(generated.files.clone());
        if generated.project_id.is_some() {
            self.state
                .session
                .store_project(self.ctx.backend.as_ref(), self.ctx.clock.as_ref(), &generated)
                .await?;
        }
        self.commit();
        info!(files = generated.files.len(), "project generated");
        Ok(generated)
    }

    /// Imports a project from JSON text and tries to bind the chat to it.
    ///
    /// Returns the bound id; a failed bind is only logged.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the state untouched, when `text`
    /// is not a flat JSON object of string contents.
    pub async fn import_project_json(&mut self, text: &str) -> Result<Option<String>, AppError> {
        self.state.project.import_json(text)?;
        self.commit();

        let imported =
            GeneratedProject { files: self.state.project.files.clone(), project_id: None };
        let bound = self
            .state
            .session
            .store_project(self.ctx.backend.as_ref(), self.ctx.clock.as_ref(), &imported)
            .await;
        match bound {
            Ok(project_id) => {
                self.commit();
                Ok(Some(project_id))
            }
            Err(e) => {
                warn!(error = %e, "could not store the imported project for chat");
                Ok(None)
            }
        }
    }

    /// Restores the template after `confirm` agrees, clearing the form,
    /// attached files, chat binding and all transcripts.
    pub fn reset_project(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !self.state.project.reset(confirm) {
            return false;
        }
        self.state.clear_after_reset();
        self.commit();
        info!("project reset to template");
        true
    }

    /// Selects a project file for viewing.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `path` is not part of the project.
    pub fn select_file(&mut self, path: &str) -> Result<(), AppError> {
        self.state.project.select(path)?;
        self.commit();
        Ok(())
    }

    /// Attaches a reference file.
    ///
    /// # Errors
    ///
    /// Returns the read or extraction error; nothing is attached then.
    pub async fn add_file(&mut self, path: &Path) -> Result<UploadOutcome, AppError> {
        let outcome = self
            .state
            .uploads
            .add_file(self.ctx.fs.as_ref(), self.ctx.backend.as_ref(), path)
            .await?;
        if outcome == UploadOutcome::Added {
            self.commit();
        }
        Ok(outcome)
    }

    /// Detaches the reference file at `index`.
    pub fn remove_file(&mut self, index: usize) -> Option<FileDescriptor> {
        let removed = self.state.uploads.remove_file(index);
        if removed.is_some() {
            self.commit();
        }
        removed
    }

    /// Detaches every reference file.
    pub fn clear_files(&mut self) {
        self.state.uploads.clear_all();
        self.commit();
    }

    /// Sends a chat message about the bound project.
    ///
    /// The user message is stored before the call. Afterwards either the
    /// reply or an error note is appended, and any updated project files
    /// are imported. The transcript is never rolled back.
    ///
    /// # Errors
    ///
    /// Returns a validation error while unbound or for a blank message, and
    /// the backend error after the error note has been stored.
    pub async fn send_chat(&mut self, message: &str) -> Result<ChatReply, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::validation("Message must not be empty"));
        }
        let project_id = self.state.session.bound_id()?.to_string();

        let sent = ChatMessage::new(Role::User, message, self.ctx.clock.now());
        self.state.transcripts.push(&project_id, sent);
        self.commit();

        let result =
            self.state.session.send_chat_message(self.ctx.backend.as_ref(), message).await;
        let content = match &result {
            Ok(reply) => reply.message.clone(),
            Err(AppError::Backend(BackendError::Rejected(reason))) => format!("Error: {reason}"),
            Err(_) => CONNECTION_ERROR_MESSAGE.to_string(),
        };
        let answer = ChatMessage::new(Role::Assistant, content, self.ctx.clock.now());
        self.state.transcripts.push(&project_id, answer);

        if let Ok(ChatReply { updated_project: Some(files), .. }) = &result {
            self.state.project.import(files.clone());
        }
        self.commit();
        result
    }

    /// Reconciles the local transcript of the bound project with the
    /// server copy, once per project unless `force` is set.
    ///
    /// Returns `None` when nothing was attempted or the fetch failed; a
    /// failed fetch still counts as synced.
    pub async fn sync_history(&mut self, force: bool) -> Option<Reconciliation> {
        let project_id = self.state.session.pending_sync(force)?.to_string();
        let fetched =
            self.state.session.get_chat_history(self.ctx.backend.as_ref(), &project_id).await;

        let outcome = match fetched {
            Ok(server) => Some(reconcile(self.state.transcripts.messages_mut(&project_id), server)),
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "failed to load chat history");
                None
            }
        };
        self.state.session.mark_synced(&project_id);
        self.commit();
        outcome
    }

    /// Transcript of the bound project; empty while unbound.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        match &self.state.session.project_id {
            Some(id) => self.state.transcripts.messages(id),
            None => &[],
        }
    }

    /// Replaces the project with the server-held copy of the bound project.
    ///
    /// Returns the number of files fetched.
    ///
    /// # Errors
    ///
    /// Returns a validation error while unbound and the backend error when
    /// the fetch fails.
    pub async fn fetch_remote_project(&mut self) -> Result<usize, AppError> {
        let project_id = self.state.session.bound_id()?.to_string();
        let files = self.ctx.backend.fetch_project(&project_id).await?;
        let count = files.len();
        self.state.project.import(files);
        self.commit();
        Ok(count)
    }

    /// Writes the project JSON export into `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export_project_json(&self, out_dir: &Path) -> Result<PathBuf, AppError> {
        export::export_json(self.ctx.fs.as_ref(), &self.state.project.files, out_dir)
    }

    /// Exports the project as a ZIP archive, or as individual files when the
    /// archive fails. `name` defaults to a timestamped project name.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty project and the write error
    /// when both export paths fail.
    pub async fn export_zip(
        &self,
        name: Option<&str>,
        out_dir: &Path,
        stagger: Duration,
    ) -> Result<ExportOutcome, AppError> {
        let name = name.map_or_else(
            || export::default_archive_name(self.ctx.clock.as_ref()),
            String::from,
        );
        let files = &self.state.project.files;
        export::export_project(self.ctx.fs.as_ref(), files, &name, out_dir, stagger).await
    }

    /// Writes the transcript of `project_id` into `out_dir`.
    ///
    /// Returns `None` when the project has no transcript.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export_chat_history(
        &self,
        project_id: &str,
        out_dir: &Path,
    ) -> Result<Option<PathBuf>, AppError> {
        let Some(export) = self.state.transcripts.export(project_id, self.ctx.clock.now()) else {
            return Ok(None);
        };
        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| AppError::Io(format!("Failed to serialize chat history: {e}")))?;
        let path = out_dir.join(export_file_name(project_id));
        self.ctx
            .fs
            .write(&path, &json)
            .map_err(|e| AppError::Io(format!("Failed to write {}: {e}", path.display())))?;
        Ok(Some(path))
    }

    /// Drops the transcript of `project_id`. Returns whether one existed.
    pub fn clear_project_chat_history(&mut self, project_id: &str) -> bool {
        let removed = self.state.transcripts.clear_project(project_id);
        if removed {
            self.commit();
        }
        removed
    }

    /// Drops every transcript and the chat session fields. Returns how
    /// many items were cleared.
    pub fn clear_all_chat_data(&mut self) -> usize {
        let cleared = self.state.transcripts.clear_all() + self.state.session.clear();
        self.commit();
        info!(cleared, "cleared chat data");
        cleared
    }

    /// Project ids that have a stored transcript.
    #[must_use]
    pub fn stored_chat_projects(&self) -> Vec<String> {
        self.state.transcripts.project_ids()
    }
}
