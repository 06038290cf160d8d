//! The persisted application document.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::{ChatSession, Transcripts};
use crate::generator::GeneratorForm;
use crate::project::ProjectState;
use crate::upload::UploadSet;

/// Store key of the application document.
pub const STATE_KEY: &str = "appgen-state";
/// Current layout version of [`AppState`].
pub const SCHEMA_VERSION: u32 = 1;

/// Everything that survives between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Layout version, see [`SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Current project and selected file.
    pub project: ProjectState,
    /// Last generator form values.
    pub form: GeneratorForm,
    /// Attached reference files.
    pub uploads: UploadSet,
    /// Chat binding.
    pub session: ChatSession,
    /// Chat transcripts keyed by project id.
    pub transcripts: Transcripts,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            project: ProjectState::default(),
            form: GeneratorForm::default(),
            uploads: UploadSet::default(),
            session: ChatSession::default(),
            transcripts: Transcripts::default(),
        }
    }
}

impl AppState {
    /// Accepts a loaded document, replacing it with the default when it was
    /// written by a newer layout.
    #[must_use]
    pub fn checked(self) -> Self {
        if self.schema_version > SCHEMA_VERSION {
            warn!(
                found = self.schema_version,
                supported = SCHEMA_VERSION,
                "state written by a newer version, starting fresh"
            );
            return Self::default();
        }
        Self { schema_version: SCHEMA_VERSION, ..self }
    }

    /// Clears the project-scoped state after a confirmed project reset:
    /// form, uploads, chat binding and every transcript.
    pub fn clear_after_reset(&mut self) {
        self.form = GeneratorForm::default();
        self.uploads.clear_all();
        self.session.clear();
        self.transcripts.clear_all();
    }
}
