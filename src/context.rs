//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};

use crate::adapters::live::backend::HttpBackend;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::recording::{RecordingBackend, RecordingClock};
use crate::adapters::replaying::{ReplayingBackend, ReplayingClock};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::chat::ChatMessage;
use crate::config::Settings;
use crate::ports::backend::{
    BackendClient, BackendFuture, ChatReply, GenerateRequest, GeneratedProject, StoreRequest,
};
use crate::ports::{Clock, FileSystem};
use crate::project::Project;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for state, imports and exports.
    pub fs: Box<dyn FileSystem>,
    /// Generator backend.
    pub backend: Box<dyn BackendClient>,
}

impl ServiceContext {
    /// Assembles a context from explicit adapters.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        fs: Box<dyn FileSystem>,
        backend: Box<dyn BackendClient>,
    ) -> Self {
        Self { clock, fs, backend }
    }

    /// Creates a live context talking to the configured backend.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self::new(
            Box::new(LiveClock),
            Box::new(LiveFileSystem),
            Box::new(HttpBackend::new(&settings.backend_url)),
        )
    }

    /// Creates a live context that records clock and backend interactions.
    ///
    /// Cassettes land in a fresh timestamped directory under `root`; the
    /// returned session must be finished after this context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(
        settings: &Settings,
        root: PathBuf,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(&root, &settings.backend_url)?;
        let ctx = Self::new(
            Box::new(RecordingClock::new(Box::new(LiveClock), session.clock.clone())),
            Box::new(LiveFileSystem),
            Box::new(RecordingBackend::new(
                Box::new(HttpBackend::new(&settings.backend_url)),
                session.backend.clone(),
            )),
        );
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Clock and backend are served from the cassette, each with its own
    /// cursor; the filesystem stays live.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette =
            Cassette::from_yaml(&content).map_err(|e| format!("{e} ({})", path.display()))?;
        Ok(Self::new(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            Box::new(LiveFileSystem),
            Box::new(ReplayingBackend::new(CassetteReplayer::new(&cassette))),
        ))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette file use a panicking adapter
    /// that fails with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self::new(
            match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            Box::new(LiveFileSystem),
            match replayers.backend {
                Some(r) => Box::new(ReplayingBackend::new(r)),
                None => Box::new(PanickingBackend),
            },
        ))
    }

    /// In-memory context for unit tests: fixed clock, no backend.
    #[cfg(test)]
    pub(crate) fn for_tests(fs: crate::adapters::memory::MemoryFileSystem) -> Self {
        Self::new(
            Box::new(crate::adapters::memory::FixedClock::parse("2025-03-15T14:30:00Z")),
            Box::new(fs),
            Box::new(PanickingBackend),
        )
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingBackend;
impl PanickingBackend {
    fn fail(method: &str) -> ! {
        panic!(
            "BackendClient port not configured in CassetteConfig: no cassette loaded for backend ({method})"
        );
    }
}
impl BackendClient for PanickingBackend {
    fn generate_project(&self, _request: &GenerateRequest) -> BackendFuture<'_, GeneratedProject> {
        Self::fail("generate_project")
    }
    fn store_manual(&self, _request: &StoreRequest) -> BackendFuture<'_, String> {
        Self::fail("store_manual")
    }
    fn send_chat(&self, _project_id: &str, _message: &str) -> BackendFuture<'_, ChatReply> {
        Self::fail("send_chat")
    }
    fn chat_history(&self, _project_id: &str) -> BackendFuture<'_, Vec<ChatMessage>> {
        Self::fail("chat_history")
    }
    fn fetch_project(&self, _project_id: &str) -> BackendFuture<'_, Project> {
        Self::fail("fetch_project")
    }
    fn extract_pdf_text(&self, _file_name: &str, _bytes: Vec<u8>) -> BackendFuture<'_, String> {
        Self::fail("extract_pdf_text")
    }
}
