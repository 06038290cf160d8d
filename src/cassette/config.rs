//! Cassette configuration for composable per-port replay.

use std::path::PathBuf;

use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path panic if called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
    /// Path to the backend port cassette file.
    pub backend: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the backend port.
    pub backend: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Config for the per-port files written by a recording session in `dir`.
    #[must_use]
    pub fn from_session_dir(dir: &std::path::Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self { clock: existing("clock"), backend: existing("backend") }
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            clock: self.clock.as_deref().map(CassetteReplayer::from_file).transpose()?,
            backend: self.backend.as_deref().map(CassetteReplayer::from_file).transpose()?,
        })
    }
}
