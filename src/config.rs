//! Runtime settings.
//!
//! Resolved once per invocation from, in increasing precedence: built-in
//! defaults, an optional YAML file, and `APPGEN_*` environment variables
//! (after `.env` has been loaded by the binary).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default location of the generator backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
/// Config file read when neither `--config` nor `APPGEN_CONFIG` names one.
pub const DEFAULT_CONFIG_FILE: &str = "appgen.yaml";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the generator backend.
    pub backend_url: String,
    /// Directory holding the persisted application state.
    pub state_dir: PathBuf,
    /// Directory exports are written to.
    pub out_dir: PathBuf,
    /// Delay step between files in the individual-file export fallback.
    pub export_stagger: Duration,
    /// `tracing` filter directive.
    pub log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            state_dir: PathBuf::from(".appgen"),
            out_dir: PathBuf::from("."),
            export_stagger: Duration::from_millis(300),
            log: "warn".to_string(),
        }
    }
}

/// Shape of the YAML config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    state_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    export_stagger_ms: Option<u64>,
    log: Option<String>,
}

impl Settings {
    /// Loads settings from the process environment and the config file.
    ///
    /// `config` overrides `APPGEN_CONFIG`; a missing default file is fine,
    /// a missing explicitly named one is not.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed, or an
    /// environment value is malformed.
    pub fn load(config: Option<&Path>) -> Result<Self, String> {
        let explicit = config
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("APPGEN_CONFIG").map(PathBuf::from));
        let file = match explicit {
            Some(path) => Some(read_file(&path)?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() { Some(read_file(path)?) } else { None }
            }
        };
        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds settings from YAML text and an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `yaml` does not parse or a numeric value is malformed.
    pub fn from_sources(
        yaml: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let file: FileSettings = match yaml {
            Some(text) if !text.trim().is_empty() => serde_yaml::from_str(text)
                .map_err(|e| format!("Failed to parse config file: {e}"))?,
            _ => FileSettings::default(),
        };

        let mut settings = Self::default();
        if let Some(url) = env("APPGEN_BACKEND_URL").or(file.backend_url) {
            settings.backend_url = url;
        }
        if let Some(dir) = env("APPGEN_STATE_DIR").map(PathBuf::from).or(file.state_dir) {
            settings.state_dir = dir;
        }
        if let Some(dir) = env("APPGEN_OUT_DIR").map(PathBuf::from).or(file.out_dir) {
            settings.out_dir = dir;
        }
        let stagger = match env("APPGEN_EXPORT_STAGGER_MS") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| format!("Invalid APPGEN_EXPORT_STAGGER_MS `{raw}`: {e}"))?,
            ),
            None => file.export_stagger_ms,
        };
        if let Some(ms) = stagger {
            settings.export_stagger = Duration::from_millis(ms);
        }
        if let Some(log) = env("APPGEN_LOG").or_else(|| env("RUST_LOG")).or(file.log) {
            settings.log = log;
        }
        Ok(settings)
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))
}
