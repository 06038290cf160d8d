//! ZIP archive export.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::AppError;
use crate::ports::FileSystem;
use crate::project::Project;

/// Entry name used when a project path is empty after normalization.
pub const DEFAULT_ENTRY: &str = "index.js";
/// Content stored for files with no content.
pub const EMPTY_FILE_PLACEHOLDER: &str = "// empty file\n";

static ARCHIVER: OnceLock<ZipArchiver> = OnceLock::new();

/// Archive settings, loaded once per process and never released.
#[derive(Debug)]
pub struct ZipArchiver {
    method: CompressionMethod,
    level: i64,
}

impl ZipArchiver {
    /// The process-wide archiver.
    pub fn acquire() -> &'static Self {
        ARCHIVER.get_or_init(|| {
            debug!("zip archiver initialised");
            Self { method: CompressionMethod::Deflated, level: 6 }
        })
    }

    /// Builds an in-memory archive with one entry per project file.
    ///
    /// # Errors
    ///
    /// Returns an archive error if an entry cannot be written.
    pub fn archive(&self, project: &Project) -> Result<Vec<u8>, AppError> {
        let options = SimpleFileOptions::default()
            .compression_method(self.method)
            .compression_level(Some(self.level));
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for (path, content) in project.iter() {
            let entry = normalize_entry_path(path);
            let content = if content.is_empty() { EMPTY_FILE_PLACEHOLDER } else { content };
            zip.start_file(entry.as_str(), options)
                .map_err(|e| AppError::Archive(format!("{entry}: {e}")))?;
            zip.write_all(content.as_bytes())
                .map_err(|e| AppError::Archive(format!("{entry}: {e}")))?;
        }

        let cursor = zip.finish().map_err(|e| AppError::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Archive entry name for a project path: leading slash stripped, blank
/// becomes [`DEFAULT_ENTRY`].
#[must_use]
pub fn normalize_entry_path(path: &str) -> String {
    let clean = path.strip_prefix('/').unwrap_or(path);
    if clean.trim().is_empty() {
        DEFAULT_ENTRY.to_string()
    } else {
        clean.to_string()
    }
}

/// Writes `<out_dir>/<name>.zip` and returns its path.
///
/// # Errors
///
/// Returns an error if the archive cannot be built or written.
pub fn export_as_zip(
    fs: &dyn FileSystem,
    project: &Project,
    name: &str,
    out_dir: &Path,
) -> Result<PathBuf, AppError> {
    let bytes = ZipArchiver::acquire().archive(project)?;
    let path = out_dir.join(format!("{name}.zip"));
    fs.write_bytes(&path, &bytes)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {e}", path.display())))?;
    debug!(path = %path.display(), files = project.len(), bytes = bytes.len(), "wrote archive");
    Ok(path)
}
