//! Project export: JSON, ZIP, and the individual-file fallback.

pub mod archive;
pub mod individual;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::ports::{Clock, FileSystem};
use crate::project::Project;

pub use archive::{export_as_zip, normalize_entry_path, ZipArchiver};
pub use individual::export_as_individual_files;

/// Fixed file name of the JSON project export.
pub const PROJECT_EXPORT_FILE: &str = "react-native-project.json";

/// Which export path [`export_project`] took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A single ZIP archive.
    Archive(PathBuf),
    /// One file per project entry, after the archive failed.
    IndividualFiles(Vec<PathBuf>),
}

/// Default archive name, `react-project-<YYYYMMDDHHMMSS>` in UTC.
#[must_use]
pub fn default_archive_name(clock: &dyn Clock) -> String {
    format!("react-project-{}", clock.now().format("%Y%m%d%H%M%S"))
}

/// Writes the pretty-printed project to `<out_dir>/react-native-project.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_json(
    fs: &dyn FileSystem,
    project: &Project,
    out_dir: &Path,
) -> Result<PathBuf, AppError> {
    let path = out_dir.join(PROJECT_EXPORT_FILE);
    fs.write(&path, &project.to_json_pretty()?)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {e}", path.display())))?;
    Ok(path)
}

/// Exports as a ZIP archive, falling back to individual files.
///
/// # Errors
///
/// Returns a validation error for an empty project, or the fallback's
/// error when both paths fail.
pub async fn export_project(
    fs: &dyn FileSystem,
    project: &Project,
    name: &str,
    out_dir: &Path,
    stagger: Duration,
) -> Result<ExportOutcome, AppError> {
    if project.is_empty() {
        return Err(AppError::validation(
            "Nothing to export; generate or import a project first",
        ));
    }
    match export_as_zip(fs, project, name, out_dir) {
        Ok(path) => Ok(ExportOutcome::Archive(path)),
        Err(e) => {
            warn!(error = %e, "zip export failed, writing individual files");
            export_as_individual_files(fs, project, name, out_dir, stagger)
                .await
                .map(ExportOutcome::IndividualFiles)
        }
    }
}
