//! One-file-per-entry export, used when the archive cannot be produced.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::AppError;
use crate::ports::FileSystem;
use crate::project::Project;

const EMPTY_FILE_PLACEHOLDER: &str = "// empty file";

/// Flat file name for a project path: leading slash stripped, `/` turned
/// into `-`, blank becomes `file-<index>.txt`.
#[must_use]
pub fn flat_file_name(path: &str, index: usize) -> String {
    let clean = path.strip_prefix('/').unwrap_or(path);
    if clean.is_empty() {
        format!("file-{index}.txt")
    } else {
        clean.replace('/', "-")
    }
}

/// Writes each file to `<out_dir>/<name>/<flat name>`, one `stagger` apart.
///
/// Returns the written paths in project order.
///
/// # Errors
///
/// Returns an error on the first file that cannot be written; earlier
/// files stay on disk.
pub async fn export_as_individual_files(
    fs: &dyn FileSystem,
    project: &Project,
    name: &str,
    out_dir: &Path,
    stagger: Duration,
) -> Result<Vec<PathBuf>, AppError> {
    let dir = out_dir.join(name);
    let mut written = Vec::with_capacity(project.len());

    for (index, (path, content)) in project.iter().enumerate() {
        if index > 0 && !stagger.is_zero() {
            tokio::time::sleep(stagger).await;
        }
        let target = dir.join(flat_file_name(path, index));
        let content = if content.is_empty() { EMPTY_FILE_PLACEHOLDER } else { content };
        fs.write(&target, content)
            .map_err(|e| AppError::Io(format!("Failed to write {}: {e}", target.display())))?;
        debug!(path = %target.display(), "wrote file");
        written.push(target);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn flat_names() {
        assert_eq!(flat_file_name("/components/Button.js", 1), "components-Button.js");
        assert_eq!(flat_file_name("App.js", 0), "App.js");
        assert_eq!(flat_file_name("/", 3), "file-3.txt");
    }

    #[tokio::test(start_paused = true)]
    async fn writes_every_file_with_a_stagger() {
        let fs = MemoryFileSystem::new();
        let project: Project =
            [("/App.js", "app"), ("/components/Button.js", ""), ("/", "x")].into_iter().collect();

        let started = tokio::time::Instant::now();
        let written = export_as_individual_files(
            &fs,
            &project,
            "react-project-1",
            Path::new("/out"),
            Duration::from_millis(300),
        )
        .await
        .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(600));
        assert_eq!(
            written,
            [
                PathBuf::from("/out/react-project-1/App.js"),
                PathBuf::from("/out/react-project-1/components-Button.js"),
                PathBuf::from("/out/react-project-1/file-2.txt"),
            ]
        );
        assert_eq!(
            fs.read_to_string(Path::new("/out/react-project-1/components-Button.js")).unwrap(),
            "// empty file"
        );
    }

    #[tokio::test]
    async fn files_sharing_a_stem_all_survive_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let project: Project =
            [("/notes.tmp", "keep me"), ("/notes.js", "code")].into_iter().collect();

        let written = export_as_individual_files(
            &crate::adapters::live::filesystem::LiveFileSystem,
            &project,
            "p",
            dir.path(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(std::fs::read_to_string(dir.path().join("p/notes.tmp")).unwrap(), "keep me");
        assert_eq!(std::fs::read_to_string(dir.path().join("p/notes.js")).unwrap(), "code");
    }
}
