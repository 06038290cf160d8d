//! Live filesystem adapter using `std::fs`.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::ports::filesystem::FileSystem;
use crate::ports::PortError;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        Ok(std::fs::read(path)?)
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<(), PortError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;
        // Write to a uniquely named sibling and rename, so a crash never leaves half a file.
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(contents)?;
        tmp.persist(path)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/App.js");

        LiveFileSystem.write(&path, "export default 1;").unwrap();

        assert_eq!(LiveFileSystem.read_to_string(&path).unwrap(), "export default 1;");
        let names: Vec<_> = std::fs::read_dir(dir.path().join("nested/deeper"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, ["App.js"]);
    }

    #[test]
    fn write_leaves_files_sharing_the_stem_alone() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.tmp");
        std::fs::write(&notes, "keep me").unwrap();

        LiveFileSystem.write(&dir.path().join("notes.js"), "code").unwrap();

        assert_eq!(std::fs::read_to_string(&notes).unwrap(), "keep me");
        assert_eq!(std::fs::read_to_string(dir.path().join("notes.js")).unwrap(), "code");
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("react-native-project.json");

        LiveFileSystem.write(&path, "{}").unwrap();
        LiveFileSystem.write(&path, "{\n  \"/App.js\": \"x\"\n}").unwrap();

        assert_eq!(LiveFileSystem.read_to_string(&path).unwrap(), "{\n  \"/App.js\": \"x\"\n}");
    }
}
