//! Project model and the state holder for the current project.
//!
//! A project is a flat, ordered map of file path to file content. Order is
//! significant: the first path is the default selection after an import or a
//! generation, so the map keeps insertion order through JSON round trips.

mod template;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

pub use template::default_project;

/// Ordered mapping of file path (e.g. `/App.js`) to file content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    files: Vec<(String, String)>,
}

impl Project {
    /// Creates an empty project.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a file, replacing the content in place if the path exists.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = content,
            None => self.files.push((path, content)),
        }
    }

    /// Returns the content stored at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.iter().find(|(p, _)| p == path).map(|(_, c)| c.as_str())
    }

    /// Returns `true` if `path` is part of the project.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// First path in insertion order.
    #[must_use]
    pub fn first_path(&self) -> Option<&str> {
        self.files.first().map(|(p, _)| p.as_str())
    }

    /// Iterates over `(path, content)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Iterates over paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(p, _)| p.as_str())
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the project has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Pretty-printed JSON object of path to content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Io(format!("failed to serialize project: {e}")))
    }

    /// Parses a flat JSON object of path to string content.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the text is not such an object.
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| {
            AppError::validation(format!("Could not import project, check the JSON format: {e}"))
        })
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for Project {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut project = Self::new();
        for (path, content) in iter {
            project.insert(path, content);
        }
        project
    }
}

impl Serialize for Project {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (path, content) in &self.files {
            map.serialize_entry(path, content)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProjectVisitor;

        impl<'de> Visitor<'de> for ProjectVisitor {
            type Value = Project;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping file paths to file contents")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Project, A::Error> {
                let mut project = Project::new();
                while let Some((path, content)) = access.next_entry::<String, String>()? {
                    project.insert(path, content);
                }
                Ok(project)
            }
        }

        deserializer.deserialize_map(ProjectVisitor)
    }
}

/// Current project plus the file selected for viewing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Files of the current project.
    pub files: Project,
    /// Path of the selected file. `None` only after importing an empty map.
    pub selected_file: Option<String>,
}

impl Default for ProjectState {
    fn default() -> Self {
        let files = default_project();
        let selected_file = files.first_path().map(String::from);
        Self { files, selected_file }
    }
}

impl ProjectState {
    /// Replaces the project with the built-in template if `confirm` agrees.
    ///
    /// Returns whether the reset was applied.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        *self = Self::default();
        true
    }

    /// Replaces the project wholesale and selects its first file.
    pub fn import(&mut self, files: Project) {
        self.selected_file = files.first_path().map(String::from);
        self.files = files;
    }

    /// Parses `text` as a project and imports it.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the state untouched, when `text`
    /// is not a flat JSON object of string contents.
    pub fn import_json(&mut self, text: &str) -> Result<(), AppError> {
        let files = Project::from_json(text)?;
        self.import(files);
        Ok(())
    }

    /// Selects `path` for viewing.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `path` is not part of the project.
    pub fn select(&mut self, path: &str) -> Result<(), AppError> {
        if !self.files.contains(path) {
            return Err(AppError::validation(format!("No such file in project: {path}")));
        }
        self.selected_file = Some(path.to_string());
        Ok(())
    }

    /// Content of the selected file.
    #[must_use]
    pub fn selected_content(&self) -> Option<&str> {
        self.selected_file.as_deref().and_then(|p| self.files.get(p))
    }
}
