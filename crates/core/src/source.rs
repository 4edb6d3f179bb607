//! Source provider abstraction for reading spec documents.
//!
//! The [`SourceProvider`] trait keeps the parser independent of `std::fs`,
//! so tests can feed whole workspaces from memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads spec document text for a path.
pub trait SourceProvider {
    /// Read the full text of the document at `path`.
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;

    /// Whether `path` names an existing document.
    fn exists(&self, path: &Path) -> bool;
}

/// Default filesystem-backed provider.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory provider mapping paths to document text.
///
/// Paths are normalized (`.` and `..` resolved lexically) on both insert
/// and lookup.
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        let files = files
            .into_iter()
            .map(|(path, text)| (Self::normalize_path(&path), text))
            .collect();
        Self { files }
    }

    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                std::path::Component::CurDir => {}
                std::path::Component::ParentDir => {
                    components.pop();
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&Self::normalize_path(path))
    }
}
