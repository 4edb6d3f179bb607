//! GenerationPlan -- rendered files waiting to be written.
//!
//! A plan is inert until [`GenerationPlan::execute`] runs in apply mode.
//! Each file is staged to a temporary sibling first; only once staging has
//! succeeded is an existing target moved to `<file>.bak` and the staged file
//! renamed into place. Files are independent: if a later file fails, earlier
//! ones have already landed.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CodegenError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Report planned paths only; never touches the filesystem.
    #[default]
    DryRun,
    /// Write files, backing up existing ones.
    Apply,
}

/// Target path to rendered content, plus the mode to run in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub files: BTreeMap<PathBuf, String>,
    pub mode: GenerationMode,
}

/// What happened to one file when a plan was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Set when a previous file was moved aside.
    pub backup: Option<PathBuf>,
}

impl GenerationPlan {
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_apply(&self) -> bool {
        self.mode == GenerationMode::Apply
    }

    pub fn planned_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Run the plan. A dry run returns an empty list and writes nothing.
    pub fn execute(&self) -> Result<Vec<WrittenFile>, CodegenError> {
        if !self.is_apply() {
            tracing::debug!(files = self.files.len(), "dry run, nothing written");
            return Ok(Vec::new());
        }
        self.files
            .iter()
            .map(|(path, content)| write_with_backup(path, content))
            .collect()
    }
}

/// `lib/orders.rs` -> `lib/orders.rs.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".bak");
    path.with_file_name(name)
}

fn write_with_backup(path: &Path, content: &str) -> Result<WrittenFile, CodegenError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| CodegenError::io(dir, e))?;

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| CodegenError::io(dir, e))?;
    let staged_path = staged.path().to_path_buf();
    staged
        .write_all(content.as_bytes())
        .and_then(|()| staged.flush())
        .map_err(|e| CodegenError::io(&staged_path, e))?;

    let backup = if path.exists() {
        let backup = backup_path(path);
        if backup.exists() {
            std::fs::remove_file(&backup).map_err(|e| CodegenError::io(&backup, e))?;
        }
        std::fs::rename(path, &backup).map_err(|e| CodegenError::io(path, e))?;
        tracing::info!(
            path = %path.display(),
            backup = %backup.display(),
            "backed up existing file"
        );
        Some(backup)
    } else {
        None
    };

    staged
        .persist(path)
        .map_err(|e| CodegenError::io(path, e.error))?;
    tracing::info!(path = %path.display(), "wrote generated file");

    Ok(WrittenFile {
        path: path.to_path_buf(),
        backup,
    })
}
