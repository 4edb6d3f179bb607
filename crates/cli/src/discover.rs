//! Workspace discovery: locating applications and their `ai/spec.md` files.

use std::path::{Path, PathBuf};

use cbs_core::WorkspaceConfig;
use walkdir::WalkDir;

/// Spec file name inside a cell's `ai/` directory.
pub(crate) const SPEC_FILE: &str = "spec.md";
/// Directory holding a cell's spec.
pub(crate) const SPEC_DIR: &str = "ai";
/// Directory under an application that holds its cells.
pub(crate) const CELLS_DIR: &str = "cells";

/// One application directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Application {
    pub name: String,
    pub path: PathBuf,
}

/// Every `ai/spec.md` under `base`, sorted by path. A missing `base` yields
/// nothing; unreadable entries are skipped with a warning.
pub(crate) fn find_specs(base: &Path) -> Vec<PathBuf> {
    if !base.is_dir() {
        return Vec::new();
    }
    let mut specs: Vec<PathBuf> = WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_spec_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    specs.sort();
    specs
}

fn is_spec_file(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == SPEC_FILE)
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == SPEC_DIR)
}

/// Specs to validate: every application root tree, then every shared root.
pub(crate) fn workspace_specs(root: &Path, workspace: &WorkspaceConfig) -> Vec<PathBuf> {
    workspace
        .application_roots
        .iter()
        .chain(workspace.shared_roots.iter())
        .flat_map(|base| find_specs(&root.join(base)))
        .collect()
}

/// Immediate subdirectories of each application root, sorted by name
/// within each root.
pub(crate) fn applications(root: &Path, workspace: &WorkspaceConfig) -> Vec<Application> {
    let mut apps = Vec::new();
    for base in &workspace.application_roots {
        let base = root.join(base);
        let entries = match std::fs::read_dir(&base) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        let mut found: Vec<Application> = entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .map(|e| Application {
                name: e.file_name().to_string_lossy().into_owned(),
                path: e.path(),
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        apps.extend(found);
    }
    apps
}

/// Cell specs of one application (`<app>/cells/**/ai/spec.md`).
pub(crate) fn application_specs(app: &Application) -> Vec<PathBuf> {
    find_specs(&app.path.join(CELLS_DIR))
}

/// The cell directory of a spec: the parent of its `ai/` directory.
pub(crate) fn cell_dir(spec_path: &Path) -> PathBuf {
    spec_path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve a `generate-cell` argument: directories mean `<dir>/ai/spec.md`.
pub(crate) fn resolve_spec_arg(arg: &Path) -> PathBuf {
    if arg.is_dir() {
        arg.join(SPEC_DIR).join(SPEC_FILE)
    } else {
        arg.to_path_buf()
    }
}
