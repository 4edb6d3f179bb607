//! Configuration for validation and workspace discovery.
//!
//! Configuration is always passed explicitly. The optional `cbs.toml` at a
//! workspace root is read with [`CbsConfig::load`]; environment overrides
//! go through [`CbsConfig::apply_env`], which takes a lookup closure rather
//! than reading process state directly.
//!
//! # Example
//!
//! ```toml
//! [validation]
//! enforce_service_suffix = true
//!
//! [workspace]
//! application_roots = ["applications", "examples/applications"]
//! shared_roots = ["shared_cells"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up at the workspace root.
pub const CONFIG_FILE_NAME: &str = "cbs.toml";

/// Environment variable that overrides `enforce_service_suffix`.
pub const ENFORCE_SUFFIX_ENV: &str = "CBS_ENFORCE_SERVICE_SUFFIX";

/// Knobs for the single-document validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// When set, a service/category suffix mismatch is an error instead of
    /// a warning.
    pub enforce_service_suffix: bool,
}

/// Where specs live, relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Directories whose immediate subdirectories are applications.
    pub application_roots: Vec<PathBuf>,
    /// Directories scanned for shared cells.
    pub shared_roots: Vec<PathBuf>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            application_roots: vec![
                PathBuf::from("applications"),
                PathBuf::from("examples/applications"),
            ],
            shared_roots: vec![PathBuf::from("shared_cells")],
        }
    }
}

/// Top-level `cbs.toml` contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CbsConfig {
    pub validation: ValidationConfig,
    pub workspace: WorkspaceConfig,
}

impl CbsConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<CbsConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load `<root>/cbs.toml` if it exists, defaults otherwise.
    pub fn load_from_root(root: &Path) -> Result<CbsConfig, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(CbsConfig::default())
        }
    }

    pub fn from_toml_str(content: &str, path: &Path) -> Result<CbsConfig, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides using `lookup` (usually `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENFORCE_SUFFIX_ENV) {
            self.validation.enforce_service_suffix = parse_flag(ENFORCE_SUFFIX_ENV, &value)?;
        }
        Ok(())
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
