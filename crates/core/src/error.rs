use std::path::PathBuf;

/// A fatal problem loading a single spec document.
///
/// Field-level problems are never errors at this stage; they surface later
/// as [`Diagnostic`](crate::Diagnostic)s from the validator.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The spec path does not exist (or a cell directory has no `ai/spec.md`).
    #[error("spec not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The spec exists but could not be read.
    #[error("error reading spec '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A problem loading or overriding [`CbsConfig`](crate::CbsConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override held something other than a boolean flag.
    #[error("invalid value '{value}' for {var}: expected 1, 0, true or false")]
    InvalidEnv { var: String, value: String },
}
