use std::path::PathBuf;

/// Error type for code generation operations.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The spec lacks a field generation cannot do without.
    #[error("spec missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The spec id cannot be used as a file stem and type name.
    #[error("invalid cell id '{0}' (use snake_case [a-z0-9_], starting with a letter or '_')")]
    InvalidId(String),

    /// No template is registered for the spec's language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// An I/O error occurred while applying a plan.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}
