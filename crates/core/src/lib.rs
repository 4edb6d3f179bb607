//! cbs-core: cell specification model, parser and single-document validation.
//!
//! A cell declares its identity and bus interface in a markdown `spec.md`.
//! This crate turns that document into a [`CellSpec`], checks subject
//! strings against the bus naming grammar, and reports per-document
//! errors and warnings.
//!
//! # Public API
//!
//! - [`parse_spec()`] / [`load_spec()`] -- document text or path to [`CellSpec`]
//! - [`validate_subject()`] -- the subject grammar on its own
//! - [`validate()`] -- the full per-document rule set
//! - [`ValidationConfig`] / [`CbsConfig`] -- explicit configuration values

pub mod config;
pub mod error;
pub mod parser;
pub mod source;
pub mod spec;
pub mod subject;
pub mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use config::{CbsConfig, ValidationConfig, WorkspaceConfig};
pub use error::{ConfigError, SpecError};
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use spec::{CellSpec, SubjectKind, SubjectPattern, REQUIRED_FIELDS};
pub use subject::{service_token, SubjectError, SUBJECT_PREFIX};
pub use validate::{Diagnostic, DiagnosticCode, Severity, ValidationReport};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use parser::{load_spec, load_spec_with, parse_spec};
pub use subject::validate_subject;
pub use validate::validate;
