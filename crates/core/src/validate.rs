//! Single-document validation.
//!
//! Rules are evaluated independently and every problem is collected:
//!
//! 1. all required metadata fields present (one aggregated error)
//! 2. at least one subscribe or publish subject
//! 3. each subject passes the subject grammar (one error per subject)
//! 4. service names follow the category suffix convention
//!
//! Errors come out in that order; suffix findings are errors only when
//! [`ValidationConfig::enforce_service_suffix`] is set.

use std::fmt;

use serde::Serialize;

use crate::config::ValidationConfig;
use crate::spec::CellSpec;
use crate::subject::{suffix_mismatches, validate_subject, SubjectError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable machine-readable identifier for each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    MissingFields,
    NoSubjects,
    MissingNamespace,
    InvalidSubject,
    ServiceSuffix,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of validating one spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// A document is OK when it has no errors; warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }
}

/// Validate one spec against every rule.
pub fn validate(spec: &CellSpec, config: &ValidationConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    let missing = spec.missing_fields();
    if !missing.is_empty() {
        report.push(Diagnostic::error(
            DiagnosticCode::MissingFields,
            format!("missing: {}", missing.join(", ")),
        ));
    }

    if !spec.has_subjects() {
        report.push(Diagnostic::error(
            DiagnosticCode::NoSubjects,
            "no bus subjects defined - cells must communicate via bus",
        ));
    }

    for subject in spec.all_subjects() {
        if let Err(e) = validate_subject(subject.as_str()) {
            let code = match e {
                SubjectError::MissingNamespace(_) => DiagnosticCode::MissingNamespace,
                SubjectError::InvalidFormat { .. } => DiagnosticCode::InvalidSubject,
            };
            report.push(Diagnostic::error(code, e.to_string()));
        }
    }

    for mismatch in suffix_mismatches(&spec.category, spec.all_subjects()) {
        let diagnostic = if config.enforce_service_suffix {
            Diagnostic::error(DiagnosticCode::ServiceSuffix, mismatch.message())
        } else {
            Diagnostic::warning(DiagnosticCode::ServiceSuffix, mismatch.message())
        };
        report.push(diagnostic);
    }

    tracing::debug!(
        path = %spec.source_path,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated spec"
    );
    report
}
