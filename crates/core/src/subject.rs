//! Subject grammar validator.
//!
//! ```text
//! subject := "cbs." service "." verb ("." suffix)* | "cbs.>"
//! service := [a-z0-9_]+
//! verb    := [a-z0-9_]+ | "*" | "{" [a-z0-9_]+ "}"
//! ```
//!
//! Suffix segments are free-form but must be non-empty and free of
//! whitespace; `>` is only allowed as the final segment. The namespace
//! prefix is checked before anything else so an un-namespaced subject gets
//! its own error instead of a generic format complaint.

use crate::spec::{SubjectKind, SubjectPattern};

/// Namespace prefix every bus subject starts with.
pub const SUBJECT_PREFIX: &str = "cbs.";
const MULTI_LEVEL_ALL: &str = "cbs.>";

/// Why a subject string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    #[error("bad subject (must start with 'cbs.'): {0}")]
    MissingNamespace(String),

    #[error("invalid subject format (use cbs.service.verb snake_case): {subject} ({reason})")]
    InvalidFormat { subject: String, reason: String },
}

impl SubjectError {
    /// The offending subject, verbatim.
    pub fn subject(&self) -> &str {
        match self {
            SubjectError::MissingNamespace(s) => s,
            SubjectError::InvalidFormat { subject, .. } => subject,
        }
    }
}

/// Check `raw` against the subject grammar and classify it.
pub fn validate_subject(raw: &str) -> Result<SubjectKind, SubjectError> {
    if !raw.starts_with(SUBJECT_PREFIX) {
        return Err(SubjectError::MissingNamespace(raw.to_string()));
    }
    if raw == MULTI_LEVEL_ALL {
        return Ok(SubjectKind::MultiLevelWildcard);
    }

    let invalid = |reason: String| SubjectError::InvalidFormat {
        subject: raw.to_string(),
        reason,
    };

    let segments: Vec<&str> = raw[SUBJECT_PREFIX.len()..].split('.').collect();
    if segments.len() < 2 {
        return Err(invalid("expected cbs.<service>.<verb>".to_string()));
    }

    let service = segments[0];
    if !is_snake_token(service) {
        return Err(invalid(format!("service '{}' must match [a-z0-9_]+", service)));
    }

    let verb = segments[1];
    if !(is_snake_token(verb) || verb == "*" || is_placeholder(verb)) {
        return Err(invalid(format!(
            "verb '{}' must match [a-z0-9_]+, '*' or {{placeholder}}",
            verb
        )));
    }

    let suffixes = &segments[2..];
    for (i, seg) in suffixes.iter().enumerate() {
        if seg.is_empty() {
            return Err(invalid("empty segment".to_string()));
        }
        if seg.chars().any(char::is_whitespace) {
            return Err(invalid(format!("segment '{}' contains whitespace", seg)));
        }
        if seg.contains('>') && (*seg != ">" || i + 1 != suffixes.len()) {
            return Err(invalid("'>' is only allowed as the final segment".to_string()));
        }
    }

    Ok(SubjectPattern::new(raw).kind())
}

/// The service token (second dot-delimited segment) of a subject.
///
/// Subjects with fewer than three segments have no service token.
pub fn service_token(raw: &str) -> Option<&str> {
    let mut parts = raw.split('.');
    let _namespace = parts.next()?;
    let service = parts.next()?;
    parts.next()?;
    Some(service)
}

/// Categories that carry a service naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ui,
    Io,
    Logic,
    Integration,
    Storage,
}

impl Category {
    /// Parse a spec's free-text category. Anything outside the fixed set
    /// has no naming convention.
    pub fn parse(raw: &str) -> Option<Category> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ui" => Some(Category::Ui),
            "io" => Some(Category::Io),
            "logic" => Some(Category::Logic),
            "integration" => Some(Category::Integration),
            "storage" => Some(Category::Storage),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Ui => "ui",
            Category::Io => "io",
            Category::Logic => "logic",
            Category::Integration => "integration",
            Category::Storage => "storage",
        }
    }
}

/// A subject whose service token does not end with `_<category>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMismatch {
    pub subject: String,
    pub service: String,
    pub category: Category,
}

impl SuffixMismatch {
    pub fn message(&self) -> String {
        format!(
            "service '{}' should end with '_{}' per naming guide (subject: {})",
            self.service,
            self.category.as_str(),
            self.subject
        )
    }
}

/// Apply the category/service suffix convention to `subjects`.
///
/// Subjects outside the `cbs.` namespace are already rejected by the
/// grammar and are skipped here, as are subjects with no service token.
/// Older tooling also warned on un-namespaced subjects such as
/// `orders.x.y`, reading `x` as the service; that warning is not repeated
/// since the namespace error already covers the subject.
pub fn suffix_mismatches<'a>(
    category: &str,
    subjects: impl IntoIterator<Item = &'a SubjectPattern>,
) -> Vec<SuffixMismatch> {
    let Some(category) = Category::parse(category) else {
        return Vec::new();
    };
    let expected = format!("_{}", category.as_str());

    subjects
        .into_iter()
        .filter(|s| s.as_str().starts_with(SUBJECT_PREFIX))
        .filter_map(|s| {
            let service = service_token(s.as_str())?;
            if service.ends_with(&expected) {
                None
            } else {
                Some(SuffixMismatch {
                    subject: s.as_str().to_string(),
                    service: service.to_string(),
                    category,
                })
            }
        })
        .collect()
}

fn is_snake_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

fn is_placeholder(s: &str) -> bool {
    s.len() > 2 && s.starts_with('{') && s.ends_with('}') && is_snake_token(&s[1..s.len() - 1])
}
