//! The structured model of one cell's declared contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata fields every complete spec must declare, in reporting order.
pub const REQUIRED_FIELDS: [&str; 6] = ["id", "name", "version", "language", "category", "purpose"];

/// One cell's declared contract, as read from its `spec.md`.
///
/// Absent metadata is kept as an empty string; the parser never fails on
/// missing fields, the validator reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpec {
    pub id: String,
    pub name: String,
    pub version: String,
    pub language: String,
    pub category: String,
    pub purpose: String,
    pub subscribe: Vec<SubjectPattern>,
    pub publish: Vec<SubjectPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envelope: Option<String>,
    /// Where the spec was read from. Used for reporting only, never identity.
    pub source_path: String,
}

impl CellSpec {
    /// Value of a required metadata field by (lower-case) name.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "version" => Some(&self.version),
            "language" => Some(&self.language),
            "category" => Some(&self.category),
            "purpose" => Some(&self.purpose),
            _ => None,
        }
    }

    /// Mutable slot for a required metadata field by (lower-case) name.
    pub(crate) fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "id" => Some(&mut self.id),
            "name" => Some(&mut self.name),
            "version" => Some(&mut self.version),
            "language" => Some(&mut self.language),
            "category" => Some(&mut self.category),
            "purpose" => Some(&mut self.purpose),
            _ => None,
        }
    }

    /// Required fields that are absent or blank, in [`REQUIRED_FIELDS`] order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        missing_of(self, &REQUIRED_FIELDS)
    }

    /// Subscribe subjects followed by publish subjects, in declaration order.
    pub fn all_subjects(&self) -> impl Iterator<Item = &SubjectPattern> {
        self.subscribe.iter().chain(self.publish.iter())
    }

    pub fn has_subjects(&self) -> bool {
        !self.subscribe.is_empty() || !self.publish.is_empty()
    }
}

/// Fields from `keys` that are absent or blank on `spec`.
pub fn missing_of(spec: &CellSpec, keys: &[&'static str]) -> Vec<&'static str> {
    keys.iter()
        .copied()
        .filter(|k| spec.field(k).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect()
}

/// Shape of a bus subject for contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// A fully enumerated subject such as `cbs.orders.created`.
    Concrete,
    /// Contains a `*` segment or a `{placeholder}` token.
    SingleLevelWildcard,
    /// `cbs.>` or any subject ending in `>`.
    MultiLevelWildcard,
}

/// A bus subject string as declared in a spec.
///
/// The raw text is preserved verbatim; classification is derived on demand
/// and does not imply the subject is grammatically valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectPattern(String);

impl SubjectPattern {
    pub fn new(raw: impl Into<String>) -> Self {
        SubjectPattern(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> SubjectKind {
        let raw = self.0.as_str();
        if raw.ends_with('>') {
            return SubjectKind::MultiLevelWildcard;
        }
        let single = raw.ends_with('*')
            || raw
                .split('.')
                .any(|seg| seg == "*" || (seg.starts_with('{') && seg.ends_with('}')));
        if single {
            SubjectKind::SingleLevelWildcard
        } else {
            SubjectKind::Concrete
        }
    }

    /// Wildcards are matched dynamically and never count as orphans.
    pub fn is_wildcard(&self) -> bool {
        self.kind() != SubjectKind::Concrete || self.0.contains('>')
    }
}

impl fmt::Display for SubjectPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectPattern {
    fn from(raw: &str) -> Self {
        SubjectPattern::new(raw)
    }
}
