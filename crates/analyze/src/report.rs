//! ContractReport -- the graph plus its findings, ready for display.

use serde::Serialize;

use crate::graph::{ContractGraph, ContractIssue, OrphanDirection};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FindingSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    OrphanPublish,
    OrphanSubscribe,
    DuplicateCellId,
}

/// A notable finding from contract analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: FindingSeverity,
    pub message: String,
    pub subject: Option<String>,
    pub cell_ids: Vec<String>,
    pub details: Option<serde_json::Value>,
}

impl Finding {
    fn from_issue(issue: &ContractIssue) -> Finding {
        match issue {
            ContractIssue::Orphan {
                subject,
                direction,
                cells,
            } => {
                let (kind, message) = match direction {
                    OrphanDirection::NoSubscribers => (
                        FindingKind::OrphanPublish,
                        format!(
                            "Subject '{}' published by {} but no subscribers found",
                            subject,
                            cells.join(", ")
                        ),
                    ),
                    OrphanDirection::NoPublishers => (
                        FindingKind::OrphanSubscribe,
                        format!(
                            "Subject '{}' subscribed by {} but no publishers found",
                            subject,
                            cells.join(", ")
                        ),
                    ),
                };
                Finding {
                    kind,
                    severity: FindingSeverity::Warning,
                    message,
                    subject: Some(subject.clone()),
                    cell_ids: cells.clone(),
                    details: None,
                }
            }
            ContractIssue::DuplicateCellId { id, sources } => Finding {
                kind: FindingKind::DuplicateCellId,
                severity: FindingSeverity::Error,
                message: format!(
                    "Cell id '{}' is declared by {} specs: {}",
                    id,
                    sources.len(),
                    sources.join(", ")
                ),
                subject: None,
                cell_ids: vec![id.clone()],
                details: Some(serde_json::json!({ "sources": sources })),
            },
        }
    }
}

/// Aggregated output of one workspace contract pass.
#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub graph: ContractGraph,
    pub findings: Vec<Finding>,
}

impl ContractReport {
    pub fn from_issues(graph: ContractGraph, issues: &[ContractIssue]) -> Self {
        ContractReport {
            graph,
            findings: issues.iter().map(Finding::from_issue).collect(),
        }
    }

    pub fn orphan_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.kind != FindingKind::DuplicateCellId)
            .count()
    }

    /// Any finding fails the workspace: orphans and duplicate ids alike.
    pub fn has_failures(&self) -> bool {
        !self.findings.is_empty()
    }
}
