//! Contract graph builder.
//!
//! A pure two-pass fold over all specs of a workspace: first every
//! publish/subscribe edge is recorded, then subjects present on only one
//! side are reported as orphans. Wildcard subjects are kept in separate
//! maps and never count as orphans, since their counterparts are matched
//! dynamically.
//!
//! Cell identity is the spec `id`. Two documents declaring the same id are
//! reported as [`ContractIssue::DuplicateCellId`] rather than silently
//! merged.

use std::collections::{BTreeMap, BTreeSet};

use cbs_core::CellSpec;
use serde::Serialize;

/// Subject to cell-id index. Both maps use `BTreeMap`/`BTreeSet` so
/// iteration is lexicographic on subject, then cell id.
pub type SubjectIndex = BTreeMap<String, BTreeSet<String>>;

/// Bipartite subject/cell graph for one workspace pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractGraph {
    /// Concrete subject -> publishing cells.
    pub publishers: SubjectIndex,
    /// Concrete subject -> subscribing cells.
    pub subscribers: SubjectIndex,
    /// Wildcard subject -> publishing cells. Exempt from orphan checks.
    pub wildcard_publishers: SubjectIndex,
    /// Wildcard subject -> subscribing cells. Exempt from orphan checks.
    pub wildcard_subscribers: SubjectIndex,
}

impl ContractGraph {
    /// Every subject seen on either side, concrete or wildcard, sorted.
    pub fn all_subjects(&self) -> BTreeSet<&str> {
        self.publishers
            .keys()
            .chain(self.subscribers.keys())
            .chain(self.wildcard_publishers.keys())
            .chain(self.wildcard_subscribers.keys())
            .map(String::as_str)
            .collect()
    }

    /// Cells publishing `subject`, concrete or wildcard.
    pub fn publishers_of(&self, subject: &str) -> Option<&BTreeSet<String>> {
        self.publishers
            .get(subject)
            .or_else(|| self.wildcard_publishers.get(subject))
    }

    /// Cells subscribing to `subject`, concrete or wildcard.
    pub fn subscribers_of(&self, subject: &str) -> Option<&BTreeSet<String>> {
        self.subscribers
            .get(subject)
            .or_else(|| self.wildcard_subscribers.get(subject))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanDirection {
    /// Published but nobody subscribes.
    NoSubscribers,
    /// Subscribed but nobody publishes.
    NoPublishers,
}

/// A cross-document consistency problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContractIssue {
    Orphan {
        subject: String,
        direction: OrphanDirection,
        cells: Vec<String>,
    },
    DuplicateCellId {
        id: String,
        sources: Vec<String>,
    },
}

/// Identity used for a spec in the graph: its `id`, or its source path when
/// the id is blank so the cell is still accounted for.
pub fn cell_key(spec: &CellSpec) -> &str {
    let id = spec.id.trim();
    if id.is_empty() {
        &spec.source_path
    } else {
        id
    }
}

/// Fold `specs` into a [`ContractGraph`] and collect its issues.
///
/// Issues are ordered: duplicate ids (by id), then orphans (by subject).
pub fn build(specs: &[CellSpec]) -> (ContractGraph, Vec<ContractIssue>) {
    let mut graph = ContractGraph::default();
    let mut sources_by_id: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    // Pass 1: record edges.
    for spec in specs {
        let cell = cell_key(spec);
        sources_by_id
            .entry(cell)
            .or_default()
            .push(spec.source_path.as_str());

        for subject in &spec.publish {
            let index = if subject.is_wildcard() {
                &mut graph.wildcard_publishers
            } else {
                &mut graph.publishers
            };
            index
                .entry(subject.as_str().to_string())
                .or_default()
                .insert(cell.to_string());
        }
        for subject in &spec.subscribe {
            let index = if subject.is_wildcard() {
                &mut graph.wildcard_subscribers
            } else {
                &mut graph.subscribers
            };
            index
                .entry(subject.as_str().to_string())
                .or_default()
                .insert(cell.to_string());
        }
    }

    // Pass 2: report.
    let mut issues = Vec::new();

    for (id, sources) in &sources_by_id {
        if sources.len() > 1 {
            tracing::warn!(id = *id, count = sources.len(), "duplicate cell id");
            let mut sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
            sources.sort();
            issues.push(ContractIssue::DuplicateCellId {
                id: id.to_string(),
                sources,
            });
        }
    }

    let mut orphans = orphans_of(
        &graph.publishers,
        &graph.subscribers,
        OrphanDirection::NoSubscribers,
    );
    orphans.extend(orphans_of(
        &graph.subscribers,
        &graph.publishers,
        OrphanDirection::NoPublishers,
    ));
    orphans.sort_by(|a, b| orphan_subject(a).cmp(orphan_subject(b)));
    issues.extend(orphans);

    (graph, issues)
}

fn orphans_of(
    side: &SubjectIndex,
    other: &SubjectIndex,
    direction: OrphanDirection,
) -> Vec<ContractIssue> {
    side.iter()
        .filter(|(subject, _)| !other.contains_key(*subject))
        .map(|(subject, cells)| {
            tracing::warn!(subject = %subject, ?direction, "orphaned subject");
            ContractIssue::Orphan {
                subject: subject.clone(),
                direction,
                cells: cells.iter().cloned().collect(),
            }
        })
        .collect()
}

fn orphan_subject(issue: &ContractIssue) -> &str {
    match issue {
        ContractIssue::Orphan { subject, .. } => subject,
        ContractIssue::DuplicateCellId { id, .. } => id,
    }
}
