//! cbs-analyze: cross-document contract analysis.
//!
//! Folds every [`CellSpec`](cbs_core::CellSpec) of a workspace into a
//! subject-to-cell [`ContractGraph`], reports dangling publish/subscribe
//! edges and duplicate cell ids as [`Finding`]s, and renders the cell map
//! inventory.

pub mod cell_map;
pub mod graph;
pub mod report;

pub use cell_map::{render_cell_map, CellMapInput};
pub use graph::{build, cell_key, ContractGraph, ContractIssue, OrphanDirection};
pub use report::{ContractReport, Finding, FindingKind, FindingSeverity};

use cbs_core::CellSpec;

/// Build the contract graph for `specs` and turn its issues into a report.
pub fn analyze(specs: &[CellSpec]) -> ContractReport {
    let (graph, issues) = graph::build(specs);
    ContractReport::from_issues(graph, &issues)
}
