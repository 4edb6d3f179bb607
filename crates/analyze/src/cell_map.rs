//! Cell map renderer: markdown inventory of one application's cells.
//!
//! Output is a deterministic projection of the specs and the contract
//! report. Only the `Generated` timestamp varies between runs, and it is
//! supplied by the caller.

use std::fmt::Write as _;
use std::path::Path;

use cbs_core::CellSpec;

use crate::graph::cell_key;
use crate::report::ContractReport;

/// Per-application context for rendering.
pub struct CellMapInput<'a> {
    pub app_name: &'a str,
    /// Cell paths are shown relative to this directory when possible.
    pub app_root: &'a Path,
    /// RFC 3339 timestamp shown in the overview.
    pub generated_at: &'a str,
}

pub fn render_cell_map(
    input: &CellMapInput<'_>,
    specs: &[CellSpec],
    report: &ContractReport,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail; results are ignored below.
    let _ = writeln!(out, "# Cell Map - {}\n", input.app_name);
    let _ = writeln!(out, "## Overview");
    let _ = writeln!(out, "- **Total Cells**: {}", specs.len());
    let _ = writeln!(out, "- **Generated**: {}", input.generated_at);
    let _ = writeln!(out, "\n## Cell Inventory\n");

    let mut cells: Vec<&CellSpec> = specs.iter().collect();
    cells.sort_by(|a, b| {
        cell_key(a)
            .cmp(cell_key(b))
            .then_with(|| a.source_path.cmp(&b.source_path))
    });

    for spec in cells {
        let id = cell_key(spec);
        let _ = writeln!(out, "### {} ({})", id, spec.category);
        if !spec.name.is_empty() && spec.name != id {
            let _ = writeln!(out, "- **Name**: {}", spec.name);
        }
        let purpose = if spec.purpose.is_empty() {
            "Not specified"
        } else {
            spec.purpose.as_str()
        };
        let _ = writeln!(out, "- **Purpose**: {}", purpose);
        let _ = writeln!(
            out,
            "- **Path**: `{}`",
            relative_cell_path(spec, input.app_root)
        );
        if !spec.subscribe.is_empty() {
            let subjects = code_list(spec.subscribe.iter().map(|s| s.as_str()));
            let _ = writeln!(out, "- **Subscribes**: {}", subjects);
        }
        if !spec.publish.is_empty() {
            let subjects = code_list(spec.publish.iter().map(|s| s.as_str()));
            let _ = writeln!(out, "- **Publishes**: {}", subjects);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Message Flow Summary\n");
    let graph = &report.graph;
    for subject in graph.all_subjects() {
        let _ = writeln!(out, "- **`{}`**", subject);
        let publishers = id_list(graph.publishers_of(subject));
        let subscribers = id_list(graph.subscribers_of(subject));
        let _ = writeln!(out, "  - **Publishers**: {}", publishers);
        let _ = writeln!(out, "  - **Subscribers**: {}", subscribers);
    }
    out.push('\n');

    if !report.findings.is_empty() {
        let _ = writeln!(out, "## Contract Issues\n");
        for finding in &report.findings {
            let _ = writeln!(out, "- {}", finding.message);
        }
        out.push('\n');
    }

    out
}

/// The spec's `ai/` directory relative to the application root.
fn relative_cell_path(spec: &CellSpec, app_root: &Path) -> String {
    let spec_path = Path::new(&spec.source_path);
    let dir = spec_path.parent().unwrap_or(spec_path);
    dir.strip_prefix(app_root)
        .unwrap_or(dir)
        .display()
        .to_string()
}

fn code_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|s| format!("`{}`", s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn id_list(ids: Option<&std::collections::BTreeSet<String>>) -> String {
    match ids {
        Some(ids) if !ids.is_empty() => ids.iter().cloned().collect::<Vec<_>>().join(", "),
        _ => "None".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;
    use cbs_core::parse_spec;

    fn specs() -> Vec<CellSpec> {
        vec![
            parse_spec(
                "- **id**: printer_io\n- **name**: Printer\n- **category**: io\n\
                 - **purpose**: Prints\n- subscribe: cbs.greeter_logic.greeted\n",
                "apps/demo/cells/printer_io/ai/spec.md",
            ),
            parse_spec(
                "- **id**: greeter_logic\n- **name**: greeter_logic\n- **category**: logic\n\
                 - publish: cbs.greeter_logic.greeted\n- subscribe: cbs.audit.log.>\n",
                "apps/demo/cells/greeter_logic/ai/spec.md",
            ),
        ]
    }

    fn input() -> CellMapInput<'static> {
        CellMapInput {
            app_name: "demo",
            app_root: Path::new("apps/demo"),
            generated_at: "2026-01-01T00:00:00Z",
        }
    }

    #[test]
    fn renders_inventory_sorted_by_id() {
        let specs = specs();
        let report = analyze(&specs);
        let map = render_cell_map(&input(), &specs, &report);

        assert!(map.starts_with("# Cell Map - demo\n\n## Overview\n- **Total Cells**: 2\n"));
        assert!(map.contains("- **Generated**: 2026-01-01T00:00:00Z"));
        let greeter = map.find("### greeter_logic (logic)").unwrap();
        let printer = map.find("### printer_io (io)").unwrap();
        assert!(greeter < printer);
        assert!(map.contains("- **Name**: Printer"));
        assert!(!map.contains("- **Name**: greeter_logic"));
        assert!(map.contains("- **Purpose**: Not specified"));
        assert!(map.contains("- **Path**: `cells/printer_io/ai`"));
        assert!(map.contains("- **Subscribes**: `cbs.greeter_logic.greeted`"));
    }

    #[test]
    fn renders_subject_summary_with_wildcards() {
        let specs = specs();
        let report = analyze(&specs);
        let map = render_cell_map(&input(), &specs, &report);

        assert!(map.contains(
            "- **`cbs.greeter_logic.greeted`**\n  - **Publishers**: greeter_logic\n  - **Subscribers**: printer_io\n"
        ));
        assert!(map.contains(
            "- **`cbs.audit.log.>`**\n  - **Publishers**: None\n  - **Subscribers**: greeter_logic\n"
        ));
        assert!(!map.contains("## Contract Issues"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let specs = specs();
        let mut reversed = specs.clone();
        reversed.reverse();
        let a = render_cell_map(&input(), &specs, &analyze(&specs));
        let b = render_cell_map(&input(), &reversed, &analyze(&reversed));
        assert_eq!(a, b);
    }

    #[test]
    fn lists_findings() {
        let specs = vec![parse_spec("- **id**: a\n- publish: cbs.x.y\n", "a/ai/spec.md")];
        let report = analyze(&specs);
        let map = render_cell_map(&input(), &specs, &report);
        assert!(map.contains(
            "## Contract Issues\n\n- Subject 'cbs.x.y' published by a but no subscribers found\n"
        ));
    }
}
