use std::path::Path;

use serde::Serialize;

use cbs_analyze::{analyze, render_cell_map, CellMapInput, Finding, FindingSeverity};
use cbs_core::{load_spec, CellSpec};

use crate::commands::{display_path, now_rfc3339, print_json};
use crate::discover::{application_specs, applications, cell_dir, Application, SPEC_DIR};
use crate::{report_error, Context, OutputFormat};

/// File name of the rendered map inside `<app>/ai/`.
const CELL_MAP_FILE: &str = "cell_map.md";

/// Outcome for one application.
#[derive(Debug, Serialize)]
struct AppResult {
    app: String,
    cells: usize,
    findings: Vec<Finding>,
    /// Path of the written map; `None` in a dry run or when the app has no cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<String>,
    /// Rendered map, included in a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_map: Option<String>,
}

pub(crate) fn cmd_generate_map(ctx: &Context, dry_run: bool) -> i32 {
    let text = ctx.output == OutputFormat::Text;
    let generated_at = now_rfc3339();
    let mut failed = false;
    let mut total_cells = 0;
    let mut results = Vec::new();

    for app in applications(&ctx.root, &ctx.config.workspace) {
        let specs = load_app_specs(ctx, &app, &mut failed);
        if specs.is_empty() {
            if text && !ctx.quiet {
                println!("No cells found for {}", app.name);
                println!();
            }
            continue;
        }
        total_cells += specs.len();

        let report = analyze(&specs);
        if report.has_failures() {
            failed = true;
        }
        if text && !ctx.quiet {
            println!("Found {} cells in {}", specs.len(), app.name);
            print_findings(&report.findings);
        }

        let map = render_cell_map(
            &CellMapInput {
                app_name: &app.name,
                app_root: &app.path,
                generated_at: &generated_at,
            },
            &specs,
            &report,
        );

        let mut result = AppResult {
            app: app.name.clone(),
            cells: specs.len(),
            findings: report.findings,
            written: None,
            cell_map: None,
        };

        if dry_run {
            if text {
                print!("{}", map);
            } else {
                result.cell_map = Some(map);
            }
        } else {
            let path = app.path.join(SPEC_DIR).join(CELL_MAP_FILE);
            if let Err(e) = write_map(&path, &map) {
                let msg = format!("error writing '{}': {}", path.display(), e);
                report_error(&msg, ctx.output, ctx.quiet);
                failed = true;
            } else {
                let shown = display_path(&ctx.root, &path);
                tracing::info!(path = %shown, "wrote cell map");
                if text && !ctx.quiet {
                    println!("Generated cell map: {}", shown);
                }
                result.written = Some(shown);
            }
        }
        if text && !ctx.quiet {
            println!();
        }
        results.push(result);
    }

    match ctx.output {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Text => {
            if !ctx.quiet {
                println!("Total cells mapped: {}", total_cells);
            }
        }
    }

    if failed {
        1
    } else {
        0
    }
}

/// Load every cell spec of `app`. Cells without an id are keyed by their
/// directory name. Unreadable specs are reported, skipped and flag `failed`.
fn load_app_specs(ctx: &Context, app: &Application, failed: &mut bool) -> Vec<CellSpec> {
    let mut specs = Vec::new();
    for path in application_specs(app) {
        match load_spec(&path) {
            Ok(mut spec) => {
                if spec.id.trim().is_empty() {
                    spec.id = fallback_id(&path);
                    tracing::debug!(id = %spec.id, "spec has no id, using cell directory name");
                }
                specs.push(spec);
            }
            Err(e) => {
                report_error(&e.to_string(), ctx.output, ctx.quiet);
                *failed = true;
            }
        }
    }
    specs
}

fn fallback_id(spec_path: &Path) -> String {
    cell_dir(spec_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_findings(findings: &[Finding]) {
    if findings.is_empty() {
        println!("  All message contracts validated: publishers and subscribers match");
        return;
    }
    for finding in findings {
        let marker = match finding.severity {
            FindingSeverity::Error => '-',
            FindingSeverity::Warning => '~',
        };
        println!("  {} {}", marker, finding.message);
    }
    println!("  Found {} message contract issues", findings.len());
}

fn write_map(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
