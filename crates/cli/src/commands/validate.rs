use serde::Serialize;

use cbs_core::{load_spec, Diagnostic};

use crate::commands::{display_path, print_json};
use crate::discover::workspace_specs;
use crate::{Context, OutputFormat};

/// Outcome for one spec document.
#[derive(Debug, Serialize)]
struct DocumentResult {
    path: String,
    ok: bool,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    /// Set when the document could not be read at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    read_error: Option<String>,
}

pub(crate) fn cmd_validate(ctx: &Context) -> i32 {
    let paths = workspace_specs(&ctx.root, &ctx.config.workspace);
    tracing::debug!(count = paths.len(), "discovered specs");

    let results: Vec<DocumentResult> = paths
        .iter()
        .map(|path| {
            let shown = display_path(&ctx.root, path);
            match load_spec(path) {
                Ok(spec) => {
                    let report = cbs_core::validate(&spec, &ctx.config.validation);
                    DocumentResult {
                        path: shown,
                        ok: report.is_ok(),
                        errors: report.errors,
                        warnings: report.warnings,
                        read_error: None,
                    }
                }
                Err(e) => DocumentResult {
                    path: shown,
                    ok: false,
                    errors: Vec::new(),
                    warnings: Vec::new(),
                    read_error: Some(e.to_string()),
                },
            }
        })
        .collect();

    let failed = results.iter().filter(|r| !r.ok).count();

    match ctx.output {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Text => {
            if results.is_empty() {
                if !ctx.quiet {
                    println!("No spec.md files found.");
                }
                return 0;
            }
            for result in &results {
                print_result(result, ctx.quiet);
            }
        }
    }

    if failed > 0 {
        1
    } else {
        0
    }
}

/// `OK   <path>` or `FAIL <path>`, then errors (`  - `) and warnings (`  ~ `).
/// Quiet mode keeps failing documents and their errors only.
fn print_result(result: &DocumentResult, quiet: bool) {
    if result.ok {
        if quiet {
            return;
        }
        println!("OK   {}", result.path);
    } else {
        println!("FAIL {}", result.path);
    }
    if let Some(err) = &result.read_error {
        println!("  - {}", err);
    }
    for e in &result.errors {
        println!("  - {}", e);
    }
    if !quiet {
        for w in &result.warnings {
            println!("  ~ {}", w);
        }
    }
}
