use std::path::Path;

use serde::Serialize;

use cbs_codegen::{generate, GenerationMode, WrittenFile};
use cbs_core::load_spec;

use crate::commands::print_json;
use crate::discover::{cell_dir, resolve_spec_arg};
use crate::{report_error, Context, OutputFormat};

#[derive(Debug, Serialize)]
struct GenerateResult {
    spec: String,
    mode: GenerationMode,
    planned: Vec<String>,
    written: Vec<WrittenFile>,
}

pub(crate) fn cmd_generate_cell(ctx: &Context, arg: &Path, apply: bool) -> i32 {
    let spec_path = resolve_spec_arg(arg);
    let spec = match load_spec(&spec_path) {
        Ok(spec) => spec,
        Err(e) => {
            report_error(&e.to_string(), ctx.output, ctx.quiet);
            return 1;
        }
    };

    let mode = if apply {
        GenerationMode::Apply
    } else {
        GenerationMode::DryRun
    };
    let plan = match generate(&spec, &cell_dir(&spec_path)) {
        Ok(plan) => plan.with_mode(mode),
        Err(e) => {
            report_error(&e.to_string(), ctx.output, ctx.quiet);
            return 1;
        }
    };

    let planned: Vec<String> = plan
        .planned_paths()
        .map(|p| p.display().to_string())
        .collect();
    let text = ctx.output == OutputFormat::Text && !ctx.quiet;
    if text {
        println!("Planned outputs:");
        for path in &planned {
            println!("  {}", path);
        }
        if !plan.is_apply() {
            println!("(dry-run) use --apply to write files; existing files get .bak backups");
        }
    }

    let written = match plan.execute() {
        Ok(written) => written,
        Err(e) => {
            report_error(&e.to_string(), ctx.output, ctx.quiet);
            return 1;
        }
    };
    if text {
        for file in &written {
            if let Some(backup) = &file.backup {
                println!("backed up {}", backup.display());
            }
            println!("wrote {}", file.path.display());
        }
    }

    if ctx.output == OutputFormat::Json {
        print_json(&GenerateResult {
            spec: spec_path.display().to_string(),
            mode,
            planned,
            written,
        });
    }
    0
}
