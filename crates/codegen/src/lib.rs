//! cbs-codegen: cell stub generation from a [`CellSpec`].
//!
//! [`generate()`] resolves a template for the spec's language, renders one
//! stub registering a placeholder handler per subscribed subject, and
//! returns a [`GenerationPlan`]. Nothing is written until the plan is
//! executed in [`GenerationMode::Apply`].

pub mod error;
pub mod plan;
pub mod templates;

pub use error::CodegenError;
pub use plan::{backup_path, GenerationMode, GenerationPlan, WrittenFile};
pub use templates::{CellTemplate, DartTemplate, RenderContext, RustTemplate, TemplateRegistry};

use std::path::Path;

use cbs_core::spec::missing_of;
use cbs_core::{CellSpec, SUBJECT_PREFIX};

/// Fields generation needs. Narrower than full validation so drafts can be
/// scaffolded early.
pub const GENERATION_REQUIRED: [&str; 3] = ["id", "language", "category"];

/// Directory (relative to the cell directory) generated sources go into.
pub const SOURCE_DIR: &str = "lib";

/// Plan the stub for `spec` under `cell_dir` using the built-in templates.
pub fn generate(spec: &CellSpec, cell_dir: &Path) -> Result<GenerationPlan, CodegenError> {
    generate_with(spec, cell_dir, &TemplateRegistry::builtin())
}

/// Plan the stub for `spec` under `cell_dir` using `registry`.
pub fn generate_with(
    spec: &CellSpec,
    cell_dir: &Path,
    registry: &TemplateRegistry,
) -> Result<GenerationPlan, CodegenError> {
    let missing = missing_of(spec, &GENERATION_REQUIRED);
    if !missing.is_empty() {
        return Err(CodegenError::MissingFields(
            missing.into_iter().map(str::to_string).collect(),
        ));
    }

    let id = spec.id.trim();
    if !is_cell_id(id) {
        return Err(CodegenError::InvalidId(id.to_string()));
    }

    let language = spec.language.trim().to_ascii_lowercase();
    let template = registry
        .get(&language)
        .ok_or(CodegenError::UnsupportedLanguage(language))?;

    let ctx = RenderContext {
        spec,
        handled: handled_subjects(spec),
        published: spec.publish.iter().map(|s| s.as_str().to_string()).collect(),
    };

    let path = cell_dir.join(SOURCE_DIR).join(template.file_name(id));
    tracing::debug!(
        id,
        language = template.language(),
        path = %path.display(),
        "planned cell stub"
    );

    let mut plan = GenerationPlan::default();
    plan.files.insert(path, template.render(&ctx));
    Ok(plan)
}

/// Subjects the stub registers handlers for: the spec's subscriptions, or
/// `cbs.<id>.process` when it declares none.
pub fn handled_subjects(spec: &CellSpec) -> Vec<String> {
    if spec.subscribe.is_empty() {
        vec![format!("{}{}.process", SUBJECT_PREFIX, spec.id.trim())]
    } else {
        spec.subscribe
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    }
}

/// `[a-z_][a-z0-9_]*`: usable both as a file stem and inside a type name.
fn is_cell_id(id: &str) -> bool {
    let mut bytes = id.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_lowercase() || b == b'_')
        && bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbs_core::parse_spec;

    #[test]
    fn missing_generation_fields() {
        let spec = parse_spec("- **id**: a\n", "a/ai/spec.md");
        match generate(&spec, Path::new("a")) {
            Err(CodegenError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["language", "category"])
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_language_names_value() {
        let spec = parse_spec(
            "- **id**: a\n- **language**: COBOL\n- **category**: io\n",
            "a/ai/spec.md",
        );
        let err = generate(&spec, Path::new("a")).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedLanguage(ref l) if l == "cobol"));
        assert_eq!(err.to_string(), "unsupported language: cobol");
    }

    #[test]
    fn rejects_ids_unusable_as_paths_or_types() {
        for id in ["../../../../escaped", "a/b", "Orders", "9lives", "io-prompt", "a.b"] {
            let text = format!("- **id**: {}\n- **language**: rust\n- **category**: io\n", id);
            let spec = parse_spec(&text, "x");
            match generate(&spec, Path::new("cells/a")) {
                Err(CodegenError::InvalidId(got)) => assert_eq!(got, id),
                other => panic!("expected InvalidId for {}, got {:?}", id, other),
            }
        }
        assert!(is_cell_id("_internal2"));
        assert!(is_cell_id("pricing_engine"));
    }

    #[test]
    fn default_subject_when_none_subscribed() {
        let spec = parse_spec(
            "- **id**: lonely\n- **language**: rust\n- **category**: io\n- publish: cbs.lonely_io.out\n",
            "x",
        );
        assert_eq!(handled_subjects(&spec), vec!["cbs.lonely.process"]);
    }

    #[test]
    fn plan_path_follows_language_convention() {
        let rust = parse_spec(
            "- **id**: orders\n- **language**: Rust\n- **category**: logic\n",
            "x",
        );
        let plan = generate(&rust, Path::new("cells/orders")).unwrap();
        let paths: Vec<&Path> = plan.planned_paths().collect();
        assert_eq!(paths, vec![Path::new("cells/orders/lib/orders.rs")]);
        assert_eq!(plan.mode, GenerationMode::DryRun);

        let dart = parse_spec(
            "- **id**: orders\n- **language**: dart\n- **category**: ui\n",
            "x",
        );
        let plan = generate(&dart, Path::new("cells/orders")).unwrap();
        let paths: Vec<&Path> = plan.planned_paths().collect();
        assert_eq!(paths, vec![Path::new("cells/orders/lib/orders_cell.dart")]);
    }
}
