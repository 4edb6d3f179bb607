//! Integration tests for cell stub generation.
//!
//! Each test lays out a cell directory in a temp dir, parses its spec and
//! runs the plan in dry-run or apply mode.

use std::fs;
use std::path::{Path, PathBuf};

use cbs_codegen::{backup_path, generate, CodegenError, GenerationMode};
use cbs_core::load_spec;

const PRICING_SPEC: &str = "\
# Pricing Engine

- **id**: pricing_engine
- **name**: Pricing Engine
- **version**: 1.0.0
- **language**: rust
- **category**: logic
- **purpose**: Calculates prices

## Bus Contract
- **subscribe**: `cbs.pricing_engine_logic.calculate`
- **publish**: `cbs.pricing_engine_logic.calculated`
";

/// Write `spec` to `<root>/<cell>/ai/spec.md` and return the cell dir.
fn write_cell(root: &Path, cell: &str, spec: &str) -> PathBuf {
    let cell_dir = root.join(cell);
    fs::create_dir_all(cell_dir.join("ai")).expect("create ai dir");
    fs::write(cell_dir.join("ai").join("spec.md"), spec).expect("write spec");
    cell_dir
}

#[test]
fn dry_run_touches_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cell_dir = write_cell(dir.path(), "pricing", PRICING_SPEC);
    let spec = load_spec(&cell_dir.join("ai/spec.md")).expect("load spec");

    let plan = generate(&spec, &cell_dir).expect("plan");
    let written = plan.execute().expect("dry run");

    assert!(written.is_empty());
    assert!(!cell_dir.join("lib").exists());
}

#[test]
fn apply_writes_rust_stub() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cell_dir = write_cell(dir.path(), "pricing", PRICING_SPEC);
    let spec = load_spec(&cell_dir.join("ai/spec.md")).expect("load spec");

    let plan = generate(&spec, &cell_dir)
        .expect("plan")
        .with_mode(GenerationMode::Apply);
    let written = plan.execute().expect("apply");

    let target = cell_dir.join("lib").join("pricing_engine.rs");
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].path, target);
    assert!(written[0].backup.is_none());

    let content = fs::read_to_string(&target).expect("read stub");
    assert!(content.contains("pub struct PricingEngineCell"));
    assert_eq!(content.matches("bus.subscribe(").count(), 1);
    assert!(content.contains("\"cbs.pricing_engine_logic.calculate\""));
    assert!(content.contains("PUBLISHES: &[&str] = &[\"cbs.pricing_engine_logic.calculated\"]"));
}

#[test]
fn second_apply_keeps_first_output_as_backup() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cell_dir = write_cell(dir.path(), "pricing", PRICING_SPEC);
    let spec_path = cell_dir.join("ai/spec.md");
    let target = cell_dir.join("lib").join("pricing_engine.rs");

    let first = load_spec(&spec_path).expect("load spec");
    generate(&first, &cell_dir)
        .expect("plan")
        .with_mode(GenerationMode::Apply)
        .execute()
        .expect("first apply");
    let first_output = fs::read_to_string(&target).expect("read first");

    let revised = PRICING_SPEC.replace(
        "- **publish**: `cbs.pricing_engine_logic.calculated`",
        "- **subscribe**: `cbs.pricing_engine_logic.recalculate`\n- **publish**: `cbs.pricing_engine_logic.calculated`",
    );
    fs::write(&spec_path, revised).expect("rewrite spec");
    let second = load_spec(&spec_path).expect("load spec");
    let written = generate(&second, &cell_dir)
        .expect("plan")
        .with_mode(GenerationMode::Apply)
        .execute()
        .expect("second apply");

    assert_eq!(written[0].backup.as_deref(), Some(backup_path(&target).as_path()));
    assert_eq!(
        fs::read_to_string(backup_path(&target)).expect("read backup"),
        first_output
    );
    let second_output = fs::read_to_string(&target).expect("read second");
    assert_eq!(second_output.matches("bus.subscribe(").count(), 2);
}

#[test]
fn dart_stub_lands_under_lib() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cell_dir = write_cell(
        dir.path(),
        "prompt",
        "- **id**: io_prompt_name\n- **language**: dart\n- **category**: io\n\
         - **subscribe**: `cbs.prompt_io.ask`\n",
    );
    let spec = load_spec(&cell_dir.join("ai/spec.md")).expect("load spec");

    generate(&spec, &cell_dir)
        .expect("plan")
        .with_mode(GenerationMode::Apply)
        .execute()
        .expect("apply");

    let content = fs::read_to_string(cell_dir.join("lib").join("io_prompt_name_cell.dart"))
        .expect("read stub");
    assert!(content.contains("class IoPromptNameCell implements Cell"));
    assert!(content.contains("await bus.subscribe('cbs.prompt_io.ask', _handle);"));
}

#[test]
fn rejected_specs_write_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");

    let cobol = write_cell(
        dir.path(),
        "legacy",
        "- **id**: legacy\n- **language**: cobol\n- **category**: io\n",
    );
    let spec = load_spec(&cobol.join("ai/spec.md")).expect("load spec");
    assert!(matches!(
        generate(&spec, &cobol),
        Err(CodegenError::UnsupportedLanguage(ref l)) if l == "cobol"
    ));

    let draft = write_cell(dir.path(), "draft", "- **language**: rust\n");
    let spec = load_spec(&draft.join("ai/spec.md")).expect("load spec");
    match generate(&spec, &draft) {
        Err(CodegenError::MissingFields(fields)) => assert_eq!(fields, vec!["id", "category"]),
        other => panic!("expected MissingFields, got {:?}", other.map(|p| p.files.len())),
    }

    assert!(!cobol.join("lib").exists());
    assert!(!draft.join("lib").exists());
}

#[test]
fn traversal_id_is_rejected_before_writing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cell_dir = write_cell(
        dir.path(),
        "apps/shop/cells/cart",
        "- **id**: ../../../../escaped\n- **language**: rust\n- **category**: logic\n",
    );
    let spec = load_spec(&cell_dir.join("ai/spec.md")).expect("load spec");

    let err = generate(&spec, &cell_dir).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidId(ref id) if id == "../../../../escaped"));
    assert!(!cell_dir.join("lib").exists());
    assert!(!dir.path().join("apps/escaped.rs").exists());
}
