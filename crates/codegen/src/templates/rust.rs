//! Rust cell stub: a struct implementing the bus `Cell` trait.

use std::fmt::Write as _;

use super::{cell_type_name, CellTemplate, RenderContext};

pub struct RustTemplate;

impl CellTemplate for RustTemplate {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn file_name(&self, id: &str) -> String {
        format!("{}.rs", id)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let id = ctx.spec.id.trim();
        let ty = cell_type_name(id);
        let subjects = ctx
            .handled
            .iter()
            .map(|s| format!("{:?}.to_string()", s))
            .collect::<Vec<_>>()
            .join(", ");
        let publishes = ctx
            .published
            .iter()
            .map(|s| format!("{:?}", s))
            .collect::<Vec<_>>()
            .join(", ");

        let mut registrations = String::new();
        for subject in &ctx.handled {
            let _ = write!(
                registrations,
                "\n        bus.subscribe({:?}, Box::new(Self::handle)).await?;",
                subject
            );
        }

        format!(
            r#"// Generated by cbs generate-cell from {source}.
// Handlers are placeholders; fill in the cell's behaviour.
use async_trait::async_trait;
use body_core::{{BodyBus, BusError, Cell, Envelope}};
use serde_json::{{json, Value}};

/// Subjects this cell publishes.
pub const PUBLISHES: &[&str] = &[{publishes}];

pub struct {ty} {{
    id: String,
}}

impl {ty} {{
    pub fn new() -> Self {{
        Self {{
            id: {id:?}.to_string(),
        }}
    }}

    /// Placeholder handler: acknowledges every envelope.
    pub fn handle(envelope: Envelope) -> Result<Value, BusError> {{
        Ok(json!({{ "ok": true, "id": envelope.id }}))
    }}
}}

impl Default for {ty} {{
    fn default() -> Self {{
        Self::new()
    }}
}}

#[async_trait]
impl Cell for {ty} {{
    fn id(&self) -> &str {{
        &self.id
    }}

    fn subjects(&self) -> Vec<String> {{
        vec![{subjects}]
    }}

    async fn register(&self, bus: &dyn BodyBus) -> Result<(), BusError> {{{registrations}
        Ok(())
    }}
}}
"#,
            source = ctx.spec.source_path,
            publishes = publishes,
            ty = ty,
            id = id,
            subjects = subjects,
            registrations = registrations,
        )
    }
}
