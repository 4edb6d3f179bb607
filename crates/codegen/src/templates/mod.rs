//! Per-language cell templates and the registry that selects them.

mod dart;
mod rust;

pub use dart::DartTemplate;
pub use rust::RustTemplate;

use std::collections::BTreeMap;

use cbs_core::CellSpec;

/// Everything a template needs to render one cell stub.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub spec: &'a CellSpec,
    /// Subjects to register handlers for; never empty.
    pub handled: Vec<String>,
    /// Subjects the cell publishes, listed for the author.
    pub published: Vec<String>,
}

/// A target language for generated cell stubs.
pub trait CellTemplate: Send + Sync {
    /// Lower-case language key, as written in a spec's `language` field.
    fn language(&self) -> &'static str;

    /// File name of the stub for cell `id`, e.g. `orders.rs`.
    fn file_name(&self, id: &str) -> String;

    /// Full source text of the stub.
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// Templates keyed by lower-case language name.
pub struct TemplateRegistry {
    templates: BTreeMap<String, Box<dyn CellTemplate>>,
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        TemplateRegistry {
            templates: BTreeMap::new(),
        }
    }

    /// Registry with the built-in Rust and Dart templates.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(RustTemplate));
        registry.register(Box::new(DartTemplate));
        registry
    }

    /// Add or replace the template for its language.
    pub fn register(&mut self, template: Box<dyn CellTemplate>) {
        self.templates
            .insert(template.language().to_string(), template);
    }

    /// Look up a template; language matching is case-insensitive.
    pub fn get(&self, language: &str) -> Option<&dyn CellTemplate> {
        self.templates
            .get(&language.trim().to_ascii_lowercase())
            .map(|t| t.as_ref())
    }

    pub fn languages(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `pricing_engine` -> `PricingEngineCell`.
pub(crate) fn cell_type_name(id: &str) -> String {
    let mut name: String = id
        .split(['_', '-', '.', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    name.push_str("Cell");
    name
}
