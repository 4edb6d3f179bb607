//! Dart cell stub: a class implementing the SDK `Cell` interface.

use super::{cell_type_name, CellTemplate, RenderContext};

pub struct DartTemplate;

impl CellTemplate for DartTemplate {
    fn language(&self) -> &'static str {
        "dart"
    }

    fn file_name(&self, id: &str) -> String {
        format!("{}_cell.dart", id)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let id = ctx.spec.id.trim();
        let ty = cell_type_name(id);
        let subjects = dart_list(&ctx.handled);
        let publishes = dart_list(&ctx.published);
        let registrations = ctx
            .handled
            .iter()
            .map(|s| format!("    await bus.subscribe({}, _handle);", dart_string(s)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"// Generated by cbs generate-cell from {source}.
// Handlers are placeholders; fill in the cell's behaviour.
import 'dart:async';
import 'package:cbs_sdk/cbs_sdk.dart';

class {ty} implements Cell {{
  /// Subjects this cell publishes.
  static const List<String> publishes = {publishes};

  @override
  String get id => {id};

  @override
  List<String> get subjects => {subjects};

  @override
  Future<void> register(Bus bus) async {{
{registrations}
  }}

  Future<Envelope> _handle(Envelope envelope) async {{
    return envelope.createResponse({{'ok': true}});
  }}
}}
"#,
            source = ctx.spec.source_path,
            ty = ty,
            publishes = publishes,
            id = dart_string(id),
            subjects = subjects,
            registrations = registrations,
        )
    }
}

/// Single-quoted Dart string literal.
fn dart_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('$', "\\$");
    format!("'{}'", escaped)
}

fn dart_list(items: &[String]) -> String {
    let inner = items
        .iter()
        .map(|s| dart_string(s))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}
