//! Spec parser: markdown `spec.md` text to [`CellSpec`].
//!
//! The document grammar is line oriented and deliberately permissive.
//! Recognized lines look like `key: value`, optionally preceded by a
//! markdown bullet (`-`, `*` or `+`) and with the key optionally wrapped in
//! `**bold**` markers. Every other line is prose and is skipped without
//! complaint.
//!
//! - required metadata keys (`id`, `name`, ...) -- last occurrence wins
//! - `subscribe` / `publish` -- appended in declaration order
//! - `envelope` -- last occurrence wins
//!
//! A `subscribe:` or `publish:` line with no value opens a block list: the
//! bullet lines directly below it are subjects of that kind. The first line
//! that is not a plain bullet (blank lines included) closes the block.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SpecError;
use crate::source::{FileSystemProvider, SourceProvider};
use crate::spec::{CellSpec, SubjectPattern};

fn key_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:[-*+]\s+)?(?:\*\*)?([A-Za-z_]+)(?:\*\*)?\s*:\s*(.*?)\s*$")
            .expect("key-value regex is valid")
    })
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-*+]\s+(.*?)\s*$").expect("list-item regex is valid"))
}

/// Subject list a block of bullets is appended to.
#[derive(Debug, Clone, Copy)]
enum SubjectList {
    Subscribe,
    Publish,
}

impl SubjectList {
    fn target(self, spec: &mut CellSpec) -> &mut Vec<SubjectPattern> {
        match self {
            SubjectList::Subscribe => &mut spec.subscribe,
            SubjectList::Publish => &mut spec.publish,
        }
    }
}

/// Parse document text into a [`CellSpec`]. Never fails.
pub fn parse_spec(text: &str, source_path: &str) -> CellSpec {
    let mut spec = CellSpec {
        source_path: source_path.to_string(),
        ..Default::default()
    };

    let mut open_list: Option<SubjectList> = None;
    for line in text.lines() {
        let Some(caps) = key_value_re().captures(line) else {
            match (open_list, list_item_re().captures(line)) {
                (Some(list), Some(item)) => {
                    let value = strip_md_value(&item[1]);
                    if !value.is_empty() {
                        list.target(&mut spec).push(SubjectPattern::new(value));
                    }
                }
                _ => open_list = None,
            }
            continue;
        };
        open_list = None;
        let key = caps[1].to_ascii_lowercase();
        let value = strip_md_value(strip_closing_bold(&caps[2]));
        if value.is_empty() {
            open_list = match key.as_str() {
                "subscribe" => Some(SubjectList::Subscribe),
                "publish" => Some(SubjectList::Publish),
                _ => None,
            };
            continue;
        }

        match key.as_str() {
            "subscribe" => spec.subscribe.push(SubjectPattern::new(value)),
            "publish" => spec.publish.push(SubjectPattern::new(value)),
            "envelope" => spec.envelope = Some(value.to_string()),
            other => {
                if let Some(slot) = spec.field_mut(other) {
                    *slot = value.to_string();
                }
            }
        }
    }

    tracing::debug!(
        path = source_path,
        id = %spec.id,
        subscribe = spec.subscribe.len(),
        publish = spec.publish.len(),
        "parsed spec"
    );
    spec
}

/// Read and parse the spec at `path` from the filesystem.
pub fn load_spec(path: &Path) -> Result<CellSpec, SpecError> {
    load_spec_with(path, &FileSystemProvider)
}

/// Read and parse the spec at `path` through `provider`.
pub fn load_spec_with(path: &Path, provider: &dyn SourceProvider) -> Result<CellSpec, SpecError> {
    if !provider.exists(path) {
        return Err(SpecError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = provider.read_source(path).map_err(|source| SpecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_spec(&text, &path.display().to_string()))
}

/// Drop the closing `**` of a `**key:** value` line. A leading `**` directly
/// followed by text that also ends in `**` is the value's own bold and is
/// left for [`strip_md_value`].
fn strip_closing_bold(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("**") else {
        return raw;
    };
    let own_bold =
        !rest.is_empty() && !rest.starts_with(char::is_whitespace) && rest.ends_with("**");
    if own_bold {
        raw
    } else {
        rest.trim_start()
    }
}

/// Strip wrapping backticks and emphasis markers from a value.
fn strip_md_value(raw: &str) -> &str {
    let mut s = raw.trim();
    loop {
        let before = s;
        for marker in ["`", "**", "*"] {
            if s.len() >= 2 * marker.len() && s.starts_with(marker) && s.ends_with(marker) {
                s = s[marker.len()..s.len() - marker.len()].trim();
            }
        }
        if s == before {
            return s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProvider;
    use std::collections::HashMap;
    use std::path::PathBuf;

    const GREETER: &str = r#"# Greeter cell

Some prose describing the cell. Note: this line is ignored.

## Identity
- **id**: logic_greet
- **name**: Greeter
- **version**: 1.0.0
- **language**: rust
- **category**: logic
- **purpose**: Formats greeting messages

## Interface
- subscribe: `cbs.greeter_logic.say_hello`
- subscribe: `cbs.greeter_logic.say_goodbye`
- publish: `cbs.greeter_logic.greeted`
- envelope: v1 JSON envelope
"#;

    #[test]
    fn parses_full_document() {
        let spec = parse_spec(GREETER, "cells/greet/ai/spec.md");
        assert_eq!(spec.id, "logic_greet");
        assert_eq!(spec.name, "Greeter");
        assert_eq!(spec.version, "1.0.0");
        assert_eq!(spec.language, "rust");
        assert_eq!(spec.category, "logic");
        assert_eq!(spec.purpose, "Formats greeting messages");
        assert_eq!(
            spec.subscribe,
            vec![
                SubjectPattern::from("cbs.greeter_logic.say_hello"),
                SubjectPattern::from("cbs.greeter_logic.say_goodbye"),
            ]
        );
        assert_eq!(spec.publish, vec![SubjectPattern::from("cbs.greeter_logic.greeted")]);
        assert_eq!(spec.envelope.as_deref(), Some("v1 JSON envelope"));
        assert_eq!(spec.source_path, "cells/greet/ai/spec.md");
    }

    #[test]
    fn keys_are_case_insensitive_and_markers_optional() {
        let text = "**ID**: `abc`\n  Language :  *rust*\n- **Subscribe**: cbs.a.b\n";
        let spec = parse_spec(text, "x");
        assert_eq!(spec.id, "abc");
        assert_eq!(spec.language, "rust");
        assert_eq!(spec.subscribe, vec![SubjectPattern::from("cbs.a.b")]);
    }

    #[test]
    fn bold_colon_inside_markers() {
        let spec = parse_spec("- **purpose:** does things\n", "x");
        assert_eq!(spec.purpose, "does things");

        let spec = parse_spec("- **purpose**: **Tracks baskets**\n", "x");
        assert_eq!(spec.purpose, "Tracks baskets");

        let spec = parse_spec("- **purpose:** **Tracks**\n- **id:** `cart`\n", "x");
        assert_eq!(spec.purpose, "Tracks");
        assert_eq!(spec.id, "cart");
    }

    #[test]
    fn star_and_plus_bullets() {
        let spec = parse_spec("* **id**: x\n+ language: rust\n* subscribe: cbs.a.b\n", "x");
        assert_eq!(spec.id, "x");
        assert_eq!(spec.language, "rust");
        assert_eq!(spec.subscribe, vec![SubjectPattern::from("cbs.a.b")]);
    }

    #[test]
    fn block_list_subjects() {
        let text = "\
- **subscribe**:
  - `cbs.cart_logic.add`
  - cbs.cart_logic.remove
- publish:
  * cbs.cart_logic.changed
- **id**: cart
- not a subject either
";
        let spec = parse_spec(text, "x");
        let subscribe: Vec<&str> = spec.subscribe.iter().map(|s| s.as_str()).collect();
        assert_eq!(subscribe, vec!["cbs.cart_logic.add", "cbs.cart_logic.remove"]);
        assert_eq!(spec.publish, vec![SubjectPattern::from("cbs.cart_logic.changed")]);
        assert_eq!(spec.id, "cart");
    }

    #[test]
    fn block_list_closes_at_first_non_bullet() {
        let text = "- subscribe:\n  - cbs.a.one\n\n- cbs.a.two\n## Notes\n- publish: cbs.a.three\n- cbs.a.four\n";
        let spec = parse_spec(text, "x");
        assert_eq!(spec.subscribe, vec![SubjectPattern::from("cbs.a.one")]);
        assert_eq!(spec.publish, vec![SubjectPattern::from("cbs.a.three")]);
    }

    #[test]
    fn envelope_last_occurrence_wins() {
        let text = "- envelope: first\n- envelope: second\n";
        let spec = parse_spec(text, "x");
        assert_eq!(spec.envelope.as_deref(), Some("second"));
    }

    #[test]
    fn unknown_and_malformed_lines_are_ignored() {
        let text = "random text\n- **owner**: team\n- subscribe:\n:::\n- publish: ``\n";
        let spec = parse_spec(text, "x");
        assert_eq!(
            spec,
            CellSpec {
                source_path: "x".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn subjects_keep_order_across_interleaving() {
        let text = "- publish: cbs.a.one\n- subscribe: cbs.a.two\n- publish: cbs.a.three\n";
        let spec = parse_spec(text, "x");
        let publish: Vec<&str> = spec.publish.iter().map(|s| s.as_str()).collect();
        assert_eq!(publish, vec!["cbs.a.one", "cbs.a.three"]);
    }

    #[test]
    fn load_missing_spec_is_not_found() {
        let provider = InMemoryProvider::new(HashMap::new());
        let err = load_spec_with(Path::new("app/ai/spec.md"), &provider).unwrap_err();
        assert!(matches!(err, SpecError::NotFound { .. }));
    }

    #[test]
    fn load_from_provider_records_source_path() {
        let mut files: HashMap<PathBuf, String> = HashMap::new();
        files.insert("app/ai/spec.md".into(), GREETER.to_string());
        let provider = InMemoryProvider::new(files);
        let spec = load_spec_with(Path::new("app/ai/spec.md"), &provider).unwrap();
        assert_eq!(spec.id, "logic_greet");
        assert_eq!(spec.source_path, "app/ai/spec.md");
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.md");
        std::fs::write(&path, GREETER).unwrap();
        let spec = load_spec(&path).unwrap();
        assert_eq!(spec.publish.len(), 1);
    }

    #[test]
    fn strip_md_value_unwraps_nested_markers() {
        assert_eq!(strip_md_value(" **`cbs.a.b`** "), "cbs.a.b");
        assert_eq!(strip_md_value("`"), "`");
        assert_eq!(strip_md_value("cbs.orders.*"), "cbs.orders.*");
    }
}
