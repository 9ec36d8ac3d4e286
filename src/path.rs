//! Dotted-path resolution over a JSON tree
//!
//! Supports:
//! - a.b.c (object fields)
//! - items.0.name (numeric segment as array index)
//! - items[0].name (bracket index)
//! - $.a.b (optional $ prefix)
//!
//! Resolution is total: a path that matches nothing yields `None`,
//! never an error.

use serde_json::Value;

/// A parsed path segment
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object field access: .field
    Field(String),
    /// Array index access: [0] or a bare numeric segment
    Index(usize),
}

/// Parse a dotted path into segments.
///
/// Parsing is lenient: anything that is not a well-formed index is kept as
/// a field name and simply resolves to nothing later.
pub fn parse(path: &str) -> Vec<Segment> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            segments.push(Segment::Field(String::new()));
            continue;
        }

        let mut rest = part;
        while let Some(open) = rest.find('[') {
            let field = &rest[..open];
            if !field.is_empty() {
                push_plain(field, &mut segments);
            }
            match rest[open..].find(']') {
                Some(close_rel) => {
                    let close = open + close_rel;
                    push_plain(&rest[open + 1..close], &mut segments);
                    rest = &rest[close + 1..];
                }
                None => {
                    // Unterminated bracket: keep the raw text as a field so
                    // resolution lands on absent instead of failing.
                    push_plain(&rest[open..], &mut segments);
                    rest = "";
                }
            }
        }
        if !rest.is_empty() {
            push_plain(rest, &mut segments);
        }
    }

    segments
}

fn push_plain(text: &str, segments: &mut Vec<Segment>) {
    match text.parse::<usize>() {
        Ok(index) => segments.push(Segment::Index(index)),
        Err(_) => segments.push(Segment::Field(text.to_string())),
    }
}

/// Apply segments to a value, walking by reference.
pub fn apply<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = match segment {
            Segment::Field(name) => current.get(name.as_str())?,
            Segment::Index(index) => current.get(*index)?,
        };
    }
    Some(current)
}

/// Parse and apply in one step, cloning the resolved value out of the tree.
pub fn resolve(value: &Value, path: &str) -> Option<Value> {
    apply(value, &parse(path)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_simple_path() {
        assert_eq!(
            parse("a.b.c"),
            vec![
                Segment::Field("a".to_string()),
                Segment::Field("b".to_string()),
                Segment::Field("c".to_string()),
            ]
        );
    }

    #[test]
    fn parse_with_dollar_prefix() {
        assert_eq!(
            parse("$.a.b"),
            vec![
                Segment::Field("a".to_string()),
                Segment::Field("b".to_string()),
            ]
        );
    }

    #[test]
    fn parse_bracket_index() {
        assert_eq!(
            parse("items[0].name"),
            vec![
                Segment::Field("items".to_string()),
                Segment::Index(0),
                Segment::Field("name".to_string()),
            ]
        );
    }

    #[test]
    fn parse_numeric_segment_as_index() {
        assert_eq!(
            parse("items.1"),
            vec![Segment::Field("items".to_string()), Segment::Index(1)]
        );
    }

    #[test]
    fn parse_just_root() {
        assert!(parse("$").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn resolve_nested_field() {
        let value = json!({"metadata": {"license": "MIT"}});
        assert_eq!(resolve(&value, "metadata.license"), Some(json!("MIT")));
    }

    #[test]
    fn resolve_array_index() {
        let value = json!({"items": ["first", "second"]});
        assert_eq!(resolve(&value, "items[1]"), Some(json!("second")));
        assert_eq!(resolve(&value, "items.0"), Some(json!("first")));
    }

    #[test]
    fn resolve_missing_is_absent() {
        let value = json!({"a": 1});
        assert_eq!(resolve(&value, "b"), None);
        assert_eq!(resolve(&value, "a.b.c"), None);
        assert_eq!(resolve(&value, "a.0"), None);
    }

    #[test]
    fn resolve_missing_intermediate_is_absent() {
        let value = json!({"metadata": {"license": "MIT"}});
        assert_eq!(resolve(&value, "metadata.missing.deep"), None);
    }

    #[test]
    fn resolve_empty_path_is_whole_tree() {
        let value = json!({"a": 1});
        assert_eq!(resolve(&value, ""), Some(value.clone()));
    }

    #[test]
    fn resolve_against_non_container() {
        let value = json!(42);
        assert_eq!(resolve(&value, "anything"), None);
    }

    #[test]
    fn malformed_bracket_is_absent_not_error() {
        let value = json!({"items": [1, 2]});
        assert_eq!(resolve(&value, "items[x]"), None);
        assert_eq!(resolve(&value, "items[0"), None);
    }
}
