//!
//! # Path Expressions
//!
//! Constrained JSONPath dialect used by printer columns and status mapping:
//! dot separated field access with an optional leading `.` and at most one
//! equality filter segment, `conditions[?(@.type=="Ready")]`.
//!
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::format::scalar_text;
use crate::PathError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    /// select first element of `field` whose `key` stringifies to `literal`.
    /// empty `field` filters the current value
    Filter {
        field: String,
        key: String,
        literal: String,
    },
}

#[derive(Debug, Clone)]
pub struct PathExpr {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    pub fn parse(expr: &str) -> Result<Self, PathError> {
        let trimmed = expr.trim();
        let body = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = vec![];
        let mut filters = 0;
        for part in split_segments(body) {
            let segment = parse_segment(part, trimmed)?;
            if matches!(segment, Segment::Filter { .. }) {
                filters += 1;
                if filters > 1 {
                    return Err(PathError::MultipleFilters(trimmed.to_owned()));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: trimmed.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// evaluate against document. absent if any step misses
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        let mut current = doc;
        for segment in &self.segments {
            current = match segment {
                Segment::Field(name) => current.as_object()?.get(name)?,
                Segment::Filter {
                    field,
                    key,
                    literal,
                } => {
                    let array = if field.is_empty() {
                        current
                    } else {
                        current.as_object()?.get(field)?
                    };
                    array.as_array()?.iter().find(|item| {
                        item.as_object()
                            .and_then(|fields| fields.get(key))
                            .and_then(scalar_text)
                            .map_or(false, |text| text == *literal)
                    })?
                }
            };
        }
        Some(current)
    }

    pub fn has_filter(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Filter { .. }))
    }
}

/// two expressions are equal when they select the same thing, `.a.b` == `a.b`
impl PartialEq for PathExpr {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for PathExpr {}

impl FromStr for PathExpr {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// resolve string expression against document.
/// malformed expression resolves to nothing
pub fn resolve<'a>(doc: &'a Value, expr: &str) -> Option<&'a Value> {
    match PathExpr::parse(expr) {
        Ok(path) => path.resolve(doc),
        Err(err) => {
            debug!("ignoring path expression '{}': {}", expr, err);
            None
        }
    }
}

/// split on dots outside of brackets and quotes
fn split_segments(body: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '.') if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn parse_segment(part: &str, expr: &str) -> Result<Segment, PathError> {
    let part = part.trim();
    match part.find('[') {
        None if part.is_empty() => Err(PathError::EmptySegment(expr.to_owned())),
        None => Ok(Segment::Field(part.to_owned())),
        Some(open) => {
            let malformed = || PathError::MalformedFilter(expr.to_owned());
            let field = part[..open].trim();
            let inner = part[open..]
                .strip_prefix("[?(")
                .and_then(|rest| rest.strip_suffix(")]"))
                .ok_or_else(malformed)?;
            let (lhs, rhs) = inner.split_once("==").ok_or_else(malformed)?;
            let key = lhs.trim().strip_prefix("@.").ok_or_else(malformed)?.trim();
            if key.is_empty() {
                return Err(malformed());
            }
            Ok(Segment::Filter {
                field: field.to_owned(),
                key: key.to_owned(),
                literal: unquote(rhs.trim()).to_owned(),
            })
        }
    }
}

fn unquote(literal: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = literal
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    literal
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::resolve;
    use super::PathExpr;
    use crate::PathError;

    #[test]
    fn test_simple_access() {
        let doc = json!({
            "metadata": { "name": "web", "labels": { "app": "nginx" } },
            "spec": { "replicas": 3, "paused": false }
        });

        assert_eq!(resolve(&doc, ".metadata.name"), Some(&json!("web")));
        assert_eq!(resolve(&doc, "metadata.labels.app"), Some(&json!("nginx")));
        assert_eq!(resolve(&doc, "spec.replicas"), Some(&json!(3)));
        assert_eq!(resolve(&doc, "spec.paused"), Some(&json!(false)));
        assert_eq!(resolve(&doc, "spec.missing"), None);
    }

    #[test]
    fn test_short_circuit_through_non_objects() {
        let doc = json!({ "a": null, "b": "text", "c": [1, 2] });
        assert_eq!(resolve(&doc, "a.x"), None);
        assert_eq!(resolve(&doc, "b.x"), None);
        assert_eq!(resolve(&doc, "c.x"), None);
        assert_eq!(resolve(&doc, "a"), Some(&json!(null)));
    }

    #[test]
    fn test_filter() {
        let doc = json!({"items":[{"name":"a","v":1},{"name":"b","v":2}]});
        assert_eq!(resolve(&doc, r#"items[?(@.name=="b")].v"#), Some(&json!(2)));
        assert_eq!(resolve(&doc, r#"items[?(@.name=="c")].v"#), None);
        assert_eq!(
            resolve(&doc, r#"items[?(@.name=="a")]"#),
            Some(&json!({"name":"a","v":1}))
        );
        assert_eq!(resolve(&doc, "items[?(@.v=='2')].name"), Some(&json!("b")));
        assert_eq!(resolve(&doc, r#"name[?(@.name=="a")]"#), None);
    }

    #[test]
    fn test_filter_literal_with_dot() {
        let doc = json!({
            "status": {
                "conditions": [
                    { "type": "cert-manager.io/Ready", "status": "True" }
                ]
            }
        });
        assert_eq!(
            resolve(
                &doc,
                r#".status.conditions[?(@.type=="cert-manager.io/Ready")].status"#
            ),
            Some(&json!("True"))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PathExpr::parse("").unwrap_err(), PathError::Empty);
        assert_eq!(PathExpr::parse(".").unwrap_err(), PathError::Empty);
        assert!(matches!(
            PathExpr::parse("a..b"),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(
            PathExpr::parse("a[0]"),
            Err(PathError::MalformedFilter(_))
        ));
        assert!(matches!(
            PathExpr::parse(r#"a[?(@.x=="1")].b[?(@.y=="2")]"#),
            Err(PathError::MultipleFilters(_))
        ));
        assert_eq!(resolve(&json!({"a": 1}), "a[0]"), None);
    }

    #[test]
    fn test_equivalent_paths() {
        let left: PathExpr = ".status.phase".parse().expect("parse");
        let right: PathExpr = "status.phase".parse().expect("parse");
        assert_eq!(left, right);
        assert_eq!(left.to_string(), ".status.phase");
        assert!(!left.has_filter());
    }

    #[test]
    fn test_leaf_round_trip() {
        use rand::distributions::Alphanumeric;
        use rand::{thread_rng, Rng};

        for depth in 1..6 {
            let keys: Vec<String> = (0..depth)
                .map(|_| thread_rng().sample_iter(&Alphanumeric).take(6).map(char::from).collect())
                .collect();
            let leaf = json!(depth * 7);
            let doc = keys.iter().rev().fold(leaf.clone(), |inner, key| {
                let mut fields = serde_json::Map::new();
                fields.insert(key.clone(), inner);
                serde_json::Value::Object(fields)
            });
            assert_eq!(resolve(&doc, &keys.join(".")), Some(&leaf));
        }
    }
}
