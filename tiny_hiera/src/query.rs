//! Path queries over a frozen snapshot of the facts.
//!
//! Paths use dot-separated keys (`node.fqdn`), numeric segments or brackets
//! for sequence indices (`disks.0`, `disks[0]`, `labels["app.kubernetes.io"]`)
//! and `\` to escape a literal separator (`a\.b`). A `#` segment yields the
//! length of a sequence, or projects the rest of the path over every element
//! (`interfaces.#.name`). A path that cannot be parsed never matches.

use std::borrow::Cow;
use std::mem;
use std::str::Chars;
use std::sync::Arc;

use serde_json::Value;

use crate::isolate::Mapping;

/// A single step of a parsed path.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Key(String),
    Count,
}

/// Look up `path` in `root`.
///
/// Returns `None` when the path does not resolve to an existing value, which
/// is distinct from resolving to an explicit `null`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera::query::query;
///
/// let facts = json!({"node": {"fqdn": "web01.example.net"}, "disks": ["sda", "sdb"]});
/// assert_eq!(query(&facts, "node.fqdn").as_deref(), Some(&json!("web01.example.net")));
/// assert_eq!(query(&facts, "disks[1]").as_deref(), Some(&json!("sdb")));
/// assert_eq!(query(&facts, "disks.#").as_deref(), Some(&json!(2)));
/// assert!(query(&facts, "node.missing").is_none());
/// ```
#[must_use]
pub fn query<'a>(root: &'a Value, path: &str) -> Option<Cow<'a, Value>> {
    let segments = parse_path(path)?;
    walk(root, &segments)
}

fn walk<'a>(current: &'a Value, segments: &[Segment]) -> Option<Cow<'a, Value>> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Cow::Borrowed(current));
    };
    match first {
        Segment::Count => {
            let items = current.as_array()?;
            if rest.is_empty() {
                return Some(Cow::Owned(Value::from(items.len())));
            }
            let projected = items
                .iter()
                .filter_map(|item| walk(item, rest))
                .map(Cow::into_owned)
                .collect();
            Some(Cow::Owned(Value::Array(projected)))
        }
        Segment::Key(key) => {
            let next = match current {
                Value::Object(map) => map.get(key)?,
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => return None,
            };
            walk(next, rest)
        }
    }
}

fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut has_current = false;
    let mut escaped = false;
    let mut expect_segment = true;
    let mut after_bracket = false;
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if has_current {
                    segments.push(plain_segment(mem::take(&mut current), escaped));
                    has_current = false;
                    escaped = false;
                } else if expect_segment {
                    return None;
                }
                expect_segment = true;
                after_bracket = false;
            }
            '[' => {
                if has_current {
                    segments.push(plain_segment(mem::take(&mut current), escaped));
                    has_current = false;
                    escaped = false;
                } else if expect_segment && !segments.is_empty() {
                    return None;
                }
                segments.push(Segment::Key(read_bracket(&mut chars)?));
                expect_segment = false;
                after_bracket = true;
            }
            _ if after_bracket => return None,
            '\\' => {
                current.push(chars.next()?);
                has_current = true;
                escaped = true;
                expect_segment = false;
            }
            _ => {
                current.push(c);
                has_current = true;
                expect_segment = false;
            }
        }
    }

    if has_current {
        segments.push(plain_segment(current, escaped));
    } else if expect_segment {
        return None;
    }
    Some(segments)
}

fn plain_segment(raw: String, escaped: bool) -> Segment {
    if raw == "#" && !escaped {
        Segment::Count
    } else {
        Segment::Key(raw)
    }
}

/// Read the contents of a `[...]` selector; the opening bracket is consumed.
fn read_bracket(chars: &mut Chars<'_>) -> Option<String> {
    let mut inner = String::new();
    let mut quote = None;
    loop {
        let c = chars.next()?;
        match (quote, c) {
            (None, ']') => break,
            (None, '\'' | '"') if inner.trim().is_empty() => {
                inner.clear();
                quote = Some(c);
            }
            (Some(q), _) if c == q => {
                // A quoted key must be closed by the bracket straight away.
                return (chars.next()? == ']').then_some(inner);
            }
            (Some(_), '\\') => inner.push(chars.next()?),
            _ => inner.push(c),
        }
    }
    let trimmed = inner.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// A frozen copy of the facts shared by every lookup in one resolution.
///
/// The snapshot is taken once when a resolution starts; cloning it only
/// bumps a reference count, so every expression evaluated during that call
/// observes identical facts.
#[derive(Clone, Debug, Default)]
pub struct FactSnapshot {
    root: Arc<Value>,
}

impl FactSnapshot {
    /// Capture an owned snapshot of `facts`.
    #[must_use]
    pub fn new(facts: &Mapping) -> Self {
        Self {
            root: Arc::new(Value::Object(facts.clone())),
        }
    }

    /// Look up `path` in the snapshot; see [`query`].
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<Cow<'_, Value>> {
        query(&self.root, path)
    }
}
