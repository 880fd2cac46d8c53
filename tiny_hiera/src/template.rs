//! Expansion of `{{ expression }}` placeholders.
//!
//! Two modes exist. Typed mode keeps the evaluated value when a string is
//! exactly one placeholder, so `"{{ lookup('port') }}"` yields an integer.
//! String mode substitutes every placeholder with its rendered text and
//! reports whether any of them produced a meaningful value.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::HieraResult;
use crate::expr::{evaluate, render};
use crate::isolate::Mapping;
use crate::query::FactSnapshot;

#[expect(clippy::expect_used, reason = "the pattern is a literal known to compile")]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("placeholder pattern compiles")
});

/// Result of expanding a template in string mode.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Expansion {
    /// The template with every placeholder replaced by its rendered value.
    pub text: String,
    /// Whether the expansion selected something.
    ///
    /// True when at least one placeholder evaluated to a non-empty string or
    /// to any non-null, non-string value. A template without placeholders
    /// matches when it is non-empty.
    pub matched: bool,
}

/// Expand `template` in string mode.
///
/// # Errors
///
/// Returns [`crate::HieraError::Eval`] when a placeholder fails to compile
/// or evaluate.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera::query::FactSnapshot;
/// use tiny_hiera::template::expand_string;
///
/// let facts = json!({"role": "web"});
/// let snapshot = FactSnapshot::new(facts.as_object().expect("object"));
/// let hit = expand_string("role:{{ lookup('role') }}", &snapshot)?;
/// assert_eq!((hit.text.as_str(), hit.matched), ("role:web", true));
/// let miss = expand_string("env:{{ lookup('env') }}", &snapshot)?;
/// assert_eq!((miss.text.as_str(), miss.matched), ("env:", false));
/// # Ok::<(), std::sync::Arc<tiny_hiera::HieraError>>(())
/// ```
pub fn expand_string(template: &str, facts: &FactSnapshot) -> HieraResult<Expansion> {
    let mut text = String::with_capacity(template.len());
    let mut matched = false;
    let mut last = 0;
    let mut spans = 0_usize;
    for captures in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        spans += 1;
        let value = evaluate(inner(&captures), facts)?;
        matched |= selects(&value);
        text.push_str(template.get(last..whole.start()).unwrap_or_default());
        text.push_str(&render(&value));
        last = whole.end();
    }
    if spans == 0 {
        return Ok(Expansion {
            text: template.to_owned(),
            matched: !template.is_empty(),
        });
    }
    text.push_str(template.get(last..).unwrap_or_default());
    Ok(Expansion { text, matched })
}

/// Expand `template` in typed mode.
///
/// A template that is exactly one placeholder, ignoring surrounding
/// whitespace, yields the evaluated value unchanged. A template without
/// placeholders is returned as a string. Anything else falls back to
/// [`expand_string`].
///
/// # Errors
///
/// Returns [`crate::HieraError::Eval`] when a placeholder fails to compile
/// or evaluate.
pub fn expand_typed(template: &str, facts: &FactSnapshot) -> HieraResult<Value> {
    let mut spans = PLACEHOLDER.captures_iter(template);
    let Some(first) = spans.next() else {
        return Ok(Value::String(template.to_owned()));
    };
    let trimmed = template.trim();
    if spans.next().is_none() && trimmed.starts_with("{{") && trimmed.ends_with("}}") {
        return evaluate(inner(&first), facts);
    }
    expand_string(template, facts).map(|expansion| Value::String(expansion.text))
}

/// Expand every string leaf of `value` in typed mode.
///
/// Sequences and mappings are walked recursively; other scalars are returned
/// unchanged.
///
/// # Errors
///
/// Returns the first evaluation error encountered.
pub fn expand_value(value: Value, facts: &FactSnapshot) -> HieraResult<Value> {
    match value {
        Value::String(text) => expand_typed(&text, facts),
        Value::Array(items) => items
            .into_iter()
            .map(|item| expand_value(item, facts))
            .collect::<HieraResult<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => expand_mapping(map, facts).map(Value::Object),
        scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => Ok(scalar),
    }
}

/// Expand every value of `map` in typed mode; keys are left untouched.
///
/// # Errors
///
/// Returns the first evaluation error encountered.
pub fn expand_mapping(map: Mapping, facts: &FactSnapshot) -> HieraResult<Mapping> {
    map.into_iter()
        .map(|(key, value)| expand_value(value, facts).map(|expanded| (key, expanded)))
        .collect()
}

fn inner<'t>(captures: &Captures<'t>) -> &'t str {
    captures.get(1).map_or("", |group| group.as_str())
}

const fn selects(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => true,
    }
}
