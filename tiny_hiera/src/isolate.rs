//! Owned copies of document sections.
//!
//! The resolver only ever borrows the caller's document and facts. Whenever
//! a section is read for merging it is copied out through these helpers, so
//! the accumulator never shares nodes with caller-owned data.

use serde_json::{Map, Value};

/// String-keyed mapping node used throughout the resolver.
pub type Mapping = Map<String, Value>;

/// Return an owned deep copy of `value` when it is a mapping.
///
/// Sequences and scalars yield `None`; they are never valid sections.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera::isolate::owned_mapping;
///
/// let source = json!({"nested": {"value": 1}});
/// let mut copy = owned_mapping(Some(&source)).expect("mapping");
/// copy.insert("extra".into(), json!(true));
/// assert_eq!(source, json!({"nested": {"value": 1}}));
/// ```
#[must_use]
pub fn owned_mapping(value: Option<&Value>) -> Option<Mapping> {
    value.and_then(Value::as_object).cloned()
}

/// Return an owned deep copy of the mapping stored under `key` in `root`.
#[must_use]
pub fn owned_section(root: &Mapping, key: &str) -> Option<Mapping> {
    owned_mapping(root.get(key))
}

/// Borrow the mapping stored under `key` in `root` without copying it.
///
/// Used for read-only lookups, such as selecting an override fragment,
/// before a copy is taken with [`owned_mapping`].
#[must_use]
pub fn section<'a>(root: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    root.get(key).and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{owned_mapping, owned_section, section};

    #[rstest]
    fn copies_do_not_leak_mutations() -> Result<()> {
        let source = json!({
            "nested": {"value": 1},
            "list": [1, 2],
        });
        let mut cloned = owned_mapping(Some(&source)).ok_or_else(|| anyhow!("expected mapping"))?;
        if let Some(Value::Object(nested)) = cloned.get_mut("nested") {
            nested.insert("value".into(), json!(2));
        }
        if let Some(Value::Array(list)) = cloned.get_mut("list") {
            list.clear();
        }
        ensure!(
            source == json!({"nested": {"value": 1}, "list": [1, 2]}),
            "source mutated: {source}"
        );
        Ok(())
    }

    #[rstest]
    #[case(json!([1, 2]))]
    #[case(json!("text"))]
    #[case(Value::Null)]
    fn non_mappings_are_not_sections(#[case] value: Value) -> Result<()> {
        ensure!(owned_mapping(Some(&value)).is_none());
        Ok(())
    }

    #[rstest]
    fn sections_are_looked_up_by_key() -> Result<()> {
        let Value::Object(root) = json!({"data": {"a": 1}, "overrides": 3}) else {
            return Err(anyhow!("expected object"));
        };
        ensure!(owned_section(&root, "data").map(Value::Object) == Some(json!({"a": 1})));
        ensure!(section(&root, "overrides").is_none());
        ensure!(section(&root, "missing").is_none());
        Ok(())
    }
}
