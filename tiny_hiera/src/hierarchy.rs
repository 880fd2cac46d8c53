//! The `hierarchy` section of a document.

use std::fmt;

use serde_json::Value;

use crate::HieraResult;
use crate::error::HieraError;
use crate::isolate::{Mapping, section};

/// Ordered override key templates plus the merge selector.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hierarchy {
    /// Key templates, evaluated in order.
    pub order: Vec<String>,
    /// Merge selector as written in the document; empty when absent or not
    /// a string.
    pub merge: String,
}

/// Strategy used to fold override fragments into the base data.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MergeMode {
    /// Apply the first matching fragment shallowly and stop.
    #[default]
    First,
    /// Fold every matching fragment recursively.
    Deep,
}

impl MergeMode {
    /// Lower-case selector naming this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Hierarchy {
    /// Extract the hierarchy from a document root.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::Schema`] when the section is missing or not a
    /// mapping, when `order` is not a sequence, or when `order` holds
    /// anything other than strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tiny_hiera::hierarchy::{Hierarchy, MergeMode};
    ///
    /// let root = json!({"hierarchy": {"order": ["env:{{ lookup('env') }}"], "merge": "Deep"}});
    /// let hierarchy = Hierarchy::parse(root.as_object().expect("object"))?;
    /// assert_eq!(hierarchy.order.len(), 1);
    /// assert_eq!(hierarchy.merge_mode()?, MergeMode::Deep);
    /// # Ok::<(), std::sync::Arc<tiny_hiera::HieraError>>(())
    /// ```
    pub fn parse(root: &Mapping) -> HieraResult<Self> {
        let raw = section(root, "hierarchy")
            .ok_or_else(|| HieraError::schema_arc("hierarchy section is required"))?;
        let entries = raw
            .get("order")
            .and_then(Value::as_array)
            .ok_or_else(|| HieraError::schema_arc("hierarchy.order must be a list"))?;
        let order = entries
            .iter()
            .map(|entry| {
                entry.as_str().map(str::to_owned).ok_or_else(|| {
                    HieraError::schema_arc("hierarchy.order must contain only strings")
                })
            })
            .collect::<HieraResult<Vec<_>>>()?;
        let merge = raw
            .get("merge")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Ok(Self { order, merge })
    }

    /// Interpret the merge selector case-insensitively; empty means `first`.
    ///
    /// # Errors
    ///
    /// Returns [`HieraError::MergeMode`] for any other selector.
    pub fn merge_mode(&self) -> HieraResult<MergeMode> {
        match self.merge.to_lowercase().as_str() {
            "" | "first" => Ok(MergeMode::First),
            "deep" => Ok(MergeMode::Deep),
            other => Err(HieraError::merge_mode(other).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{Hierarchy, MergeMode};
    use crate::error::HieraError;

    fn parse(root: &Value) -> Result<Result<Hierarchy, String>> {
        let map = root
            .as_object()
            .ok_or_else(|| anyhow!("fixture must be an object"))?;
        Ok(Hierarchy::parse(map).map_err(|err| err.to_string()))
    }

    #[rstest]
    fn parses_order_and_merge() -> Result<()> {
        let root = json!({"hierarchy": {"order": ["a", "b"], "merge": "deep"}});
        let hierarchy = parse(&root)?.map_err(anyhow::Error::msg)?;
        ensure!(hierarchy.order == ["a", "b"]);
        ensure!(hierarchy.merge == "deep");
        Ok(())
    }

    #[rstest]
    #[case::missing(json!({"data": {}}), "hierarchy section is required")]
    #[case::not_a_map(json!({"hierarchy": ["a"]}), "hierarchy section is required")]
    #[case::order_missing(json!({"hierarchy": {}}), "hierarchy.order must be a list")]
    #[case::order_scalar(json!({"hierarchy": {"order": "a"}}), "hierarchy.order must be a list")]
    #[case::order_mixed(
        json!({"hierarchy": {"order": ["a", 1]}}),
        "hierarchy.order must contain only strings"
    )]
    fn schema_errors(#[case] root: Value, #[case] expected: &str) -> Result<()> {
        let outcome = parse(&root)?;
        ensure!(
            outcome.as_ref().err().map(String::as_str) == Some(expected),
            "unexpected outcome {outcome:?}"
        );
        Ok(())
    }

    #[rstest]
    #[case("", MergeMode::First)]
    #[case("first", MergeMode::First)]
    #[case("FIRST", MergeMode::First)]
    #[case("deep", MergeMode::Deep)]
    #[case("Deep", MergeMode::Deep)]
    fn merge_modes(#[case] merge: &str, #[case] expected: MergeMode) -> Result<()> {
        let hierarchy = Hierarchy {
            order: Vec::new(),
            merge: merge.to_owned(),
        };
        let mode = hierarchy.merge_mode().map_err(|err| anyhow!("{err}"))?;
        ensure!(mode == expected);
        Ok(())
    }

    #[rstest]
    fn non_string_merge_defaults_to_first() -> Result<()> {
        let root = json!({"hierarchy": {"order": [], "merge": 3}});
        let hierarchy = parse(&root)?.map_err(anyhow::Error::msg)?;
        ensure!(hierarchy.merge_mode().ok() == Some(MergeMode::First));
        Ok(())
    }

    #[rstest]
    fn unknown_merge_mode_is_rejected() -> Result<()> {
        let hierarchy = Hierarchy {
            order: Vec::new(),
            merge: "Wide".to_owned(),
        };
        let Err(err) = hierarchy.merge_mode() else {
            return Err(anyhow!("merge mode unexpectedly accepted"));
        };
        ensure!(matches!(err.as_ref(), HieraError::MergeMode { mode } if mode == "wide"));
        ensure!(err.to_string() == "unsupported merge mode: wide");
        Ok(())
    }
}
