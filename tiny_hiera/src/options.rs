//! Caller-tunable resolution settings.

use serde::Deserialize;

/// Name of the base data section when none is configured.
pub const DEFAULT_DATA_KEY: &str = "data";

/// Options controlling a resolution call.
///
/// # Examples
///
/// ```
/// use tiny_hiera::ResolveOptions;
///
/// assert_eq!(ResolveOptions::default().data_key, "data");
/// let options = ResolveOptions::default().with_data_key("defaults");
/// assert_eq!(options.data_key, "defaults");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveOptions {
    /// Top-level section holding the base data.
    pub data_key: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            data_key: DEFAULT_DATA_KEY.to_owned(),
        }
    }
}

impl ResolveOptions {
    /// Use `key` as the base data section.
    #[must_use]
    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::json;

    use super::ResolveOptions;

    #[rstest]
    fn deserialises_with_defaults() -> Result<()> {
        let empty: ResolveOptions = serde_json::from_value(json!({}))?;
        ensure!(empty == ResolveOptions::default());
        let custom: ResolveOptions = serde_json::from_value(json!({"data_key": "base"}))?;
        ensure!(custom.data_key == "base");
        Ok(())
    }

    #[rstest]
    fn rejects_unknown_fields() {
        let outcome = serde_json::from_value::<ResolveOptions>(json!({"datakey": "x"}));
        assert!(outcome.is_err());
    }
}
