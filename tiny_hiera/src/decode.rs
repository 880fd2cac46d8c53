//! Decoding of YAML and JSON documents into [`Value`] trees.

use serde_json::Value;
use serde_saphyr::Options;

use crate::error::{DocumentFormat, HieraError};
use crate::{HieraResult, HieraResultExt};

impl DocumentFormat {
    /// Guess the format of `bytes`.
    ///
    /// Input is JSON when its first non-whitespace character opens an object
    /// or an array; everything else is treated as YAML.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiny_hiera::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::detect(b"  {\"a\": 1}"), DocumentFormat::Json);
    /// assert_eq!(DocumentFormat::detect(b"a: 1"), DocumentFormat::Yaml);
    /// ```
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        if is_json(bytes) { Self::Json } else { Self::Yaml }
    }
}

/// Whether `bytes` look like a JSON document.
#[must_use]
pub fn is_json(bytes: &[u8]) -> bool {
    matches!(
        bytes.iter().find(|byte| !byte.is_ascii_whitespace()),
        Some(b'{' | b'[')
    )
}

/// Decode YAML 1.2 text; only `true` and `false` are booleans.
///
/// # Errors
///
/// Returns [`HieraError::Parse`] when the bytes are not valid UTF-8 YAML.
pub fn decode_yaml(bytes: &[u8]) -> HieraResult<Value> {
    let contents = std::str::from_utf8(bytes)
        .map_err(|err| HieraError::parse(DocumentFormat::Yaml, err))?;
    serde_saphyr::from_str_with_options(
        contents,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
    .into_hiera()
}

/// Decode JSON text.
///
/// # Errors
///
/// Returns [`HieraError::Parse`] when the bytes are not valid JSON.
pub fn decode_json(bytes: &[u8]) -> HieraResult<Value> {
    serde_json::from_slice(bytes).into_hiera()
}

/// Decode `bytes` in the given format.
///
/// # Errors
///
/// Returns [`HieraError::Parse`] when decoding fails.
pub fn decode(bytes: &[u8], format: DocumentFormat) -> HieraResult<Value> {
    match format {
        DocumentFormat::Yaml => decode_yaml(bytes),
        DocumentFormat::Json => decode_json(bytes),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{decode, decode_json, decode_yaml, is_json};
    use crate::error::{DocumentFormat, HieraError};

    #[rstest]
    #[case(b"{}", true)]
    #[case(b"\n\t [1]", true)]
    #[case(b"a: 1", false)]
    #[case(b"- a", false)]
    #[case(b"", false)]
    fn detects_json(#[case] input: &[u8], #[case] expected: bool) {
        assert_eq!(is_json(input), expected);
    }

    #[rstest]
    #[case(b"flag: yes\nother: true", json!({"flag": "yes", "other": true}))]
    #[case(b"port: 8080\nratio: 0.5", json!({"port": 8080, "ratio": 0.5}))]
    #[case(b"list:\n  - a\n  - b", json!({"list": ["a", "b"]}))]
    fn yaml_uses_strict_booleans(#[case] input: &[u8], #[case] expected: Value) -> Result<()> {
        let decoded = decode_yaml(input).map_err(|err| anyhow!("{err}"))?;
        ensure!(decoded == expected, "got {decoded}");
        Ok(())
    }

    #[rstest]
    fn json_decodes_by_format() -> Result<()> {
        let decoded =
            decode(br#"{"a": [1, 2]}"#, DocumentFormat::Json).map_err(|err| anyhow!("{err}"))?;
        ensure!(decoded == json!({"a": [1, 2]}));
        Ok(())
    }

    #[rstest]
    #[case::json(decode_json(b"{broken"), DocumentFormat::Json)]
    #[case::yaml(decode_yaml(b"a: [unclosed"), DocumentFormat::Yaml)]
    #[case::utf8(decode_yaml(&[0xff, 0xfe]), DocumentFormat::Yaml)]
    fn malformed_input_is_a_parse_error(
        #[case] outcome: crate::HieraResult<Value>,
        #[case] expected: DocumentFormat,
    ) -> Result<()> {
        let Err(err) = outcome else {
            return Err(anyhow!("malformed input decoded"));
        };
        ensure!(
            matches!(err.as_ref(), HieraError::Parse { format, .. } if *format == expected),
            "unexpected error {err}"
        );
        ensure!(err.to_string().starts_with(&format!("failed to parse {expected}")));
        Ok(())
    }
}
