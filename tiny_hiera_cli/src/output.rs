//! Rendering resolved data for standard output.

use std::io::{self, Write};

use serde_json::Value;
use tiny_hiera::Mapping;
use tiny_hiera::expr::render;
use tiny_hiera::query::query;

use crate::error::{CliError, Result};

/// Pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CliError::Json`] when serialisation fails.
pub fn render_json(data: &Mapping) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// YAML without the trailing newline.
///
/// # Errors
///
/// Returns [`CliError::Yaml`] when serialisation fails.
pub fn render_yaml(data: &Mapping) -> Result<String> {
    let yaml = serde_yaml::to_string(data)?;
    Ok(yaml.trim_end().to_owned())
}

/// One `PREFIX_KEY=value` line per top-level key, sorted by key.
///
/// Strings are written raw, integers in decimal, floats with six decimal
/// places and anything else as compact JSON.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera_cli::output::render_env;
///
/// let data = json!({"port": 80, "name": "web", "ratio": 0.5, "tags": ["a"]});
/// let rendered = render_env("HIERA", data.as_object().expect("object"));
/// assert_eq!(
///     rendered,
///     "HIERA_NAME=web\nHIERA_PORT=80\nHIERA_RATIO=0.500000\nHIERA_TAGS=[\"a\"]"
/// );
/// ```
#[must_use]
pub fn render_env(prefix: &str, data: &Mapping) -> String {
    let mut lines: Vec<String> = data
        .iter()
        .map(|(key, value)| format!("{prefix}_{}={}", key.to_uppercase(), env_value(value)))
        .collect();
    lines.sort();
    lines.join("\n")
}

fn env_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) if number.is_f64() => {
            number.as_f64().map_or_else(|| number.to_string(), |float| format!("{float:.6}"))
        }
        Value::Number(number) => number.to_string(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// The string form of `path` in `data`; empty when nothing matches.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera_cli::output::render_query;
///
/// let data = json!({"web": {"listen_port": 80}});
/// assert_eq!(render_query(&data, "web.listen_port"), "80");
/// assert_eq!(render_query(&data, "web.missing"), "");
/// ```
#[must_use]
pub fn render_query(data: &Value, path: &str) -> String {
    query(data, path).map_or_else(String::new, |found| render(&found))
}

/// Write `text` followed by a newline to standard output.
///
/// # Errors
///
/// Returns [`CliError::Output`] when standard output cannot be written.
pub fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").map_err(CliError::Output)
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{render_env, render_json, render_query, render_yaml};
    use tiny_hiera::Mapping;

    fn sample() -> Result<Mapping> {
        json!({
            "log_level": "TRACE",
            "packages": ["ca-certificates", "nginx"],
            "web": {"listen_port": 80, "tls": true},
        })
        .as_object()
        .cloned()
        .ok_or_else(|| anyhow!("sample must be an object"))
    }

    #[rstest]
    fn json_is_pretty_printed() -> Result<()> {
        let rendered = render_json(&sample()?)?;
        ensure!(rendered.contains("\n  \"log_level\": \"TRACE\""), "{rendered}");
        let reparsed: Value = serde_json::from_str(&rendered)?;
        ensure!(reparsed == Value::Object(sample()?));
        Ok(())
    }

    #[rstest]
    fn yaml_round_trips_through_the_decoder() -> Result<()> {
        let rendered = render_yaml(&sample()?)?;
        ensure!(!rendered.ends_with('\n'));
        ensure!(rendered.contains("log_level: TRACE"), "{rendered}");
        Ok(())
    }

    #[rstest]
    fn env_lines_follow_value_types() -> Result<()> {
        let rendered = render_env("APP", &sample()?);
        let expected = [
            "APP_LOG_LEVEL=TRACE",
            r#"APP_PACKAGES=["ca-certificates","nginx"]"#,
            r#"APP_WEB={"listen_port":80,"tls":true}"#,
        ]
        .join("\n");
        ensure!(rendered == expected, "{rendered}");
        Ok(())
    }

    #[rstest]
    #[case("web.listen_port", "80")]
    #[case("packages.1", "nginx")]
    #[case("packages.#", "2")]
    #[case("web", r#"{"listen_port":80,"tls":true}"#)]
    #[case("missing", "")]
    fn queries_render_their_string_form(#[case] path: &str, #[case] expected: &str) -> Result<()> {
        let data = Value::Object(sample()?);
        ensure!(render_query(&data, path) == expected);
        Ok(())
    }
}
