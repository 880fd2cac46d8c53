//! Dynamic value helpers shared by the evaluator and the built-ins.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Numeric view of a value, keeping the integer/float distinction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(super) fn of(value: &Value) -> Option<Self> {
        let number = value.as_number()?;
        number
            .as_i64()
            .map(Self::Int)
            .or_else(|| number.as_f64().map(Self::Float))
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed integer/float arithmetic widens to f64 by definition"
    )]
    pub(super) fn as_f64(self) -> f64 {
        match self {
            Self::Int(int) => int as f64,
            Self::Float(float) => float,
        }
    }
}

/// Wrap a float result, rejecting NaN and infinities.
pub(super) fn float_value(float: f64) -> Result<Value, String> {
    Number::from_f64(float)
        .map(Value::Number)
        .ok_or_else(|| format!("non-finite numeric result {float}"))
}

/// Name of the value's type, as reported in diagnostics.
pub(super) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// Structural equality where `1 == 1.0`.
pub(super) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64().total_cmp(&b.as_f64()) == Ordering::Equal,
            _ => left == right,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

/// Order two numbers or two strings.
pub(super) fn compare(left: &Value, right: &Value) -> Result<Ordering, String> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
            (Some(a), Some(b)) => Ok(a.as_f64().total_cmp(&b.as_f64())),
            _ => Err(format!(
                "cannot compare {} with {}",
                type_name(left),
                type_name(right)
            )),
        },
    }
}

/// Render a value as text the way placeholders substitute it.
///
/// Strings are inserted verbatim, `null` renders as nothing, numbers and
/// booleans use their natural form (whole floats drop the fraction) and
/// sequences or mappings render as compact JSON. Floats whose decimal
/// exponent is below -4 or at least 6 switch to exponent form with a signed,
/// two-digit exponent, so `1e21` renders as `1e+21` and `1e-7` as `1e-07`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera::expr::render;
///
/// assert_eq!(render(&json!("web")), "web");
/// assert_eq!(render(&json!(2.0)), "2");
/// assert_eq!(render(&json!(1.5e-7)), "1.5e-07");
/// assert_eq!(render(&json!({"key": "other"})), r#"{"key":"other"}"#);
/// assert_eq!(render(&serde_json::Value::Null), "");
/// ```
#[must_use]
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format_float(float),
            _ => number.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Shortest round-tripping digits, in exponent form outside `1e-4..1e6`.
fn format_float(float: f64) -> String {
    let scientific = format!("{float:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return float.to_string();
    };
    match exponent.parse::<i32>() {
        Ok(power) if !(-4..6).contains(&power) => {
            let sign = if power < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", power.unsigned_abs())
        }
        _ => float.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::json;

    use super::render;

    #[rstest]
    #[case(2.0, "2")]
    #[case(0.5, "0.5")]
    #[case(-2.5, "-2.5")]
    #[case(0.0001, "0.0001")]
    #[case(123_456.0, "123456")]
    #[case(1e6, "1e+06")]
    #[case(1_234_567.0, "1.234567e+06")]
    #[case(1e21, "1e+21")]
    #[case(1e-7, "1e-07")]
    #[case(0.000_012_5, "1.25e-05")]
    #[case(-3e100, "-3e+100")]
    fn renders_floats_in_shortest_form(#[case] float: f64, #[case] expected: &str) -> Result<()> {
        let rendered = render(&json!(float));
        ensure!(rendered == expected, "expected {expected}, got {rendered}");
        Ok(())
    }

    #[rstest]
    #[case(json!(1_000_000), "1000000")]
    #[case(json!(-7), "-7")]
    fn integers_never_use_exponents(#[case] value: serde_json::Value, #[case] expected: &str) -> Result<()> {
        ensure!(render(&value) == expected);
        Ok(())
    }
}
