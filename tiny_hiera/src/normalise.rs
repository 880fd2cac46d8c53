//! Canonicalisation of numeric leaves in decoded documents.
//!
//! YAML and JSON decoders disagree on how they represent the same logical
//! number: `10`, `10.0` and a large unsigned literal can all surface with
//! different storage. Running [`normalise_numbers`] once over a decoded tree
//! rewrites every numeric leaf that fits the native signed-integer range into
//! a single `i64` representation, so later equality and merge comparisons see
//! one shape per value.

use serde_json::{Map, Number, Value};

/// Largest value of the platform's native signed integer.
pub const NATIVE_INT_MAX: i64 = isize::MAX as i64;

/// Smallest value of the platform's native signed integer.
pub const NATIVE_INT_MIN: i64 = isize::MIN as i64;

/// Return a copy of `value` with numeric leaves canonicalised.
///
/// Integers of any width and whole-valued floats become `i64` integers when
/// they lie inside [`NATIVE_INT_MIN`]..=[`NATIVE_INT_MAX`]. Out-of-range
/// integers and fractional or non-finite floats are returned unchanged.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera::normalise::normalise_numbers;
///
/// let normalised = normalise_numbers(&json!({"port": 8080.0, "ratio": 0.5}));
/// assert_eq!(normalised, json!({"port": 8080, "ratio": 0.5}));
/// assert!(normalised["port"].is_i64());
/// ```
#[must_use]
pub fn normalise_numbers(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| (key.clone(), normalise_numbers(val)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(normalise_numbers).collect()),
        Value::Number(number) => canonical_number(number).map_or_else(|| value.clone(), Value::from),
        Value::Null | Value::Bool(_) | Value::String(_) => value.clone(),
    }
}

/// Returns the canonical integer for `number`, if it has one.
fn canonical_number(number: &Number) -> Option<i64> {
    if let Some(int) = number.as_i64() {
        return (NATIVE_INT_MIN..=NATIVE_INT_MAX).contains(&int).then_some(int);
    }
    if number.is_u64() {
        // Only reached for values above `i64::MAX`.
        return None;
    }
    number.as_f64().and_then(whole_float)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "wholeness and range are checked before the conversion"
)]
fn whole_float(float: f64) -> Option<i64> {
    let lower = NATIVE_INT_MIN as f64;
    let upper = NATIVE_INT_MAX as f64;
    // `upper` rounds up to 2^63, which is itself out of range.
    let in_range = float >= lower && float < upper;
    (float.is_finite() && float.trunc() == float && in_range).then(|| float as i64)
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{NATIVE_INT_MAX, normalise_numbers};

    #[rstest]
    fn coerces_compatible_numbers_into_integers() -> Result<()> {
        let normalised = normalise_numbers(&json!({
            "float": 10.0,
            "int": 20,
            "unsigned": 30_u64,
            "in_bounds": [5.0],
        }));
        ensure!(
            normalised == json!({"float": 10, "int": 20, "unsigned": 30, "in_bounds": [5]}),
            "unexpected normalisation: {normalised}"
        );
        ensure!(normalised["float"].is_i64(), "float was not canonicalised");
        ensure!(normalised["in_bounds"][0].is_i64(), "nested float was not canonicalised");
        Ok(())
    }

    #[rstest]
    #[case::fraction(json!(2.5))]
    #[case::beyond_native_range(json!(u64::MAX))]
    #[case::huge_float(json!(1.0e300))]
    #[case::string(json!("10"))]
    #[case::boolean(json!(true))]
    #[case::null(Value::Null)]
    fn leaves_other_values_unchanged(#[case] value: Value) -> Result<()> {
        let normalised = normalise_numbers(&value);
        ensure!(normalised == value, "expected {value}, got {normalised}");
        Ok(())
    }

    #[rstest]
    fn keeps_native_bounds_as_integers() -> Result<()> {
        let normalised = normalise_numbers(&json!(NATIVE_INT_MAX));
        ensure!(normalised.as_i64() == Some(NATIVE_INT_MAX));
        let negative = normalise_numbers(&json!(-42.0));
        ensure!(negative.as_i64() == Some(-42), "got {negative}");
        Ok(())
    }

    #[rstest]
    fn fractional_floats_stay_floats() -> Result<()> {
        let normalised = normalise_numbers(&json!({"ratio": 0.25}));
        ensure!(normalised["ratio"].is_f64(), "ratio lost its float type");
        Ok(())
    }
}
