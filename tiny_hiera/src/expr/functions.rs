//! Functions callable from placeholder expressions.
//!
//! `lookup` is the only function that reaches outside the expression: it
//! reads the frozen fact snapshot. Everything else is a pure helper over its
//! arguments.

use serde_json::Value;

use super::value::{Num, float_value, render, type_name};
use crate::query::FactSnapshot;

/// Call the function `name` with already evaluated `args`.
///
/// # Errors
///
/// Returns a message for unknown functions, wrong argument counts, or
/// arguments of the wrong type.
pub(super) fn call(name: &str, args: &[Value], facts: &FactSnapshot) -> Result<Value, String> {
    match name {
        "lookup" => lookup(args, facts),
        "lower" => map_string(name, args, str::to_lowercase),
        "upper" => map_string(name, args, str::to_uppercase),
        "trim" => trim(args),
        "trimPrefix" => {
            arity(name, args, 2, 2)?;
            let text = string_arg(name, args, 0)?;
            let prefix = string_arg(name, args, 1)?;
            Ok(Value::from(text.strip_prefix(prefix).unwrap_or(text)))
        }
        "trimSuffix" => {
            arity(name, args, 2, 2)?;
            let text = string_arg(name, args, 0)?;
            let suffix = string_arg(name, args, 1)?;
            Ok(Value::from(text.strip_suffix(suffix).unwrap_or(text)))
        }
        "hasPrefix" => string_test(name, args, |text, prefix| text.starts_with(prefix)),
        "hasSuffix" => string_test(name, args, |text, suffix| text.ends_with(suffix)),
        "contains" => string_test(name, args, |text, needle| text.contains(needle)),
        "replace" => {
            arity(name, args, 3, 3)?;
            let text = string_arg(name, args, 0)?;
            let from = string_arg(name, args, 1)?;
            let to = string_arg(name, args, 2)?;
            Ok(Value::from(text.replace(from, to)))
        }
        "split" => {
            arity(name, args, 2, 2)?;
            let text = string_arg(name, args, 0)?;
            let separator = string_arg(name, args, 1)?;
            Ok(Value::Array(
                text.split(separator).map(Value::from).collect(),
            ))
        }
        "join" => join(args),
        "len" => len(args),
        "int" => int(args),
        "float" => float(args),
        "string" => {
            arity(name, args, 1, 1)?;
            Ok(Value::String(render(first(args))))
        }
        "toJSON" => {
            arity(name, args, 1, 1)?;
            Ok(Value::String(first(args).to_string()))
        }
        "default" => {
            arity(name, args, 2, 2)?;
            let value = first(args);
            let missing = value.is_null() || value.as_str().is_some_and(str::is_empty);
            let chosen = if missing { second(args) } else { value };
            Ok(chosen.clone())
        }
        _ => Err(format!("unknown function '{name}'")),
    }
}

/// Resolve a fact path, falling back to the default or an empty string.
fn lookup(args: &[Value], facts: &FactSnapshot) -> Result<Value, String> {
    arity("lookup", args, 1, 2)?;
    let path = string_arg("lookup", args, 0)?;
    Ok(match facts.lookup(path) {
        Some(found) => found.into_owned(),
        None => args
            .get(1)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
    })
}

fn trim(args: &[Value]) -> Result<Value, String> {
    arity("trim", args, 1, 2)?;
    let text = string_arg("trim", args, 0)?;
    let trimmed = if args.len() == 2 {
        let cutset = string_arg("trim", args, 1)?;
        text.trim_matches(|c: char| cutset.contains(c))
    } else {
        text.trim()
    };
    Ok(Value::from(trimmed))
}

fn join(args: &[Value]) -> Result<Value, String> {
    arity("join", args, 1, 2)?;
    let Value::Array(items) = first(args) else {
        return Err(format!(
            "join() expects an array, got {}",
            type_name(first(args))
        ));
    };
    let separator = if args.len() == 2 {
        string_arg("join", args, 1)?
    } else {
        ""
    };
    let parts: Vec<String> = items.iter().map(render).collect();
    Ok(Value::String(parts.join(separator)))
}

fn len(args: &[Value]) -> Result<Value, String> {
    arity("len", args, 1, 1)?;
    match first(args) {
        Value::String(text) => Ok(Value::from(text.chars().count())),
        Value::Array(items) => Ok(Value::from(items.len())),
        Value::Object(map) => Ok(Value::from(map.len())),
        other => Err(format!("len() is not defined for {}", type_name(other))),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "int() truncates floats toward zero after a range check"
)]
fn truncate(float: f64) -> Result<i64, String> {
    let truncated = float.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Ok(truncated as i64)
    } else {
        Err(format!("{float} does not fit an integer"))
    }
}

fn int(args: &[Value]) -> Result<Value, String> {
    arity("int", args, 1, 1)?;
    let value = first(args);
    if let Some(num) = Num::of(value) {
        return match num {
            Num::Int(int) => Ok(Value::from(int)),
            Num::Float(float) => truncate(float).map(Value::from),
        };
    }
    let Value::String(raw) = value else {
        return Err(format!("int() cannot convert {}", type_name(value)));
    };
    let text = raw.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Ok(Value::from(int));
    }
    text.parse::<f64>()
        .map_err(|_| format!("int() cannot convert '{text}'"))
        .and_then(truncate)
        .map(Value::from)
}

fn float(args: &[Value]) -> Result<Value, String> {
    arity("float", args, 1, 1)?;
    let value = first(args);
    if let Some(num) = Num::of(value) {
        return float_value(num.as_f64());
    }
    let Value::String(raw) = value else {
        return Err(format!("float() cannot convert {}", type_name(value)));
    };
    let text = raw.trim();
    text.parse::<f64>()
        .map_err(|_| format!("float() cannot convert '{text}'"))
        .and_then(float_value)
}

fn map_string(name: &str, args: &[Value], map: fn(&str) -> String) -> Result<Value, String> {
    arity(name, args, 1, 1)?;
    Ok(Value::String(map(string_arg(name, args, 0)?)))
}

fn string_test(
    name: &str,
    args: &[Value],
    test: fn(&str, &str) -> bool,
) -> Result<Value, String> {
    arity(name, args, 2, 2)?;
    Ok(Value::Bool(test(
        string_arg(name, args, 0)?,
        string_arg(name, args, 1)?,
    )))
}

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), String> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    let expected = if min == max {
        min.to_string()
    } else {
        format!("{min} to {max}")
    };
    Err(format!(
        "{name}() expects {expected} argument(s), got {}",
        args.len()
    ))
}

fn string_arg<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v str, String> {
    match args.get(index) {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(format!(
            "{name}() expects a string for argument {}, got {}",
            index + 1,
            type_name(other)
        )),
        None => Err(format!("{name}() is missing argument {}", index + 1)),
    }
}

/// First argument; callers have already checked arity.
fn first(args: &[Value]) -> &Value {
    args.first().unwrap_or(&Value::Null)
}

/// Second argument; callers have already checked arity.
fn second(args: &[Value]) -> &Value {
    args.get(1).unwrap_or(&Value::Null)
}
