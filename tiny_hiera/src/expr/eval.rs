//! Tree-walking evaluation of compiled expressions.

use std::cmp::Ordering;

use serde_json::Value;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::functions;
use super::value::{Num, compare, float_value, type_name, values_equal};
use crate::query::FactSnapshot;

/// Evaluates expressions against one fact snapshot.
pub(super) struct Evaluator<'a> {
    facts: &'a FactSnapshot,
}

impl<'a> Evaluator<'a> {
    pub(super) const fn new(facts: &'a FactSnapshot) -> Self {
        Self { facts }
    }

    pub(super) fn eval(&self, expr: &Expr) -> Result<Value, String> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Array(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Name(name) => Err(format!(
                "unknown name '{name}'; facts are only reachable through lookup()"
            )),
            Expr::Unary { op, operand } => unary(*op, self.eval(operand)?),
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if truth(&self.eval(condition)?, "?:")? {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Member { target, key } => member(self.eval(target)?, key),
            Expr::Index { target, index } => index_into(self.eval(target)?, &self.eval(index)?),
            Expr::Call { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                functions::call(name, &values, self.facts)
            }
        }
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, String> {
        let lhs = self.eval(left)?;
        match op {
            BinaryOp::And => {
                if !truth(&lhs, op.symbol())? {
                    return Ok(Value::Bool(false));
                }
                truth(&self.eval(right)?, op.symbol()).map(Value::Bool)
            }
            BinaryOp::Or => {
                if truth(&lhs, op.symbol())? {
                    return Ok(Value::Bool(true));
                }
                truth(&self.eval(right)?, op.symbol()).map(Value::Bool)
            }
            BinaryOp::Coalesce => {
                if lhs.is_null() {
                    self.eval(right)
                } else {
                    Ok(lhs)
                }
            }
            _ => apply(op, lhs, self.eval(right)?),
        }
    }
}

fn truth(value: &Value, operator: &str) -> Result<bool, String> {
    value.as_bool().ok_or_else(|| {
        format!(
            "operator {operator} expects a bool, got {}",
            type_name(value)
        )
    })
}

#[expect(clippy::float_arithmetic, reason = "negation of float operands")]
fn unary(op: UnaryOp, value: Value) -> Result<Value, String> {
    match op {
        UnaryOp::Not => truth(&value, "!").map(|flag| Value::Bool(!flag)),
        UnaryOp::Negate => match Num::of(&value) {
            Some(Num::Int(int)) => int
                .checked_neg()
                .map(Value::from)
                .ok_or_else(|| "integer overflow".to_owned()),
            Some(Num::Float(float)) => float_value(-float),
            None => Err(format!("cannot negate {}", type_name(&value))),
        },
    }
}

fn apply(op: BinaryOp, left: Value, right: Value) -> Result<Value, String> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::Lt => compare(&left, &right).map(|ord| Value::Bool(ord == Ordering::Less)),
        BinaryOp::Le => compare(&left, &right).map(|ord| Value::Bool(ord != Ordering::Greater)),
        BinaryOp::Gt => compare(&left, &right).map(|ord| Value::Bool(ord == Ordering::Greater)),
        BinaryOp::Ge => compare(&left, &right).map(|ord| Value::Bool(ord != Ordering::Less)),
        BinaryOp::In => contains(&right, &left),
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, &left, &right)
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce => {
            Err(format!("operator {} is not a value operator", op.symbol()))
        }
    }
}

fn contains(haystack: &Value, needle: &Value) -> Result<Value, String> {
    match (haystack, needle) {
        (Value::Array(items), _) => Ok(Value::Bool(
            items.iter().any(|item| values_equal(item, needle)),
        )),
        (Value::Object(map), Value::String(key)) => Ok(Value::Bool(map.contains_key(key))),
        (Value::String(text), Value::String(part)) => Ok(Value::Bool(text.contains(part.as_str()))),
        _ => Err(format!(
            "operator in is not defined for {} in {}",
            type_name(needle),
            type_name(haystack)
        )),
    }
}

fn add(left: Value, right: Value) -> Result<Value, String> {
    match (left, right) {
        (Value::String(mut a), Value::String(b)) => {
            a.push_str(&b);
            Ok(Value::String(a))
        }
        (Value::Array(mut a), Value::Array(b)) => {
            a.extend(b);
            Ok(Value::Array(a))
        }
        (a, b) => arithmetic(BinaryOp::Add, &a, &b),
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "expressions support float arithmetic"
)]
fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, String> {
    let (Some(a), Some(b)) = (Num::of(left), Num::of(right)) else {
        return Err(format!(
            "operator {} is not defined for {} and {}",
            op.symbol(),
            type_name(left),
            type_name(right)
        ));
    };
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b.as_f64() == 0.0 {
        return Err("division by zero".to_owned());
    }
    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        let result = match op {
            BinaryOp::Add => x.checked_add(y),
            BinaryOp::Sub => x.checked_sub(y),
            BinaryOp::Mul => x.checked_mul(y),
            BinaryOp::Rem => x.checked_rem(y),
            // Division always yields a float.
            _ => return float_value(a.as_f64() / b.as_f64()),
        };
        return result
            .map(Value::from)
            .ok_or_else(|| "integer overflow".to_owned());
    }
    let (x, y) = (a.as_f64(), b.as_f64());
    float_value(match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
        _ => x % y,
    })
}

fn member(target: Value, key: &str) -> Result<Value, String> {
    match target {
        Value::Object(mut map) => Ok(map.remove(key).unwrap_or(Value::Null)),
        other => Err(format!(
            "cannot access field '{key}' on {}",
            type_name(&other)
        )),
    }
}

fn index_into(target: Value, index: &Value) -> Result<Value, String> {
    match (target, index) {
        (Value::Array(mut items), _) => {
            let Some(Num::Int(position)) = Num::of(index) else {
                return Err(format!(
                    "array index must be an int, got {}",
                    type_name(index)
                ));
            };
            let len = items.len();
            let resolved = if position < 0 {
                usize::try_from(position.unsigned_abs())
                    .ok()
                    .and_then(|back| len.checked_sub(back))
            } else {
                usize::try_from(position).ok()
            };
            match resolved {
                Some(slot) if slot < len => Ok(items.swap_remove(slot)),
                _ => Err(format!("index {position} out of range for array of length {len}")),
            }
        }
        (Value::Object(mut map), Value::String(key)) => Ok(map.remove(key).unwrap_or(Value::Null)),
        (other, _) => Err(format!(
            "cannot index {} with {}",
            type_name(&other),
            type_name(index)
        )),
    }
}
