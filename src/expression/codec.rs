//! Compact wire encoding for conditions.
//!
//! The page generator embeds every condition as a JSON value:
//!
//! ```text
//! true | false
//! ["eq", "<pref>", "<option>"]
//! ["ne", "<pref>", "<option>"]
//! ["and", <expr>, ...]
//! ["or", <expr>, ...]
//! ["not", <expr>]
//! ```

use serde_json::Value;
use thiserror::Error;

use super::ast::{CompareOp, Expr};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected a boolean or an array, got {0}")]
    UnexpectedValue(String),

    #[error("empty expression array")]
    MissingOperator,

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("operator {op} expects {expected} operands, got {got}")]
    Arity {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("operator {op} expects string operands")]
    ExpectedString { op: &'static str },
}

/// Convert an expression to its compact wire form
pub fn encode(expr: &Expr) -> Value {
    match expr {
        Expr::Const(value) => Value::Bool(*value),
        Expr::Compare { op, pref, option } => {
            let tag = match op {
                CompareOp::Eq => "eq",
                CompareOp::Ne => "ne",
            };
            Value::Array(vec![
                Value::from(tag),
                Value::from(pref.as_str()),
                Value::from(option.as_str()),
            ])
        }
        Expr::And(items) | Expr::Or(items) => {
            let tag = if matches!(expr, Expr::And(_)) { "and" } else { "or" };
            let mut encoded = Vec::with_capacity(items.len() + 1);
            encoded.push(Value::from(tag));
            encoded.extend(items.iter().map(encode));
            Value::Array(encoded)
        }
        Expr::Not(inner) => Value::Array(vec![Value::from("not"), encode(inner)]),
    }
}

/// Convert a compact wire value back into an expression
pub fn decode(value: &Value) -> Result<Expr, DecodeError> {
    let items = match value {
        Value::Bool(b) => return Ok(Expr::Const(*b)),
        Value::Array(items) => items,
        other => return Err(DecodeError::UnexpectedValue(other.to_string())),
    };

    let (head, operands) = items.split_first().ok_or(DecodeError::MissingOperator)?;
    let op = head
        .as_str()
        .ok_or_else(|| DecodeError::UnexpectedValue(head.to_string()))?;

    match op {
        "eq" | "ne" => {
            let (tag, compare) = if op == "eq" {
                ("eq", CompareOp::Eq)
            } else {
                ("ne", CompareOp::Ne)
            };
            if operands.len() != 2 {
                return Err(DecodeError::Arity {
                    op: tag,
                    expected: 2,
                    got: operands.len(),
                });
            }
            match (operands[0].as_str(), operands[1].as_str()) {
                (Some(pref), Some(option)) => Ok(Expr::Compare {
                    op: compare,
                    pref: pref.into(),
                    option: option.into(),
                }),
                _ => Err(DecodeError::ExpectedString { op: tag }),
            }
        }
        "and" => Ok(Expr::And(decode_all(operands)?)),
        "or" => Ok(Expr::Or(decode_all(operands)?)),
        "not" => {
            if operands.len() != 1 {
                return Err(DecodeError::Arity {
                    op: "not",
                    expected: 1,
                    got: operands.len(),
                });
            }
            Ok(Expr::negate(decode(&operands[0])?))
        }
        other => Err(DecodeError::UnknownOperator(other.to_string())),
    }
}

fn decode_all(values: &[Value]) -> Result<Vec<Expr>, DecodeError> {
    values.iter().map(decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_nested_tree() {
        let value = json!(["and", ["eq", "os", "linux"], ["not", ["ne", "pkg", "beta"]], true]);
        let expr = decode(&value).unwrap();
        assert_eq!(
            expr,
            Expr::And(vec![
                Expr::equals("os", "linux"),
                Expr::negate(Expr::not_equals("pkg", "beta")),
                Expr::Const(true),
            ])
        );
        assert_eq!(encode(&expr), value);
    }

    #[test]
    fn test_decode_rejects_unknown_operator() {
        let err = decode(&json!(["xor", true, false])).unwrap_err();
        assert_eq!(err, DecodeError::UnknownOperator("xor".to_string()));
    }

    #[test]
    fn test_decode_rejects_bad_arity() {
        let err = decode(&json!(["eq", "os"])).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Arity {
                op: "eq",
                expected: 2,
                got: 1
            }
        );

        let err = decode(&json!(["not"])).unwrap_err();
        assert!(matches!(err, DecodeError::Arity { op: "not", .. }));
    }

    #[test]
    fn test_decode_rejects_non_string_operands() {
        let err = decode(&json!(["ne", "os", 3])).unwrap_err();
        assert_eq!(err, DecodeError::ExpectedString { op: "ne" });
    }

    #[test]
    fn test_decode_rejects_scalars() {
        assert!(matches!(
            decode(&json!("os")),
            Err(DecodeError::UnexpectedValue(_))
        ));
        assert_eq!(decode(&json!([])), Err(DecodeError::MissingOperator));
    }
}
