//! Type coercion rules for rule expressions
//!
//! Every operator that compares, adds or tests values goes through these
//! functions, so loose equality and numeric conversion behave the same
//! regardless of which operator asked:
//!
//! | from      | to number                         | truthy            |
//! |-----------|-----------------------------------|-------------------|
//! | `null`    | `0`                               | no                |
//! | boolean   | `1` / `0`                         | itself            |
//! | number    | itself                            | non-zero          |
//! | string    | trimmed parse, `""` is `0`        | non-empty         |
//! | array     | parse of its `,`-joined rendering | non-empty         |
//! | object    | not a number                      | yes               |

use super::value::Value;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Parse a decimal from plain or scientific notation
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    // The decimal parser skips digit separators, numeric text has none
    if trimmed.contains('_') {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Type coercion utility for rule values
pub struct TypeCoercion;

impl TypeCoercion {
    /// `null`, `false`, `0`, `""` and `[]` are falsy, everything else is truthy
    pub fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Decimal(d) => !d.is_zero(),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Coerce a value to a number, `None` when it has no numeric reading
    pub fn to_number(value: &Value) -> Option<Decimal> {
        match value {
            Value::Null => Some(Decimal::ZERO),
            Value::Boolean(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
            Value::Integer(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            Value::String(s) if s.trim().is_empty() => Some(Decimal::ZERO),
            Value::String(s) => parse_decimal(s),
            Value::Array(_) => Self::to_number(&Value::String(Self::to_display_string(value))),
            Value::Object(_) => None,
        }
    }

    /// Render a value as text, as used by `cat` and substring tests
    pub fn to_display_string(value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Decimal(d) => d.normalize().to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    other => Self::to_display_string(other),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }

    /// Coercing equality used by `==` and `!=`
    pub fn loose_equals(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                Self::strict_equals(left, right)
            }
            (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => false,
            (Value::Array(_) | Value::Object(_), other) => {
                Self::loose_equals(&Value::String(Self::to_display_string(left)), other)
            }
            (other, Value::Array(_) | Value::Object(_)) => {
                Self::loose_equals(other, &Value::String(Self::to_display_string(right)))
            }
            _ => match (Self::to_number(left), Self::to_number(right)) {
                (Some(l), Some(r)) => l == r,
                _ => false,
            },
        }
    }

    /// Equality without coercion used by `===`, `!==` and `in`
    ///
    /// Integers and decimals are both numbers, so `1 === 1.0` holds.
    pub fn strict_equals(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (l, r) if l.is_number() && r.is_number() => Self::to_number(l) == Self::to_number(r),
            (Value::Array(l), Value::Array(r)) => {
                l.len() == r.len()
                    && l.iter().zip(r.iter()).all(|(a, b)| Self::strict_equals(a, b))
            }
            (Value::Object(l), Value::Object(r)) => {
                l.len() == r.len()
                    && l.iter().all(|(key, a)| {
                        r.get(key).is_some_and(|b| Self::strict_equals(a, b))
                    })
            }
            _ => left == right,
        }
    }

    /// Ordering for `<`, `<=`, `>` and `>=`
    ///
    /// Two strings compare lexically, anything else compares numerically.
    /// `None` means the values are unordered and every comparison is false.
    pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
        let left = Self::to_primitive(left);
        let right = Self::to_primitive(right);
        if let (Value::String(l), Value::String(r)) = (&left, &right) {
            return Some(l.cmp(r));
        }
        match (Self::to_number(&left), Self::to_number(&right)) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => None,
        }
    }

    fn to_primitive(value: &Value) -> Value {
        match value {
            Value::Array(_) | Value::Object(_) => {
                Value::String(Self::to_display_string(value))
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!([]), false)]
    #[case(json!("0"), true)]
    #[case(json!([0]), true)]
    #[case(json!({}), true)]
    #[case(json!(-1), true)]
    fn truthiness(#[case] value: serde_json::Value, #[case] expected: bool) {
        assert_eq!(TypeCoercion::is_truthy(&v(value)), expected);
    }

    #[rstest]
    #[case(json!(1), json!("1"), true)]
    #[case(json!(1), json!(1.0), true)]
    #[case(json!(0), json!(false), true)]
    #[case(json!("1"), json!(true), true)]
    #[case(json!(null), json!(0), false)]
    #[case(json!(null), json!(null), true)]
    #[case(json!([1]), json!(1), true)]
    #[case(json!([]), json!(false), true)]
    #[case(json!("abc"), json!(0), false)]
    #[case(json!([1, 2]), json!([1, 2]), true)]
    fn loose_equality(
        #[case] left: serde_json::Value,
        #[case] right: serde_json::Value,
        #[case] expected: bool,
    ) {
        assert_eq!(TypeCoercion::loose_equals(&v(left), &v(right)), expected);
    }

    #[test]
    fn strict_equality_does_not_coerce() {
        assert!(!TypeCoercion::strict_equals(&v(json!(1)), &v(json!("1"))));
        assert!(TypeCoercion::strict_equals(&v(json!(1)), &v(json!(1.0))));
        assert!(TypeCoercion::strict_equals(
            &v(json!({"a": [1]})),
            &v(json!({"a": [1.0]}))
        ));
    }

    #[test]
    fn comparison_between_strings_is_lexical() {
        assert_eq!(
            TypeCoercion::compare(&v(json!("10")), &v(json!("9"))),
            Some(Ordering::Less)
        );
        assert_eq!(
            TypeCoercion::compare(&v(json!("10")), &v(json!(9))),
            Some(Ordering::Greater)
        );
        assert_eq!(TypeCoercion::compare(&v(json!("x")), &v(json!(9))), None);
    }

    #[test]
    fn display_strings() {
        assert_eq!(TypeCoercion::to_display_string(&v(json!(2.50))), "2.5");
        assert_eq!(TypeCoercion::to_display_string(&v(json!([1, null, "a"]))), "1,,a");
        assert_eq!(TypeCoercion::to_display_string(&v(json!({"a": 1}))), "[object Object]");
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(TypeCoercion::to_number(&v(json!(" 42 "))), Some(Decimal::from(42)));
        assert_eq!(TypeCoercion::to_number(&v(json!("1e3"))), Some(Decimal::from(1000)));
        assert_eq!(TypeCoercion::to_number(&v(json!("4x"))), None);
        assert_eq!(TypeCoercion::to_number(&v(json!("1_0"))), None);
        assert!(!TypeCoercion::loose_equals(&v(json!("1_0")), &v(json!(10))));
    }
}
