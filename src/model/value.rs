//! Core value types for rule expressions

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::type_coercion::{TypeCoercion, parse_decimal};

/// Ordered key/value mapping used for object values and data contexts
pub type ObjectMap = IndexMap<String, Value>;

/// Core value type produced and consumed by rule expressions
///
/// Numbers are split into an exact `Integer` and an arbitrary precision
/// `Decimal`. Arithmetic always normalizes integral results back to
/// `Integer`, so `{"/": [4, 2]}` yields `2` and not `2.0`.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or explicit null
    #[default]
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with arbitrary precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Ordered sequence of values
    Array(Collection),

    /// Nested mapping, insertion ordered
    Object(ObjectMap),
}

/// JSON number too large for the decimal range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Number {number} is outside the supported numeric range")]
pub struct NumberOutOfRange {
    /// The number as written
    pub number: String,
}

/// Collection type that wraps a vector of values
#[derive(Clone, PartialEq, Default)]
pub struct Collection(Vec<Value>);

impl Collection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a collection from a vector
    pub fn from_vec(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Get the length of the collection
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over the values
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Push a value to the collection
    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    /// Get an element by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Borrow the values as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Take ownership of the inner vector
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Collection {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Value {
    /// Create an array value from a vector of values
    pub fn array(values: Vec<Value>) -> Self {
        Self::Array(Collection::from_vec(values))
    }

    /// Create an empty array value
    pub fn empty_array() -> Self {
        Self::Array(Collection::new())
    }

    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a number from a decimal, collapsing integral values to `Integer`
    pub fn from_decimal(value: Decimal) -> Self {
        if value.fract().is_zero() {
            if let Some(i) = value.to_i64() {
                return Self::Integer(i);
            }
        }
        Self::Decimal(value.normalize())
    }

    /// Convert a JSON document
    ///
    /// Integral numbers become `Integer` when they fit. Numbers too small
    /// for the decimal scale read as zero, numbers too large are an error.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, NumberOutOfRange> {
        Ok(match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => number_from_json(n)?,
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::Array(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Collection, _>>()?,
            ),
            serde_json::Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(key, value)| Ok((key.clone(), Self::from_json(value)?)))
                    .collect::<Result<ObjectMap, NumberOutOfRange>>()?,
            ),
        })
    }

    /// Whether this value is `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this value is an integer or decimal
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Decimal(_))
    }

    /// Truthiness used by every boolean decision in the evaluator
    pub fn is_truthy(&self) -> bool {
        TypeCoercion::is_truthy(self)
    }

    /// Get the elements if this is an array
    pub fn as_array(&self) -> Option<&Collection> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the mapping if this is an object
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Name of the value's kind as reported in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) | Self::Decimal(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Convert to the JSON document form
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Decimal(d) => decimal_to_json(d),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = NumberOutOfRange;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json(&json)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = NumberOutOfRange;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json(json)
    }
}

fn number_from_json(number: &serde_json::Number) -> Result<Value, NumberOutOfRange> {
    if let Some(i) = number.as_i64() {
        return Ok(Value::Integer(i));
    }
    if let Some(u) = number.as_u64() {
        return Ok(Value::from_decimal(Decimal::from(u)));
    }

    let text = number.to_string();
    if let Some(decimal) = parse_decimal(&text) {
        return Ok(Value::from_decimal(decimal));
    }
    // Magnitudes below the smallest decimal step round to zero
    match number.as_f64() {
        Some(float) if float.abs() < 1.0 => Ok(Value::Integer(0)),
        _ => Err(NumberOutOfRange { number: text }),
    }
}

fn decimal_to_json(decimal: &Decimal) -> serde_json::Value {
    if decimal.fract().is_zero() {
        if let Some(i) = decimal.to_i64() {
            return serde_json::Value::from(i);
        }
        if let Some(u) = decimal.to_u64() {
            return serde_json::Value::from(u);
        }
    }
    decimal
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::array(values)
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Self::Object(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(&json).map_err(D::Error::custom)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{}", d.normalize()),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Object(map) => f.debug_map().entries(map.iter()).finish(),
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Renders values the way string concatenation sees them
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TypeCoercion::to_display_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_json_numbers_stay_integers() {
        assert_eq!(Value::from_json(&json!(5)).unwrap(), Value::Integer(5));
        assert!(matches!(Value::from_json(&json!(2.5)), Ok(Value::Decimal(_))));
    }

    #[test]
    fn decimal_results_collapse_when_integral() {
        assert_eq!(Value::from_decimal(Decimal::new(40, 1)), Value::Integer(4));
        assert_eq!(
            Value::from_decimal(Decimal::new(250, 2)),
            Value::Decimal(Decimal::new(25, 1))
        );
    }

    #[test]
    fn json_conversion_keeps_object_order() {
        let json = json!({"b": 1, "a": [true, null, "x"]});
        let value = Value::from_json(&json).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn integral_json_numbers_read_as_integers() {
        assert_eq!(Value::from_json(&json!(1.0)).unwrap(), Value::Integer(1));
        assert_eq!(Value::from_json(&json!(-3.0)).unwrap(), Value::Integer(-3));
        assert_eq!(
            Value::from_json(&json!(u64::MAX)).unwrap(),
            Value::Decimal(Decimal::from(u64::MAX))
        );
    }

    #[test]
    fn out_of_scale_json_numbers() {
        assert_eq!(Value::from_json(&json!(1e-30)).unwrap(), Value::Integer(0));
        assert_eq!(
            Value::from_json(&json!({"x": [1e30]})),
            Err(NumberOutOfRange {
                number: "1e30".to_string()
            })
        );
        assert!(serde_json::from_value::<Value>(json!(-1e40)).is_err());
    }

    #[test]
    fn integral_decimals_write_exact_json() {
        let value = Value::Decimal(Decimal::from(u64::MAX));
        assert_eq!(value.to_json(), json!(u64::MAX));
        assert_eq!(Value::from_json(&value.to_json()).unwrap(), value);
    }
}
