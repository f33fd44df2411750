//! Data access operators: `var`, `missing`, `missing_some`

use super::numeric_operand;
use crate::evaluator::EvaluationContext;
use crate::model::{TypeCoercion, Value};
use crate::registry::operator::{OperatorError, OperatorRegistry, OperatorResult, RuleOperator};
use crate::registry::signature::OperatorSignature;

/// Resolve a dotted path against `data`
///
/// Returns `None` when a segment is absent or an intermediate value is
/// `null`. A `null` stored at the final segment is returned as found.
/// Numeric segments index into arrays.
pub fn resolve_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }
    path.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

fn path_key(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => TypeCoercion::to_display_string(other),
    }
}

/// Variable lookup (`var`)
///
/// `{"var": "a.b"}` reads a nested key, `{"var": ["a", 0]}` supplies a
/// default for absent keys, and an empty or missing path returns the whole
/// current data.
pub struct VarOperator;

impl RuleOperator for VarOperator {
    fn symbol(&self) -> &str {
        "var"
    }
    fn human_friendly_name(&self) -> &str {
        "Variable"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::range(0, 2)
    }

    fn evaluate(&self, args: &[Value], context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let path = args.first().map(path_key).unwrap_or_default();
        let found = resolve_path(context.data, &path);
        Ok(match found {
            Some(value) => value.clone(),
            None => args.get(1).cloned().unwrap_or(Value::Null),
        })
    }
}

fn is_missing(data: &Value, key: &Value) -> bool {
    match resolve_path(data, &path_key(key)) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn missing_keys(data: &Value, keys: &[Value]) -> Vec<Value> {
    keys.iter()
        .filter(|key| is_missing(data, key))
        .cloned()
        .collect()
}

/// Keys absent from the data (`missing`)
///
/// A key counts as missing when its path is absent, `null`, or `""`.
pub struct MissingOperator;

impl RuleOperator for MissingOperator {
    fn symbol(&self) -> &str {
        "missing"
    }
    fn human_friendly_name(&self) -> &str {
        "Missing"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(0)
    }

    fn evaluate(&self, args: &[Value], context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        // A single array argument is the key list itself
        let keys = match args {
            [Value::Array(list)] => list.as_slice(),
            other => other,
        };
        Ok(Value::array(missing_keys(context.data, keys)))
    }
}

/// Minimum-present test (`missing_some`)
///
/// `{"missing_some": [n, keys]}` is `[]` when at least `n` of `keys` are
/// present, otherwise the keys that are missing.
pub struct MissingSomeOperator;

impl RuleOperator for MissingSomeOperator {
    fn symbol(&self) -> &str {
        "missing_some"
    }
    fn human_friendly_name(&self) -> &str {
        "Missing Some"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let need = numeric_operand(self.symbol(), &args[0])?;
        let keys = args[1]
            .as_array()
            .ok_or_else(|| OperatorError::InvalidArgument {
                operator: self.symbol().to_string(),
                index: 1,
                message: format!("expected an array of keys, got {}", args[1].type_name()),
            })?;

        let missing = missing_keys(context.data, keys.as_slice());
        let present = keys.len() - missing.len();
        if rust_decimal::Decimal::from(present) >= need {
            Ok(Value::empty_array())
        } else {
            Ok(Value::array(missing))
        }
    }
}

/// Register data access operators
pub fn register_data_operators(registry: &mut OperatorRegistry) {
    registry.register(VarOperator);
    registry.register(MissingOperator);
    registry.register(MissingSomeOperator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_walk_objects_and_arrays() {
        let data = Value::try_from(json!({"a": {"b": [10, {"c": null}]}})).unwrap();
        assert_eq!(resolve_path(&data, "a.b.0"), Some(&Value::Integer(10)));
        assert_eq!(resolve_path(&data, "a.b.1.c"), Some(&Value::Null));
        assert_eq!(resolve_path(&data, "a.b.1.c.d"), None);
        assert_eq!(resolve_path(&data, "a.x"), None);
        assert_eq!(resolve_path(&data, ""), Some(&data));
    }
}
