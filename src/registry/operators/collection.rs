//! Array operators for rule expressions
//!
//! The iterating operators evaluate their first argument against the
//! invoking data and their body once per element, with the element as the
//! current data. A first argument that is not an array behaves as `[]`.

use crate::ast::ExpressionNode;
use crate::evaluator::{EvaluationContext, EvaluationResult};
use crate::model::{Collection, ObjectMap, TypeCoercion, Value};
use crate::registry::operator::{
    LazyEvaluationContext, LazyOperator, OperatorError, OperatorRegistry, OperatorResult,
    RuleOperator,
};
use crate::registry::signature::OperatorSignature;

fn source_elements(
    source: &ExpressionNode,
    context: &LazyEvaluationContext<'_>,
) -> EvaluationResult<Collection> {
    Ok(match context.eval(source)? {
        Value::Array(items) => items,
        _ => Collection::new(),
    })
}

fn count_matching(
    args: &[ExpressionNode],
    context: &LazyEvaluationContext<'_>,
) -> EvaluationResult<usize> {
    let mut count = 0;
    for item in &source_elements(&args[0], context)? {
        if context.eval_with(&args[1], item)?.is_truthy() {
            count += 1;
        }
    }
    Ok(count)
}

/// Element-wise transform (`map`)
pub struct MapOperator;

impl LazyOperator for MapOperator {
    fn symbol(&self) -> &str {
        "map"
    }
    fn human_friendly_name(&self) -> &str {
        "Map"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        source_elements(&args[0], context)?
            .iter()
            .map(|item| context.eval_with(&args[1], item))
            .collect::<EvaluationResult<Vec<_>>>()
            .map(Value::array)
    }
}

/// Elements whose body is truthy (`filter`)
pub struct FilterOperator;

impl LazyOperator for FilterOperator {
    fn symbol(&self) -> &str {
        "filter"
    }
    fn human_friendly_name(&self) -> &str {
        "Filter"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        let mut kept = Vec::new();
        for item in source_elements(&args[0], context)? {
            if context.eval_with(&args[1], &item)?.is_truthy() {
                kept.push(item);
            }
        }
        Ok(Value::array(kept))
    }
}

/// Left fold (`reduce`)
///
/// The body sees `{"current": element, "accumulator": value}` as its data.
/// The third argument is the initial accumulator, `null` when omitted.
pub struct ReduceOperator;

impl LazyOperator for ReduceOperator {
    fn symbol(&self) -> &str {
        "reduce"
    }
    fn human_friendly_name(&self) -> &str {
        "Reduce"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::range(2, 3)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        let mut accumulator = match args.get(2) {
            Some(initial) => context.eval(initial)?,
            None => Value::Null,
        };
        for item in source_elements(&args[0], context)? {
            let mut scope = ObjectMap::with_capacity(2);
            scope.insert("current".to_string(), item);
            scope.insert("accumulator".to_string(), accumulator);
            accumulator = context.eval_with(&args[1], &Value::Object(scope))?;
        }
        Ok(accumulator)
    }
}

/// Every element passes (`all`), false for an empty array
pub struct AllOperator;

impl LazyOperator for AllOperator {
    fn symbol(&self) -> &str {
        "all"
    }
    fn human_friendly_name(&self) -> &str {
        "All"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        let items = source_elements(&args[0], context)?;
        if items.is_empty() {
            return Ok(Value::Boolean(false));
        }
        for item in &items {
            if !context.eval_with(&args[1], item)?.is_truthy() {
                return Ok(Value::Boolean(false));
            }
        }
        Ok(Value::Boolean(true))
    }
}

/// At least one element passes (`some`)
pub struct SomeOperator;

impl LazyOperator for SomeOperator {
    fn symbol(&self) -> &str {
        "some"
    }
    fn human_friendly_name(&self) -> &str {
        "Some"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        Ok(Value::Boolean(count_matching(args, context)? > 0))
    }
}

/// No element passes (`none`), true for an empty array
pub struct NoneOperator;

impl LazyOperator for NoneOperator {
    fn symbol(&self) -> &str {
        "none"
    }
    fn human_friendly_name(&self) -> &str {
        "None"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        Ok(Value::Boolean(count_matching(args, context)? == 0))
    }
}

/// Concatenate arrays one level deep (`merge`)
///
/// Non-array operands are appended as single elements.
pub struct MergeOperator;

impl RuleOperator for MergeOperator {
    fn symbol(&self) -> &str {
        "merge"
    }
    fn human_friendly_name(&self) -> &str {
        "Merge"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(0)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let mut merged = Collection::new();
        for arg in args {
            match arg {
                Value::Array(items) => items.iter().cloned().for_each(|item| merged.push(item)),
                other => merged.push(other.clone()),
            }
        }
        Ok(Value::Array(merged))
    }
}

/// Membership test (`in`)
///
/// Against an array the needle is compared with strict equality. Against a
/// string the needle's text rendering is searched as a substring. A `null`
/// haystack contains nothing.
pub struct InOperator;

impl RuleOperator for InOperator {
    fn symbol(&self) -> &str {
        "in"
    }
    fn human_friendly_name(&self) -> &str {
        "In"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let needle = &args[0];
        let found = match &args[1] {
            Value::Array(items) => items
                .iter()
                .any(|item| TypeCoercion::strict_equals(needle, item)),
            Value::String(haystack) => {
                haystack.contains(TypeCoercion::to_display_string(needle).as_str())
            }
            Value::Null => false,
            other => {
                return Err(OperatorError::InvalidOperandTypes {
                    operator: self.symbol().to_string(),
                    left_type: needle.type_name().to_string(),
                    right_type: other.type_name().to_string(),
                });
            }
        };
        Ok(Value::Boolean(found))
    }
}

/// Register all array operators
pub fn register_collection_operators(registry: &mut OperatorRegistry) {
    registry.register_lazy(MapOperator);
    registry.register_lazy(FilterOperator);
    registry.register_lazy(ReduceOperator);
    registry.register_lazy(AllOperator);
    registry.register_lazy(SomeOperator);
    registry.register_lazy(NoneOperator);
    registry.register(MergeOperator);
    registry.register(InOperator);
}
