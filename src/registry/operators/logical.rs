//! Logical operators for rule expressions

use crate::ast::ExpressionNode;
use crate::evaluator::{EvaluationContext, EvaluationResult};
use crate::model::Value;
use crate::registry::operator::{
    LazyEvaluationContext, LazyOperator, OperatorRegistry, OperatorResult, RuleOperator,
};
use crate::registry::signature::OperatorSignature;

/// Logical AND operator
///
/// Evaluates left to right and returns the first falsy operand, or the last
/// operand when all are truthy. Operands after the deciding one are never
/// evaluated.
pub struct AndOperator;

impl LazyOperator for AndOperator {
    fn symbol(&self) -> &str {
        "and"
    }
    fn human_friendly_name(&self) -> &str {
        "Logical And"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(1)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        let mut current = Value::Null;
        for arg in args {
            current = context.eval(arg)?;
            if !current.is_truthy() {
                break;
            }
        }
        Ok(current)
    }
}

/// Logical OR operator
///
/// Returns the first truthy operand, or the last operand when none is.
pub struct OrOperator;

impl LazyOperator for OrOperator {
    fn symbol(&self) -> &str {
        "or"
    }
    fn human_friendly_name(&self) -> &str {
        "Logical Or"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(1)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        let mut current = Value::Null;
        for arg in args {
            current = context.eval(arg)?;
            if current.is_truthy() {
                break;
            }
        }
        Ok(current)
    }
}

/// Logical NOT operator (`!`, also `not`)
pub struct NotOperator;

impl RuleOperator for NotOperator {
    fn symbol(&self) -> &str {
        "!"
    }
    fn aliases(&self) -> &[&'static str] {
        &["not"]
    }
    fn human_friendly_name(&self) -> &str {
        "Logical Not"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(1)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        Ok(Value::Boolean(!args[0].is_truthy()))
    }
}

/// Truthiness cast (`!!`)
pub struct TruthyOperator;

impl RuleOperator for TruthyOperator {
    fn symbol(&self) -> &str {
        "!!"
    }
    fn human_friendly_name(&self) -> &str {
        "Truthy"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(1)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        Ok(Value::Boolean(args[0].is_truthy()))
    }
}

/// Register all logical operators
pub fn register_logical_operators(registry: &mut OperatorRegistry) {
    registry.register_lazy(AndOperator);
    registry.register_lazy(OrOperator);
    registry.register(NotOperator);
    registry.register(TruthyOperator);
}
