//! Conditional and diagnostic operators

use crate::ast::ExpressionNode;
use crate::evaluator::{EvaluationContext, EvaluationResult};
use crate::model::Value;
use crate::registry::operator::{
    LazyEvaluationContext, LazyOperator, OperatorRegistry, OperatorResult, RuleOperator,
};
use crate::registry::signature::OperatorSignature;

/// Conditional operator (`if`, also `?:`)
///
/// Arguments are read as `condition, value` pairs. The value of the first
/// truthy condition is returned; an odd trailing argument is the default and
/// without one the result is `null`. Untaken branches are never evaluated.
pub struct IfOperator;

impl LazyOperator for IfOperator {
    fn symbol(&self) -> &str {
        "if"
    }
    fn aliases(&self) -> &[&'static str] {
        &["?:"]
    }
    fn human_friendly_name(&self) -> &str {
        "Conditional"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(0)
    }

    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value> {
        let mut pairs = args.chunks_exact(2);
        for pair in pairs.by_ref() {
            if context.eval(&pair[0])?.is_truthy() {
                return context.eval(&pair[1]);
            }
        }
        match pairs.remainder() {
            [default] => context.eval(default),
            _ => Ok(Value::Null),
        }
    }
}

/// Debug operator that logs its argument and returns it unchanged
pub struct LogOperator;

impl RuleOperator for LogOperator {
    fn symbol(&self) -> &str {
        "log"
    }
    fn human_friendly_name(&self) -> &str {
        "Log"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(1)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        log::info!("{:?}", args[0]);
        Ok(args[0].clone())
    }
}

/// Register conditional and diagnostic operators
pub fn register_control_operators(registry: &mut OperatorRegistry) {
    registry.register_lazy(IfOperator);
    registry.register(LogOperator);
}
