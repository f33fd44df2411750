//! Comparison operators for rule expressions

use crate::evaluator::EvaluationContext;
use crate::model::{TypeCoercion, Value};
use crate::registry::operator::{OperatorRegistry, OperatorResult, RuleOperator};
use crate::registry::signature::OperatorSignature;
use std::cmp::Ordering;

/// Coercing equality operator (==)
pub struct EqualOperator;

impl RuleOperator for EqualOperator {
    fn symbol(&self) -> &str {
        "=="
    }
    fn human_friendly_name(&self) -> &str {
        "Equality"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        Ok(Value::Boolean(TypeCoercion::loose_equals(&args[0], &args[1])))
    }
}

/// Coercing inequality operator (!=)
pub struct NotEqualOperator;

impl RuleOperator for NotEqualOperator {
    fn symbol(&self) -> &str {
        "!="
    }
    fn human_friendly_name(&self) -> &str {
        "Inequality"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        Ok(Value::Boolean(!TypeCoercion::loose_equals(&args[0], &args[1])))
    }
}

/// Strict equality operator (===)
pub struct StrictEqualOperator;

impl RuleOperator for StrictEqualOperator {
    fn symbol(&self) -> &str {
        "==="
    }
    fn human_friendly_name(&self) -> &str {
        "Strict Equality"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        Ok(Value::Boolean(TypeCoercion::strict_equals(&args[0], &args[1])))
    }
}

/// Strict inequality operator (!==)
pub struct StrictNotEqualOperator;

impl RuleOperator for StrictNotEqualOperator {
    fn symbol(&self) -> &str {
        "!=="
    }
    fn human_friendly_name(&self) -> &str {
        "Strict Inequality"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        Ok(Value::Boolean(!TypeCoercion::strict_equals(&args[0], &args[1])))
    }
}

/// Ordering operator over two or three operands
///
/// With three operands the test is chained, so `{"<": [1, x, 10]}` reads
/// "x lies strictly between 1 and 10". Unordered pairs are never in order.
pub struct OrderingOperator {
    symbol: &'static str,
    name: &'static str,
    accepts: fn(Ordering) -> bool,
}

impl OrderingOperator {
    /// Less than (<)
    pub const LESS_THAN: Self = Self {
        symbol: "<",
        name: "Less Than",
        accepts: Ordering::is_lt,
    };

    /// Less than or equal (<=)
    pub const LESS_THAN_OR_EQUAL: Self = Self {
        symbol: "<=",
        name: "Less Than Or Equal",
        accepts: Ordering::is_le,
    };

    /// Greater than (>)
    pub const GREATER_THAN: Self = Self {
        symbol: ">",
        name: "Greater Than",
        accepts: Ordering::is_gt,
    };

    /// Greater than or equal (>=)
    pub const GREATER_THAN_OR_EQUAL: Self = Self {
        symbol: ">=",
        name: "Greater Than Or Equal",
        accepts: Ordering::is_ge,
    };

    fn in_order(&self, left: &Value, right: &Value) -> bool {
        TypeCoercion::compare(left, right).is_some_and(self.accepts)
    }
}

impl RuleOperator for OrderingOperator {
    fn symbol(&self) -> &str {
        self.symbol
    }
    fn human_friendly_name(&self) -> &str {
        self.name
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::range(2, 3)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let result = args.windows(2).all(|pair| self.in_order(&pair[0], &pair[1]));
        Ok(Value::Boolean(result))
    }
}

/// Register all comparison operators
pub fn register_comparison_operators(registry: &mut OperatorRegistry) {
    registry.register(EqualOperator);
    registry.register(NotEqualOperator);
    registry.register(StrictEqualOperator);
    registry.register(StrictNotEqualOperator);
    registry.register(OrderingOperator::LESS_THAN);
    registry.register(OrderingOperator::LESS_THAN_OR_EQUAL);
    registry.register(OrderingOperator::GREATER_THAN);
    registry.register(OrderingOperator::GREATER_THAN_OR_EQUAL);
}
