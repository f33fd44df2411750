//! Arithmetic operators for rule expressions
//!
//! Operands are coerced with [`TypeCoercion::to_number`](crate::model::TypeCoercion::to_number);
//! an operand with no numeric reading is an error rather than `NaN`.

use super::{number, numeric_operand};
use crate::evaluator::EvaluationContext;
use crate::model::Value;
use crate::registry::operator::{OperatorError, OperatorRegistry, OperatorResult, RuleOperator};
use crate::registry::signature::OperatorSignature;
use rust_decimal::Decimal;

fn overflow(operator: &str) -> OperatorError {
    OperatorError::ArithmeticOverflow {
        operator: operator.to_string(),
    }
}

/// Addition operator (+)
///
/// Variadic. With a single operand it acts as a numeric cast, with none it
/// yields `0`.
pub struct AddOperator;

impl RuleOperator for AddOperator {
    fn symbol(&self) -> &str {
        "+"
    }
    fn human_friendly_name(&self) -> &str {
        "Addition"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(0)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let mut sum = Decimal::ZERO;
        for arg in args {
            let operand = numeric_operand(self.symbol(), arg)?;
            sum = sum
                .checked_add(operand)
                .ok_or_else(|| overflow(self.symbol()))?;
        }
        Ok(number(sum))
    }
}

/// Subtraction operator (-), negation with a single operand
pub struct SubtractOperator;

impl RuleOperator for SubtractOperator {
    fn symbol(&self) -> &str {
        "-"
    }
    fn human_friendly_name(&self) -> &str {
        "Subtraction"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::range(1, 2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let left = numeric_operand(self.symbol(), &args[0])?;
        match args.get(1) {
            None => Ok(number(-left)),
            Some(right) => {
                let right = numeric_operand(self.symbol(), right)?;
                left.checked_sub(right)
                    .map(number)
                    .ok_or_else(|| overflow(self.symbol()))
            }
        }
    }
}

/// Multiplication operator (*)
pub struct MultiplyOperator;

impl RuleOperator for MultiplyOperator {
    fn symbol(&self) -> &str {
        "*"
    }
    fn human_friendly_name(&self) -> &str {
        "Multiplication"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(1)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let mut product = Decimal::ONE;
        for arg in args {
            let operand = numeric_operand(self.symbol(), arg)?;
            product = product
                .checked_mul(operand)
                .ok_or_else(|| overflow(self.symbol()))?;
        }
        Ok(number(product))
    }
}

/// Division operator (/)
pub struct DivideOperator;

impl RuleOperator for DivideOperator {
    fn symbol(&self) -> &str {
        "/"
    }
    fn human_friendly_name(&self) -> &str {
        "Division"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let left = numeric_operand(self.symbol(), &args[0])?;
        let right = numeric_operand(self.symbol(), &args[1])?;
        if right.is_zero() {
            return Err(OperatorError::DivisionByZero {
                operator: self.symbol().to_string(),
            });
        }
        left.checked_div(right)
            .map(number)
            .ok_or_else(|| overflow(self.symbol()))
    }
}

/// Remainder operator (%)
///
/// The result takes the sign of the dividend.
pub struct ModuloOperator;

impl RuleOperator for ModuloOperator {
    fn symbol(&self) -> &str {
        "%"
    }
    fn human_friendly_name(&self) -> &str {
        "Modulo"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::exact(2)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let left = numeric_operand(self.symbol(), &args[0])?;
        let right = numeric_operand(self.symbol(), &args[1])?;
        if right.is_zero() {
            return Err(OperatorError::DivisionByZero {
                operator: self.symbol().to_string(),
            });
        }
        left.checked_rem(right)
            .map(number)
            .ok_or_else(|| overflow(self.symbol()))
    }
}

/// Smallest or largest of its operands (`min`, `max`)
pub struct ExtremumOperator {
    symbol: &'static str,
    name: &'static str,
    pick_max: bool,
}

impl ExtremumOperator {
    /// Minimum (`min`)
    pub const MIN: Self = Self {
        symbol: "min",
        name: "Minimum",
        pick_max: false,
    };

    /// Maximum (`max`)
    pub const MAX: Self = Self {
        symbol: "max",
        name: "Maximum",
        pick_max: true,
    };
}

impl RuleOperator for ExtremumOperator {
    fn symbol(&self) -> &str {
        self.symbol
    }
    fn human_friendly_name(&self) -> &str {
        self.name
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(1)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let mut best: Option<Decimal> = None;
        for arg in args {
            let operand = numeric_operand(self.symbol, arg)?;
            best = Some(match best {
                Some(current) if self.pick_max => current.max(operand),
                Some(current) => current.min(operand),
                None => operand,
            });
        }
        Ok(best.map(number).unwrap_or(Value::Null))
    }
}

/// Register all arithmetic operators
pub fn register_arithmetic_operators(registry: &mut OperatorRegistry) {
    registry.register(AddOperator);
    registry.register(SubtractOperator);
    registry.register(MultiplyOperator);
    registry.register(DivideOperator);
    registry.register(ModuloOperator);
    registry.register(ExtremumOperator::MIN);
    registry.register(ExtremumOperator::MAX);
}
