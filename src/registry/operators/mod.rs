//! Built-in operator implementations for rule expressions

mod arithmetic;
mod collection;
mod comparison;
mod control;
mod data;
mod logical;
mod string;

pub use arithmetic::*;
pub use collection::*;
pub use comparison::*;
pub use control::*;
pub use data::*;
pub use logical::*;
pub use string::*;

use crate::model::{TypeCoercion, Value};
use crate::registry::operator::{OperatorError, OperatorRegistry, OperatorResult};
use rust_decimal::Decimal;

/// Register all built-in operators
pub fn register_builtin_operators(registry: &mut OperatorRegistry) {
    // Data access
    data::register_data_operators(registry);

    // Logic and control flow
    logical::register_logical_operators(registry);
    control::register_control_operators(registry);

    // Comparison operators
    comparison::register_comparison_operators(registry);

    // Arithmetic operators
    arithmetic::register_arithmetic_operators(registry);

    // Array operators
    collection::register_collection_operators(registry);

    // String operators
    string::register_string_operators(registry);
}

/// Numeric reading of an operand, or a non-numeric operand error
pub(crate) fn numeric_operand(operator: &str, value: &Value) -> OperatorResult<Decimal> {
    TypeCoercion::to_number(value).ok_or_else(|| OperatorError::non_numeric(operator, value))
}

/// Number result with integral values collapsed to integers
pub(crate) fn number(value: Decimal) -> Value {
    Value::from_decimal(value)
}
