//! String operators for rule expressions

use super::numeric_operand;
use crate::evaluator::EvaluationContext;
use crate::model::{TypeCoercion, Value};
use crate::registry::operator::{OperatorError, OperatorRegistry, OperatorResult, RuleOperator};
use crate::registry::signature::OperatorSignature;
use rust_decimal::prelude::ToPrimitive;

/// String concatenation operator (`cat`)
pub struct CatOperator;

impl RuleOperator for CatOperator {
    fn symbol(&self) -> &str {
        "cat"
    }
    fn human_friendly_name(&self) -> &str {
        "Concatenate"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::variadic(0)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let joined: String = args.iter().map(TypeCoercion::to_display_string).collect();
        Ok(Value::String(joined))
    }
}

/// Substring operator (`substr`)
///
/// `{"substr": [s, start, length]}` counts characters. A negative start counts
/// from the end of the string, and a negative length drops that many
/// characters from the end of the result.
pub struct SubstrOperator;

impl SubstrOperator {
    fn integer_argument(&self, args: &[Value], index: usize) -> OperatorResult<i64> {
        numeric_operand(self.symbol(), &args[index])?
            .trunc()
            .to_i64()
            .ok_or_else(|| OperatorError::InvalidArgument {
                operator: self.symbol().to_string(),
                index,
                message: "position out of range".to_string(),
            })
    }
}

impl RuleOperator for SubstrOperator {
    fn symbol(&self) -> &str {
        "substr"
    }
    fn human_friendly_name(&self) -> &str {
        "Substring"
    }
    fn signature(&self) -> OperatorSignature {
        OperatorSignature::range(2, 3)
    }

    fn evaluate(&self, args: &[Value], _context: &EvaluationContext<'_>) -> OperatorResult<Value> {
        let chars: Vec<char> = TypeCoercion::to_display_string(&args[0]).chars().collect();
        let len = chars.len() as i64;

        let start = self.integer_argument(args, 1)?;
        let start = if start < 0 { (len + start).max(0) } else { start.min(len) };

        let end = match args.get(2) {
            None | Some(Value::Null) => len,
            Some(_) => {
                let length = self.integer_argument(args, 2)?;
                if length < 0 {
                    (len + length).max(start)
                } else {
                    start.saturating_add(length).min(len)
                }
            }
        };

        let result: String = chars[start as usize..end as usize].iter().collect();
        Ok(Value::String(result))
    }
}

/// Register all string operators
pub fn register_string_operators(registry: &mut OperatorRegistry) {
    registry.register(CatOperator);
    registry.register(SubstrOperator);
}
