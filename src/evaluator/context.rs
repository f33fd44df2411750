//! Evaluation context

use crate::model::Value;

/// Data an expression is evaluated against
///
/// At the top level this is the caller's context. Iterating operators
/// (`map`, `filter`, `reduce`, `all`, `some`, `none`) evaluate their body
/// with a fresh context whose data is the current element, so a nested
/// `var` resolves relative to that element.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Current data for `var`, `missing` and `missing_some`
    pub data: &'a Value,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(data: &'a Value) -> Self {
        Self { data }
    }
}
