//! Operator registry for rule expressions
//!
//! This module provides the trait-based registry that maps operator names to
//! implementations, allowing hosts to extend the rule language with their
//! own operators.

#![warn(missing_docs)]

pub mod operator;
pub mod operators;
pub mod signature;

pub use operator::{
    LazyEvaluationContext, LazyEvaluator, LazyOperator, OperatorError, OperatorImpl,
    OperatorRegistry, OperatorResult, RuleOperator,
};
pub use signature::OperatorSignature;

use std::sync::{Arc, LazyLock};

static STANDARD_REGISTRY: LazyLock<Arc<OperatorRegistry>> =
    LazyLock::new(|| Arc::new(create_standard_registry()));

/// Create a registry with all built-in operators
pub fn create_standard_registry() -> OperatorRegistry {
    let mut operators = OperatorRegistry::new();
    operator::register_builtin_operators(&mut operators);
    operators
}

/// Shared registry with all built-in operators
///
/// Built once per process and shared by every engine created with
/// [`RuleEngine::new`](crate::evaluator::RuleEngine::new).
pub fn standard_registry() -> Arc<OperatorRegistry> {
    Arc::clone(&STANDARD_REGISTRY)
}
