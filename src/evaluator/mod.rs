//! Rule expression evaluator
//!
//! Walks a parsed [`ExpressionNode`](crate::ast::ExpressionNode) tree against
//! a data context. Evaluation is pure: it reads the tree and the context,
//! never mutates either, and returns either a complete value or an error.

#![warn(missing_docs)]

mod context;
mod engine;
mod error;

pub use context::EvaluationContext;
pub use engine::RuleEngine;
pub use error::{EvaluationError, EvaluationResult};
