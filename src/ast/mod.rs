//! Expression tree definitions
//!
//! Rules are stored as JSON documents: a bare literal, an array of
//! expressions, or a single-key object mapping an operator name to its
//! argument list. This module holds the parsed tree form of those documents.

#![warn(missing_docs)]

mod expression;

pub use expression::ExpressionNode;
