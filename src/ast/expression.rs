//! Expression nodes

use crate::model::Value;
use serde::{Serialize, Serializer};

/// A parsed rule expression
///
/// Trees are built by [`crate::parser::parse_expression`], which has already
/// checked every operator name and arity against a registry. Evaluation
/// borrows the tree and never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// Constant value, including multi-key objects which are plain data
    Literal(Value),

    /// Array whose elements are evaluated one by one
    Array(Vec<ExpressionNode>),

    /// Operator application, `{"<operator>": [<arguments>...]}`
    Operation {
        /// Operator name as written in the document
        operator: String,
        /// Argument expressions, evaluated or not at the operator's discretion
        arguments: Vec<ExpressionNode>,
    },
}

impl ExpressionNode {
    /// Create a literal node
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create an operation node
    pub fn operation(operator: impl Into<String>, arguments: Vec<ExpressionNode>) -> Self {
        Self::Operation {
            operator: operator.into(),
            arguments,
        }
    }

    /// Operator name when this node is an operation
    pub fn operator(&self) -> Option<&str> {
        match self {
            Self::Operation { operator, .. } => Some(operator),
            _ => None,
        }
    }

    /// Whether evaluating this node needs no data context
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Array(items) => items.iter().all(Self::is_constant),
            Self::Operation { .. } => false,
        }
    }

    /// Convert back to the JSON document form
    ///
    /// Arguments are always written as an array, so `{"var": "a"}` comes back
    /// as `{"var": ["a"]}`. Both parse to the same tree.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Literal(value) => value.to_json(),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Operation {
                operator,
                arguments,
            } => {
                let mut map = serde_json::Map::with_capacity(1);
                map.insert(
                    operator.clone(),
                    serde_json::Value::Array(arguments.iter().map(Self::to_json).collect()),
                );
                serde_json::Value::Object(map)
            }
        }
    }
}

impl Serialize for ExpressionNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
