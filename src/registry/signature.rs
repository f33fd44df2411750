//! Operator signatures for parse-time arity checking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of arguments an operator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorSignature {
    /// Minimum number of arguments
    pub min_arity: usize,
    /// Maximum number of arguments (None for variadic)
    pub max_arity: Option<usize>,
}

impl OperatorSignature {
    /// Exactly `arity` arguments
    pub const fn exact(arity: usize) -> Self {
        Self {
            min_arity: arity,
            max_arity: Some(arity),
        }
    }

    /// Between `min` and `max` arguments, inclusive
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min_arity: min,
            max_arity: Some(max),
        }
    }

    /// At least `min` arguments
    pub const fn variadic(min: usize) -> Self {
        Self {
            min_arity: min,
            max_arity: None,
        }
    }

    /// Whether `count` arguments satisfy this signature
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_arity && self.max_arity.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for OperatorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_arity {
            Some(max) if max == self.min_arity => write!(f, "{max}"),
            Some(max) => write!(f, "{}-{max}", self.min_arity),
            None => write!(f, "at least {}", self.min_arity),
        }
    }
}
