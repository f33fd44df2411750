//! Operator registry and operator traits

use crate::ast::ExpressionNode;
use crate::evaluator::{EvaluationContext, EvaluationResult};
use crate::model::Value;
use crate::registry::signature::OperatorSignature;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use strsim::jaro_winkler;
use thiserror::Error;

use crate::registry::operators;

/// Result type for operator operations
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Operator evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    /// Invalid operand types for binary operation
    #[error("Operator '{operator}' cannot be applied to types {left_type} and {right_type}")]
    InvalidOperandTypes {
        /// The operator symbol that failed
        operator: String,
        /// Type of the left operand
        left_type: String,
        /// Type of the right operand
        right_type: String,
    },
    /// Operand has no numeric reading
    #[error("Operator '{operator}' expects numeric operands, got {operand_type} {operand}")]
    NonNumericOperand {
        /// The operator symbol that failed
        operator: String,
        /// Type of the operand
        operand_type: String,
        /// Rendering of the offending operand
        operand: String,
    },
    /// Division or remainder by zero
    #[error("Operator '{operator}' divided by zero")]
    DivisionByZero {
        /// The operator symbol that failed
        operator: String,
    },
    /// Result does not fit the number range
    #[error("Operator '{operator}' overflowed the numeric range")]
    ArithmeticOverflow {
        /// The operator symbol that failed
        operator: String,
    },
    /// Argument value is unusable for this operator
    #[error("Operator '{operator}' argument {index}: {message}")]
    InvalidArgument {
        /// The operator symbol that failed
        operator: String,
        /// Zero-based argument position
        index: usize,
        /// Error message describing what went wrong
        message: String,
    },
}

impl OperatorError {
    /// Shorthand for a non-numeric operand error
    pub fn non_numeric(operator: &str, operand: &Value) -> Self {
        Self::NonNumericOperand {
            operator: operator.to_string(),
            operand_type: operand.type_name().to_string(),
            operand: format!("{operand:?}"),
        }
    }
}

/// Operator evaluated on already-evaluated arguments
pub trait RuleOperator: Send + Sync {
    /// Get the operator symbol (e.g., "+", "var", "==")
    fn symbol(&self) -> &str;

    /// Alternative names registered for the same operator
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Get a human-friendly name for the operator
    fn human_friendly_name(&self) -> &str;

    /// Get the accepted argument counts
    fn signature(&self) -> OperatorSignature;

    /// Evaluate the operator
    ///
    /// `context` holds the data that `var`-like operators resolve against.
    fn evaluate(&self, args: &[Value], context: &EvaluationContext<'_>)
    -> OperatorResult<Value>;
}

/// Callback used by lazy operators to evaluate one of their argument nodes
pub type LazyEvaluator<'a> =
    dyn Fn(&ExpressionNode, &EvaluationContext<'_>) -> EvaluationResult<Value> + 'a;

/// Extended context for operators that control their own argument evaluation
pub struct LazyEvaluationContext<'a> {
    /// Data the operator was invoked with
    pub context: &'a EvaluationContext<'a>,
    /// Evaluates an argument node against a context of the operator's choosing
    pub evaluator: &'a LazyEvaluator<'a>,
}

impl LazyEvaluationContext<'_> {
    /// Evaluate an argument against the invoking context
    pub fn eval(&self, node: &ExpressionNode) -> EvaluationResult<Value> {
        (self.evaluator)(node, self.context)
    }

    /// Evaluate an argument with `data` bound as the current element
    pub fn eval_with(&self, node: &ExpressionNode, data: &Value) -> EvaluationResult<Value> {
        (self.evaluator)(node, &EvaluationContext::new(data))
    }
}

/// Operator that receives unevaluated arguments
///
/// Used for short-circuiting, conditionals and iteration, where some
/// arguments must be skipped or evaluated once per element.
pub trait LazyOperator: Send + Sync {
    /// Get the operator symbol
    fn symbol(&self) -> &str;

    /// Alternative names registered for the same operator
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Get a human-friendly name for the operator
    fn human_friendly_name(&self) -> &str;

    /// Get the accepted argument counts
    fn signature(&self) -> OperatorSignature;

    /// Evaluate with access to the argument nodes
    fn evaluate_lazy(
        &self,
        args: &[ExpressionNode],
        context: &LazyEvaluationContext<'_>,
    ) -> EvaluationResult<Value>;
}

/// Registered operator implementation
#[derive(Clone)]
pub enum OperatorImpl {
    /// Arguments are evaluated before the call
    Eager(Arc<dyn RuleOperator>),
    /// The operator evaluates its own arguments
    Lazy(Arc<dyn LazyOperator>),
}

impl OperatorImpl {
    /// Canonical symbol of the operator
    pub fn symbol(&self) -> &str {
        match self {
            Self::Eager(op) => op.symbol(),
            Self::Lazy(op) => op.symbol(),
        }
    }

    /// Human-friendly name of the operator
    pub fn human_friendly_name(&self) -> &str {
        match self {
            Self::Eager(op) => op.human_friendly_name(),
            Self::Lazy(op) => op.human_friendly_name(),
        }
    }

    /// Accepted argument counts
    pub fn signature(&self) -> OperatorSignature {
        match self {
            Self::Eager(op) => op.signature(),
            Self::Lazy(op) => op.signature(),
        }
    }
}

impl std::fmt::Debug for OperatorImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Eager(_) => "Eager",
            Self::Lazy(_) => "Lazy",
        };
        f.debug_struct(kind).field("symbol", &self.symbol()).finish()
    }
}

/// Registry mapping operator names to their implementations
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: FxHashMap<String, OperatorImpl>,
}

impl OperatorRegistry {
    /// Create a new, empty operator registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an eager operator under its symbol and aliases
    pub fn register<O: RuleOperator + 'static>(&mut self, operator: O) {
        let names = Self::names(operator.symbol(), operator.aliases());
        self.insert(names, OperatorImpl::Eager(Arc::new(operator)));
    }

    /// Register a lazy operator under its symbol and aliases
    pub fn register_lazy<O: LazyOperator + 'static>(&mut self, operator: O) {
        let names = Self::names(operator.symbol(), operator.aliases());
        self.insert(names, OperatorImpl::Lazy(Arc::new(operator)));
    }

    fn names(symbol: &str, aliases: &[&str]) -> Vec<String> {
        std::iter::once(symbol)
            .chain(aliases.iter().copied())
            .map(str::to_string)
            .collect()
    }

    fn insert(&mut self, names: Vec<String>, implementation: OperatorImpl) {
        for name in names {
            if self.operators.insert(name.clone(), implementation.clone()).is_some() {
                log::debug!("Operator '{name}' re-registered, previous implementation replaced");
            }
        }
    }

    /// Get an operator by name
    pub fn get(&self, name: &str) -> Option<&OperatorImpl> {
        self.operators.get(name)
    }

    /// Check if an operator exists
    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// All registered names, aliases included, sorted
    pub fn operator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Closest registered name to a misspelt operator, if any is close enough
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for candidate in self.operator_names() {
            let score = jaro_winkler(candidate, name);
            if score > 0.8 && best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.operator_names())
            .finish()
    }
}

/// Register all built-in operators
pub fn register_builtin_operators(registry: &mut OperatorRegistry) {
    operators::register_builtin_operators(registry);
}
