// Error types for rule evaluation

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::model::NumberOutOfRange;
use crate::registry::OperatorError;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors raised while evaluating a well-formed expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Operator evaluation error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Operator missing from the engine's registry
    ///
    /// Only reachable when a tree was parsed against a different registry
    /// than the one evaluating it.
    #[error("Operator '{operator}' is not registered with this engine")]
    UnregisteredOperator {
        /// Operator name
        operator: String,
    },

    /// Operation node with an argument count its operator rejects
    #[error("Operator '{operator}' expects {expected} arguments, got {actual}")]
    InvalidArity {
        /// Operator name
        operator: String,
        /// Accepted argument counts
        expected: String,
        /// Arguments supplied
        actual: usize,
    },

    /// Data document with a number the evaluator cannot represent
    #[error("Invalid data: {0}")]
    NumberOutOfRange(#[from] NumberOutOfRange),

    /// Expression nesting deeper than the configured limit
    #[error("Expression exceeds the maximum evaluation depth of {limit}")]
    DepthExceeded {
        /// Configured limit
        limit: usize,
    },
}

impl EvaluationError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            EvaluationError::Operator(err) => match err {
                OperatorError::InvalidOperandTypes { .. } => DiagnosticCode::InvalidOperandTypes,
                OperatorError::NonNumericOperand { .. } => DiagnosticCode::NonNumericOperand,
                OperatorError::DivisionByZero { .. } => DiagnosticCode::DivisionByZero,
                OperatorError::ArithmeticOverflow { .. } => DiagnosticCode::ArithmeticOverflow,
                OperatorError::InvalidArgument { .. } => DiagnosticCode::InvalidArgument,
            },
            EvaluationError::UnregisteredOperator { .. } => DiagnosticCode::UnknownOperator,
            EvaluationError::InvalidArity { .. } => DiagnosticCode::InvalidArity,
            EvaluationError::NumberOutOfRange(_) => DiagnosticCode::NumberOutOfRange,
            EvaluationError::DepthExceeded { .. } => DiagnosticCode::DepthExceeded,
        };

        DiagnosticBuilder::error(code)
            .with_message(self.to_string())
            .build()
    }
}
