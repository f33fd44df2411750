//! Top-level error type for rule evaluation requests

use crate::diagnostics::Diagnostic;
use crate::evaluator::EvaluationError;
use crate::navigator::NavigationError;
use crate::parser::ParseError;
use crate::session::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for parse-and-evaluate operations
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error from evaluating a rule document
///
/// Structural errors mean the document itself is wrong and retrying with
/// other data will not help. Evaluation errors depend on the data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Malformed expression: unknown operator, wrong arity, invalid JSON
    #[error("Structural error: {0}")]
    Structural(#[from] ParseError),

    /// Well-formed expression that failed at runtime
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// Category of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The rule document is malformed
    Structural,
    /// The rule failed against the supplied data
    Evaluation,
    /// A questionnaire lookup failed
    Navigation,
    /// An answer could not be recorded
    Session,
    /// Input could not be read or decoded
    Input,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Evaluation => write!(f, "evaluation"),
            ErrorKind::Navigation => write!(f, "navigation"),
            ErrorKind::Session => write!(f, "session"),
            ErrorKind::Input => write!(f, "input"),
        }
    }
}

/// Serializable `{ kind, message }` description of a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl ErrorReport {
    /// Create a report
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl RuleError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleError::Structural(_) => ErrorKind::Structural,
            RuleError::Evaluation(_) => ErrorKind::Evaluation,
        }
    }

    /// Serializable report for callers outside the crate
    pub fn to_report(&self) -> ErrorReport {
        let message = match self {
            RuleError::Structural(err) => err.to_string(),
            RuleError::Evaluation(err) => err.to_string(),
        };
        ErrorReport {
            kind: self.kind(),
            message,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RuleError::Structural(err) => err.to_diagnostic(),
            RuleError::Evaluation(err) => err.to_diagnostic(),
        }
    }
}

impl From<&RuleError> for ErrorReport {
    fn from(error: &RuleError) -> Self {
        error.to_report()
    }
}

impl From<&NavigationError> for ErrorReport {
    fn from(error: &NavigationError) -> Self {
        Self::new(ErrorKind::Navigation, error.to_string())
    }
}

impl From<&SessionError> for ErrorReport {
    fn from(error: &SessionError) -> Self {
        Self::new(ErrorKind::Session, error.to_string())
    }
}
