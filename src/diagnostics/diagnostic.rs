//! Core diagnostic types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hint - subtle suggestion for improvement
    Hint,
    /// Information - provides helpful information
    #[default]
    Info,
    /// Warning - a rule was skipped but the overall decision went ahead
    Warning,
    /// Error - prevents successful evaluation
    Error,
}

/// Diagnostic error codes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Structural errors
    /// Operator name not in the registry
    UnknownOperator,
    /// Wrong number of arguments
    InvalidArity,
    /// Rule text is not a JSON document
    InvalidDocument,
    /// Number outside the decimal range
    NumberOutOfRange,

    // Runtime errors
    /// Operand types the operator cannot combine
    InvalidOperandTypes,
    /// Operand without a numeric reading
    NonNumericOperand,
    /// Argument value unusable for the operator
    InvalidArgument,
    /// Division by zero
    DivisionByZero,
    /// Arithmetic overflow
    ArithmeticOverflow,
    /// Expression nested deeper than the configured limit
    DepthExceeded,

    // Lookup errors
    /// Referenced question or option does not exist
    DanglingReference,
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Pointer into the rule document, `/and/1/var` style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Rule, diagnosis or question the diagnostic is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Suggested replacement text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            subject: None,
            suggestion: None,
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Get the diagnostic code as a string
    pub fn code_string(&self) -> String {
        match &self.code {
            DiagnosticCode::UnknownOperator => "E001".to_string(),
            DiagnosticCode::InvalidArity => "E002".to_string(),
            DiagnosticCode::InvalidDocument => "E003".to_string(),
            DiagnosticCode::NumberOutOfRange => "E004".to_string(),
            DiagnosticCode::InvalidOperandTypes => "E100".to_string(),
            DiagnosticCode::NonNumericOperand => "E101".to_string(),
            DiagnosticCode::InvalidArgument => "E102".to_string(),
            DiagnosticCode::DivisionByZero => "E200".to_string(),
            DiagnosticCode::ArithmeticOverflow => "E201".to_string(),
            DiagnosticCode::DepthExceeded => "E202".to_string(),
            DiagnosticCode::DanglingReference => "E300".to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code_string(), self.message)
    }
}
