//! Structural errors found while parsing rule documents

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// A rule document that cannot become an expression tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Operator name missing from the registry
    #[error("Unknown operator '{operator}' at {path}")]
    UnknownOperator {
        /// Operator name as written
        operator: String,
        /// Location of the operation inside the document
        path: String,
        /// Closest registered operator name
        suggestion: Option<String>,
    },

    /// Operator given the wrong number of arguments
    #[error("Operator '{operator}' at {path} expects {expected} arguments, got {actual}")]
    InvalidArity {
        /// Operator name
        operator: String,
        /// Accepted argument counts
        expected: String,
        /// Arguments supplied
        actual: usize,
        /// Location of the operation inside the document
        path: String,
    },

    /// Literal number beyond the decimal range
    #[error("Number {number} at {path} is outside the supported numeric range")]
    NumberOutOfRange {
        /// The number as written
        number: String,
        /// Location of the literal inside the document
        path: String,
    },

    /// Rule text is not valid JSON
    #[error("Invalid rule document: {message}")]
    InvalidDocument {
        /// Decoder message
        message: String,
    },
}

impl ParseError {
    /// Location inside the rule document, when known
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::UnknownOperator { path, .. }
            | ParseError::InvalidArity { path, .. }
            | ParseError::NumberOutOfRange { path, .. } => Some(path),
            ParseError::InvalidDocument { .. } => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let builder = match self {
            ParseError::UnknownOperator {
                operator,
                suggestion,
                ..
            } => {
                let builder = DiagnosticBuilder::unknown_operator(operator);
                match suggestion {
                    Some(suggestion) => builder.suggest(suggestion.clone()),
                    None => builder,
                }
            }
            ParseError::InvalidArity { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::InvalidArity).with_message(self.to_string())
            }
            ParseError::NumberOutOfRange { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::NumberOutOfRange)
                    .with_message(self.to_string())
            }
            ParseError::InvalidDocument { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::InvalidDocument)
                    .with_message(self.to_string())
            }
        };

        match self.path() {
            Some(path) => builder.with_location(path).build(),
            None => builder.build(),
        }
    }
}
