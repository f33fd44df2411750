//! Data model for rule expressions, diagnoses and questionnaires
//!
//! This module provides the value model shared by expressions, data contexts
//! and operator results, the coercion rules that give loose comparisons their
//! meaning, and the documents the selector and navigator work over.

#![warn(missing_docs)]

pub mod diagnosis;
pub mod question;
pub mod rule;
pub mod type_coercion;
pub mod value;

pub use diagnosis::{Diagnosis, DiagnosisSeverity};
pub use question::{AnswerOption, Question, Questionnaire};
pub use rule::StoredRule;
pub use type_coercion::TypeCoercion;
pub use value::{Collection, NumberOutOfRange, ObjectMap, Value};
