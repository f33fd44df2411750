//! JSON rule expressions with diagnosis selection and questionnaire navigation
//!
//! Rules are JSON documents in the json-logic style: `{"operator": [args]}`.
//! They are parsed once into an [`ExpressionNode`] tree, checked against an
//! [`OperatorRegistry`], and evaluated against a data context. On top of
//! the evaluator sit two decision components:
//!
//! - [`DiagnosisSelector`] picks the highest-priority diagnosis whose
//!   condition holds for a set of answers.
//! - [`QuestionNavigator`] decides which question follows an answer.
//!
//! ```
//! use decision_logic::{RuleEngine, Value};
//! use serde_json::json;
//!
//! let engine = RuleEngine::new();
//! let rule = json!({"and": [{">": [{"var": "age"}, 18]}, {"in": ["oily", {"var": "scalp"}]}]});
//! let data = json!({"age": 30, "scalp": "oily, flaky"});
//! assert_eq!(engine.evaluate_json(&rule, &data).unwrap(), Value::Boolean(true));
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod navigator;
pub mod parser;
pub mod registry;
pub mod selector;
pub mod session;

// Re-export main types
pub use ast::ExpressionNode;
pub use config::{DEFAULT_FALLBACK_DIAGNOSIS, EngineConfig, SelectorConfig};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use error::{ErrorKind, ErrorReport, Result, RuleError};
pub use evaluator::{EvaluationContext, EvaluationError, RuleEngine};
pub use model::{
    AnswerOption, Diagnosis, DiagnosisSeverity, Question, Questionnaire, StoredRule, Value,
};
pub use navigator::{NavigationError, QuestionNavigator, Resolution, Tier};
pub use parser::{ParseError, parse_expression as parse, parse_str};
pub use registry::{OperatorRegistry, standard_registry};
pub use selector::{DiagnosisSelector, Selection, SelectionOutcome};
pub use session::{AnswerSession, RecordedAnswer, SessionError};
