//! Priority-ordered diagnosis selection
//!
//! Candidates are tried from the highest priority down and the first whose
//! condition holds against the answers wins. A candidate whose condition is
//! malformed or fails to evaluate is skipped, never fatal: the failure is
//! logged and returned as a [`Diagnostic`] so hosts can count it.

use crate::config::SelectorConfig;
use crate::diagnostics::Diagnostic;
use crate::error::RuleError;
use crate::evaluator::RuleEngine;
use crate::model::{Diagnosis, Value};
use serde::Serialize;
use std::cmp::Reverse;

/// How a selection ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "diagnosis", rename_all = "camelCase")]
pub enum SelectionOutcome<'a> {
    /// A candidate's condition held
    Matched(&'a Diagnosis),
    /// Nothing matched and the configured fallback candidate was found
    Fallback(&'a Diagnosis),
    /// Nothing matched and there is no fallback
    NotFound,
}

/// Result of [`DiagnosisSelector::select`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection<'a> {
    /// Chosen diagnosis, if any
    #[serde(flatten)]
    pub outcome: SelectionOutcome<'a>,
    /// One entry per candidate skipped because its condition failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Selection<'a> {
    /// The chosen diagnosis, matched or fallback
    pub fn diagnosis(&self) -> Option<&'a Diagnosis> {
        match self.outcome {
            SelectionOutcome::Matched(diagnosis) | SelectionOutcome::Fallback(diagnosis) => {
                Some(diagnosis)
            }
            SelectionOutcome::NotFound => None,
        }
    }

    /// Whether a condition actually matched
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, SelectionOutcome::Matched(_))
    }

    /// Whether the fallback was used
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, SelectionOutcome::Fallback(_))
    }
}

/// Chooses one diagnosis for a set of answers
#[derive(Debug, Clone, Default)]
pub struct DiagnosisSelector {
    engine: RuleEngine,
    config: SelectorConfig,
}

impl DiagnosisSelector {
    /// Create a selector with the built-in operators and default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate conditions with `engine`
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the selection settings
    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Current settings
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select the diagnosis for `answers`
    ///
    /// Candidates of equal priority are tried in slice order.
    pub fn select<'a>(&self, candidates: &'a [Diagnosis], answers: &Value) -> Selection<'a> {
        let mut eligible: Vec<&Diagnosis> = candidates
            .iter()
            .filter(|diagnosis| diagnosis.active || !self.config.skip_inactive)
            .collect();
        eligible.sort_by_key(|diagnosis| Reverse(diagnosis.priority));

        let mut diagnostics = Vec::new();
        for &diagnosis in &eligible {
            match self.engine.matches(&diagnosis.condition, answers) {
                Ok(true) => {
                    log::debug!(
                        "Diagnosis '{}' matched at priority {}",
                        diagnosis.label(),
                        diagnosis.priority
                    );
                    return Selection {
                        outcome: SelectionOutcome::Matched(diagnosis),
                        diagnostics,
                    };
                }
                Ok(false) => {}
                Err(error) => {
                    log::warn!("Skipping diagnosis '{}': {error}", diagnosis.label());
                    diagnostics.push(skipped(diagnosis, &error));
                }
            }
        }

        let fallback = self.config.fallback_name.as_deref().and_then(|name| {
            eligible
                .iter()
                .copied()
                .find(|diagnosis| diagnosis.name == name)
        });
        let outcome = match fallback {
            Some(diagnosis) => {
                log::debug!("No diagnosis matched, using fallback '{}'", diagnosis.name);
                SelectionOutcome::Fallback(diagnosis)
            }
            None => {
                log::debug!("No diagnosis matched and no fallback is available");
                SelectionOutcome::NotFound
            }
        };

        Selection {
            outcome,
            diagnostics,
        }
    }
}

fn skipped(diagnosis: &Diagnosis, error: &RuleError) -> Diagnostic {
    let mut diagnostic = error.to_diagnostic();
    diagnostic.subject = Some(diagnosis.label().to_string());
    diagnostic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use serde_json::json;

    #[test]
    fn failing_condition_is_reported_and_skipped() {
        let candidates = vec![
            Diagnosis::new("Broken", json!({"/": [1, 0]}), 10).with_id("d-broken"),
            Diagnosis::new("Works", json!(true), 1),
        ];
        let selection = DiagnosisSelector::new().select(&candidates, &Value::Null);

        assert_eq!(selection.diagnosis().map(|d| d.name.as_str()), Some("Works"));
        assert_eq!(selection.diagnostics.len(), 1);
        assert_eq!(selection.diagnostics[0].code, DiagnosticCode::DivisionByZero);
        assert_eq!(selection.diagnostics[0].subject.as_deref(), Some("d-broken"));
    }

    #[test]
    fn serializes_with_status_tag() {
        let candidates = vec![Diagnosis::new("Only", json!(true), 0)];
        let selection = DiagnosisSelector::new().select(&candidates, &Value::Null);
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["status"], "matched");
        assert_eq!(json["diagnosis"]["name"], "Only");

        let none = DiagnosisSelector::new().select(&[], &Value::Null);
        assert_eq!(serde_json::to_value(&none).unwrap(), json!({"status": "notFound"}));
    }
}
