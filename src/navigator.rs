//! Next-question resolution over a questionnaire graph
//!
//! Three tiers are tried in order and the first that yields a question wins:
//!
//! 1. the `next_node_id` link of the chosen option,
//! 2. tag-related questions, when the current question's conditional
//!    expression holds against the answers,
//! 3. the next active question by `order`.
//!
//! Broken links and failing conditions fall through to the next tier with a
//! log record. Only an unknown current question is an error.

use crate::diagnostics::{Diagnostic, DiagnosticBuilder};
use crate::evaluator::RuleEngine;
use crate::model::{Question, Questionnaire, Value};
use serde::Serialize;
use thiserror::Error;

/// Errors from questionnaire navigation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The question navigation started from does not exist
    #[error("Question '{id}' not found")]
    QuestionNotFound {
        /// Requested question id
        id: String,
    },
}

impl NavigationError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            NavigationError::QuestionNotFound { id } => {
                DiagnosticBuilder::dangling_reference("question", id)
                    .with_subject(id.clone())
                    .build()
            }
        }
    }
}

/// Which rule picked the next question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// The chosen option linked to it
    ExplicitLink,
    /// The current question's condition held and the tags overlap
    ConditionalBranch,
    /// It is next by order
    OrderFallback,
}

/// Next question together with the tier that chose it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution<'a> {
    /// The next question
    pub question: &'a Question,
    /// How it was chosen
    pub tier: Tier,
}

/// Resolves which question follows an answer
#[derive(Debug, Clone, Default)]
pub struct QuestionNavigator {
    engine: RuleEngine,
}

impl QuestionNavigator {
    /// Create a navigator with the built-in operators
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate conditional expressions with `engine`
    pub fn with_engine(engine: RuleEngine) -> Self {
        Self { engine }
    }

    /// First question of a run
    ///
    /// The active entry point when one is flagged, otherwise the active
    /// question with the lowest order.
    pub fn first_question<'a>(&self, questionnaire: &'a Questionnaire) -> Option<&'a Question> {
        questionnaire.entry_point().or_else(|| {
            log::debug!("No active entry point, starting at the lowest order");
            questionnaire.active_in_order().into_iter().next()
        })
    }

    /// Next question after answering `current_id`, `None` at the end
    pub fn resolve_next<'a>(
        &self,
        questionnaire: &'a Questionnaire,
        current_id: &str,
        selected_option_id: Option<&str>,
        answers: &Value,
    ) -> Result<Option<&'a Question>, NavigationError> {
        self.resolve(questionnaire, current_id, selected_option_id, answers)
            .map(|resolution| resolution.map(|r| r.question))
    }

    /// Like [`resolve_next`](Self::resolve_next), also reporting the tier used
    pub fn resolve<'a>(
        &self,
        questionnaire: &'a Questionnaire,
        current_id: &str,
        selected_option_id: Option<&str>,
        answers: &Value,
    ) -> Result<Option<Resolution<'a>>, NavigationError> {
        let current =
            questionnaire
                .get(current_id)
                .ok_or_else(|| NavigationError::QuestionNotFound {
                    id: current_id.to_string(),
                })?;

        let resolution = self
            .explicit_link(questionnaire, current, selected_option_id)
            .map(|question| (question, Tier::ExplicitLink))
            .or_else(|| {
                self.conditional_branch(questionnaire, current, answers)
                    .map(|question| (question, Tier::ConditionalBranch))
            })
            .or_else(|| {
                Self::order_fallback(questionnaire, current)
                    .map(|question| (question, Tier::OrderFallback))
            })
            .map(|(question, tier)| {
                log::debug!("Next after '{}' is '{}' via {tier:?}", current.id, question.id);
                Resolution { question, tier }
            });

        if resolution.is_none() {
            log::debug!("Question '{}' is the last one", current.id);
        }
        Ok(resolution)
    }

    fn explicit_link<'a>(
        &self,
        questionnaire: &'a Questionnaire,
        current: &Question,
        selected_option_id: Option<&str>,
    ) -> Option<&'a Question> {
        let option_id = selected_option_id?;
        let Some(option) = current.option(option_id) else {
            log::debug!("Option '{option_id}' is not on question '{}'", current.id);
            return None;
        };
        let target_id = option.next_node_id.as_deref()?;

        match questionnaire.get(target_id) {
            Some(target) if target.active => Some(target),
            Some(_) => {
                log::debug!("Option '{option_id}' links to inactive question '{target_id}'");
                None
            }
            None => {
                log::warn!("Option '{option_id}' links to missing question '{target_id}'");
                None
            }
        }
    }

    fn conditional_branch<'a>(
        &self,
        questionnaire: &'a Questionnaire,
        current: &Question,
        answers: &Value,
    ) -> Option<&'a Question> {
        let condition = current.conditional_expression.as_ref()?;
        match self.engine.matches(condition, answers) {
            Ok(true) => questionnaire
                .active_in_order()
                .into_iter()
                .find(|candidate| candidate.id != current.id && candidate.shares_tag_with(current)),
            Ok(false) => None,
            Err(error) => {
                log::warn!("Condition on question '{}' failed: {error}", current.id);
                None
            }
        }
    }

    fn order_fallback<'a>(
        questionnaire: &'a Questionnaire,
        current: &Question,
    ) -> Option<&'a Question> {
        questionnaire
            .active_in_order()
            .into_iter()
            .find(|candidate| candidate.id != current.id && candidate.order >= current.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;
    use serde_json::json;

    fn questionnaire() -> Questionnaire {
        Questionnaire::new(vec![
            Question::new("q1", "Hair type?", 1)
                .with_tags(["hair"])
                .with_option(AnswerOption::new("curly", "Curly").leads_to("q3"))
                .with_option(AnswerOption::new("straight", "Straight"))
                .with_condition(json!({"==": [{"var": "q1"}, "Straight"]})),
            Question::new("q2", "Scalp?", 2),
            Question::new("q3", "Curl pattern?", 3).with_tags(["hair"]),
        ])
    }

    #[test]
    fn tiers_are_reported() {
        let navigator = QuestionNavigator::new();
        let questionnaire = questionnaire();

        let link = navigator
            .resolve(&questionnaire, "q1", Some("curly"), &Value::Null)
            .unwrap()
            .unwrap();
        assert_eq!((link.question.id.as_str(), link.tier), ("q3", Tier::ExplicitLink));

        let answers = Value::try_from(json!({"q1": "Straight"})).unwrap();
        let branch = navigator
            .resolve(&questionnaire, "q1", Some("straight"), &answers)
            .unwrap()
            .unwrap();
        assert_eq!(
            (branch.question.id.as_str(), branch.tier),
            ("q3", Tier::ConditionalBranch)
        );

        let fallback = navigator
            .resolve(&questionnaire, "q1", None, &Value::Null)
            .unwrap()
            .unwrap();
        assert_eq!(
            (fallback.question.id.as_str(), fallback.tier),
            ("q2", Tier::OrderFallback)
        );
    }

    #[test]
    fn unknown_current_question_is_an_error() {
        let binding = questionnaire();
        let result = QuestionNavigator::new().resolve_next(&binding, "nope", None, &Value::Null);
        assert_eq!(
            result,
            Err(NavigationError::QuestionNotFound {
                id: "nope".to_string()
            })
        );
    }
}
