//! Answer collection for one questionnaire run

use crate::model::{Diagnosis, ObjectMap, Question, Value};
use crate::selector::{DiagnosisSelector, Selection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from recording answers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session already produced its diagnosis
    #[error("Session '{session}' is already completed")]
    AlreadyCompleted {
        /// Session id
        session: String,
    },

    /// The chosen option does not belong to the question
    #[error("Question '{question}' has no option '{option}'")]
    UnknownOption {
        /// Question id
        question: String,
        /// Option id as supplied
        option: String,
    },

    /// Neither an option nor a free-form value was supplied
    #[error("No answer given for question '{question}'")]
    MissingAnswer {
        /// Question id
        question: String,
    },
}

/// One answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedAnswer {
    /// Question id
    pub question_id: String,
    /// Question prompt at the time of answering
    pub question_text: String,
    /// Chosen option, if the answer came from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    /// Label of the chosen option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_text: Option<String>,
    /// Recorded value
    pub answer_value: Value,
}

/// Answers given during one run through a questionnaire
///
/// Besides the answer list the session keeps a flattened context in which
/// each answer is stored under its question id and, when given through an
/// option, under the option id. Rules written against a questionnaire read
/// that context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSession {
    id: String,
    answers: Vec<RecordedAnswer>,
    all_answers: ObjectMap,
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diagnosis: Option<String>,
}

impl AnswerSession {
    /// Start an empty session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answers: Vec::new(),
            all_answers: ObjectMap::new(),
            completed: false,
            diagnosis: None,
        }
    }

    /// Session id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Answers in the order their questions were first answered
    pub fn recorded(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    /// Flattened answers keyed by question id and option id
    pub fn answers(&self) -> &ObjectMap {
        &self.all_answers
    }

    /// Flattened answers as an evaluation context
    pub fn context(&self) -> Value {
        Value::Object(self.all_answers.clone())
    }

    /// Whether [`complete`](Self::complete) has run
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Label of the diagnosis chosen on completion
    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis.as_deref()
    }

    /// Record an answer to `question`
    ///
    /// With an option the option's value is recorded and `answer_value` is
    /// ignored. Answering a question again replaces the earlier answer and
    /// drops the earlier option's entry from the context.
    pub fn record(
        &mut self,
        question: &Question,
        selected_option_id: Option<&str>,
        answer_value: Option<Value>,
    ) -> Result<&RecordedAnswer, SessionError> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted {
                session: self.id.clone(),
            });
        }

        let option = match selected_option_id {
            Some(option_id) => Some(question.option(option_id).ok_or_else(|| {
                SessionError::UnknownOption {
                    question: question.id.clone(),
                    option: option_id.to_string(),
                }
            })?),
            None => None,
        };

        let value = match (option, answer_value) {
            (Some(option), _) => option.value.clone(),
            (None, Some(value)) => value,
            (None, None) => {
                return Err(SessionError::MissingAnswer {
                    question: question.id.clone(),
                });
            }
        };

        let answer = RecordedAnswer {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            selected_option_id: option.map(|option| option.id.clone()),
            selected_option_text: option.map(|option| option.text.clone()),
            answer_value: value.clone(),
        };

        let index = match self
            .answers
            .iter()
            .position(|existing| existing.question_id == question.id)
        {
            Some(index) => {
                let previous = std::mem::replace(&mut self.answers[index], answer);
                if let Some(stale) = previous.selected_option_id {
                    self.release_option_key(stale);
                }
                index
            }
            None => {
                self.answers.push(answer);
                self.answers.len() - 1
            }
        };

        if let Some(option) = option {
            self.all_answers.insert(option.id.clone(), value.clone());
        }
        self.all_answers.insert(question.id.clone(), value);

        log::debug!("Session '{}' recorded an answer to '{}'", self.id, question.id);
        Ok(&self.answers[index])
    }

    /// Option ids are only unique within a question, so another answer may
    /// still own the key. It then goes back to that answer's value.
    fn release_option_key(&mut self, option_id: String) {
        let owner = self
            .answers
            .iter()
            .rev()
            .find(|answer| answer.selected_option_id.as_deref() == Some(option_id.as_str()))
            .map(|answer| answer.answer_value.clone());
        match owner {
            Some(value) => {
                self.all_answers.insert(option_id, value);
            }
            None => {
                self.all_answers.shift_remove(&option_id);
            }
        }
    }

    /// Choose a diagnosis for the collected answers and close the session
    pub fn complete<'a>(
        &mut self,
        selector: &DiagnosisSelector,
        candidates: &'a [Diagnosis],
    ) -> Result<Selection<'a>, SessionError> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted {
                session: self.id.clone(),
            });
        }

        let selection = selector.select(candidates, &self.context());
        self.completed = true;
        self.diagnosis = selection.diagnosis().map(|d| d.label().to_string());
        log::debug!(
            "Session '{}' completed with {} answers",
            self.id,
            self.answers.len()
        );
        Ok(selection)
    }
}
