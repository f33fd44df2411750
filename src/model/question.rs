//! Questionnaire graph: questions, their answer options and links between them

use crate::model::Value;
use crate::navigator::NavigationError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// One selectable answer to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    /// Identifier, unique within its question
    #[serde(alias = "_id")]
    pub id: String,
    /// Label shown to the user
    pub text: String,
    /// Value recorded in the answers when chosen
    #[serde(default)]
    pub value: Value,
    /// Question to continue with when this option is chosen
    #[serde(default, alias = "nextQuestionId", skip_serializing_if = "Option::is_none")]
    pub next_node_id: Option<String>,
    /// Free-form labels
    #[serde(default)]
    pub tags: IndexSet<String>,
}

impl AnswerOption {
    /// Create an option whose value is its text
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: id.into(),
            value: Value::string(text.clone()),
            text,
            next_node_id: None,
            tags: IndexSet::new(),
        }
    }

    /// Set the recorded value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Link to the question that follows this option
    pub fn leads_to(mut self, question_id: impl Into<String>) -> Self {
        self.next_node_id = Some(question_id.into());
        self
    }
}

/// A node of the questionnaire graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique within the questionnaire
    #[serde(alias = "_id")]
    pub id: String,
    /// Prompt shown to the user
    #[serde(alias = "questionText")]
    pub text: String,
    /// Grouping such as `hair-type` or `lifestyle`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Position in the default sequence
    #[serde(default)]
    pub order: i64,
    /// Inactive questions are never returned by navigation
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
    /// Where a new run starts
    #[serde(default, alias = "isFirstQuestion")]
    pub is_entry_point: bool,
    /// Labels used to find related questions for conditional branching
    #[serde(default)]
    pub tags: IndexSet<String>,
    /// Answer options in display order
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    /// Rule over the answers that enables tag-based branching
    #[serde(default, alias = "conditionalLogic", skip_serializing_if = "Option::is_none")]
    pub conditional_expression: Option<serde_json::Value>,
}

impl Question {
    /// Create an active question with no options
    pub fn new(id: impl Into<String>, text: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: None,
            order,
            active: true,
            is_entry_point: false,
            tags: IndexSet::new(),
            options: Vec::new(),
            conditional_expression: None,
        }
    }

    /// Add an answer option
    pub fn with_option(mut self, option: AnswerOption) -> Self {
        self.options.push(option);
        self
    }

    /// Add tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the branching condition
    pub fn with_condition(mut self, condition: serde_json::Value) -> Self {
        self.conditional_expression = Some(condition);
        self
    }

    /// Mark as the entry point
    pub fn entry_point(mut self) -> Self {
        self.is_entry_point = true;
        self
    }

    /// Mark inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Find an option by id
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    /// Whether the two questions share at least one tag
    pub fn shares_tag_with(&self, other: &Question) -> bool {
        !self.tags.is_disjoint(&other.tags)
    }
}

/// Ordered collection of questions
///
/// Accepts either a bare array of questions or `{"questions": [...]}` when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "QuestionnaireDocument")]
pub struct Questionnaire {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionnaireDocument {
    Bare(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

impl From<QuestionnaireDocument> for Questionnaire {
    fn from(document: QuestionnaireDocument) -> Self {
        match document {
            QuestionnaireDocument::Bare(questions)
            | QuestionnaireDocument::Wrapped { questions } => Self::new(questions),
        }
    }
}

impl Questionnaire {
    /// Create a questionnaire from questions in collection order
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// All questions in collection order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Find a question by id
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Active questions sorted by ascending order, ties kept in collection order
    pub fn active_in_order(&self) -> Vec<&Question> {
        let mut active: Vec<&Question> = self.questions.iter().filter(|q| q.active).collect();
        active.sort_by_key(|question| question.order);
        active
    }

    /// The active entry-point question, if one is flagged
    pub fn entry_point(&self) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.active && question.is_entry_point)
    }

    /// Make `id` the only entry point
    pub fn set_entry_point(&mut self, id: &str) -> Result<(), NavigationError> {
        if self.get(id).is_none() {
            return Err(NavigationError::QuestionNotFound { id: id.to_string() });
        }
        for question in &mut self.questions {
            question.is_entry_point = question.id == id;
        }
        Ok(())
    }

    /// Add a question at the end of the collection
    pub fn push(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether there are no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl FromIterator<Question> for Questionnaire {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
