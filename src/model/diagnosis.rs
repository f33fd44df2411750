//! Diagnosis templates matched against collected answers

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnosis is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisSeverity {
    /// Cosmetic or informational
    Low,
    /// Worth acting on
    #[default]
    Medium,
    /// Needs prompt attention
    High,
    /// Needs professional attention
    Critical,
}

impl fmt::Display for DiagnosisSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosisSeverity::Low => write!(f, "low"),
            DiagnosisSeverity::Medium => write!(f, "medium"),
            DiagnosisSeverity::High => write!(f, "high"),
            DiagnosisSeverity::Critical => write!(f, "critical"),
        }
    }
}

fn default_category() -> String {
    "general".to_string()
}

fn default_active() -> bool {
    true
}

/// A diagnosis template: a condition over answers plus the advice it carries
///
/// The condition is kept in document form and parsed when a selection runs,
/// so one malformed condition only disqualifies its own diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// Identifier assigned by the owning store
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name, also used to find the fallback diagnosis
    pub name: String,
    /// Longer explanation shown with the result
    #[serde(default)]
    pub description: String,
    /// Grouping such as `hair-care` or `lifestyle`
    #[serde(default = "default_category")]
    pub category: String,
    /// Rule document that must evaluate truthy for this diagnosis to match
    #[serde(alias = "conditions")]
    pub condition: serde_json::Value,
    /// Advice to show when matched
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Suggested product names or ids
    #[serde(default)]
    pub products: Vec<String>,
    /// Severity of the condition described
    #[serde(default)]
    pub severity: DiagnosisSeverity,
    /// Higher priorities are tried first
    #[serde(default)]
    pub priority: i64,
    /// Inactive diagnoses are skipped by selection
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
    /// Free-form host data
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Diagnosis {
    /// Create an active diagnosis with default presentation fields
    pub fn new(name: impl Into<String>, condition: serde_json::Value, priority: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            category: default_category(),
            condition,
            recommendations: Vec::new(),
            products: Vec::new(),
            severity: DiagnosisSeverity::default(),
            priority,
            active: true,
            metadata: serde_json::Map::new(),
        }
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark the diagnosis inactive
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Add a recommendation
    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }

    /// Label used in logs and diagnostics
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}
