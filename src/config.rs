//! Configuration for the rule engine and diagnosis selection

use serde::{Deserialize, Serialize};

/// Name of the diagnosis returned when no condition matches
pub const DEFAULT_FALLBACK_DIAGNOSIS: &str = "General Hair Care";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum nesting depth before evaluation is abandoned
    pub max_evaluation_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_evaluation_depth: 128,
        }
    }
}

impl EngineConfig {
    /// Create a new engine configuration with custom settings
    pub fn new(max_evaluation_depth: usize) -> Self {
        Self {
            max_evaluation_depth,
        }
    }

    /// Set the maximum evaluation depth
    pub fn with_max_depth(mut self, max_evaluation_depth: usize) -> Self {
        self.max_evaluation_depth = max_evaluation_depth;
        self
    }
}

/// Diagnosis selection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorConfig {
    /// Name of the candidate returned when nothing matches
    pub fallback_name: Option<String>,
    /// Whether candidates flagged inactive are ignored
    pub skip_inactive: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            fallback_name: Some(DEFAULT_FALLBACK_DIAGNOSIS.to_string()),
            skip_inactive: true,
        }
    }
}

impl SelectorConfig {
    /// Use `name` as the fallback candidate
    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_name = Some(name.into());
        self
    }

    /// Report not-found instead of falling back
    pub fn without_fallback(mut self) -> Self {
        self.fallback_name = None;
        self
    }

    /// Consider inactive candidates as well
    pub fn including_inactive(mut self) -> Self {
        self.skip_inactive = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(EngineConfig::default().max_evaluation_depth, 128);
        let selector = SelectorConfig::default();
        assert_eq!(selector.fallback_name.as_deref(), Some("General Hair Care"));
        assert!(selector.skip_inactive);
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let config: SelectorConfig = serde_json::from_str(r#"{"skipInactive": false}"#).unwrap();
        assert_eq!(config.fallback_name.as_deref(), Some(DEFAULT_FALLBACK_DIAGNOSIS));
        assert!(!config.skip_inactive);
    }
}
