//! Named rules kept by a host for later evaluation

use crate::ast::ExpressionNode;
use crate::error::RuleError;
use crate::evaluator::RuleEngine;
use crate::model::Value;
use crate::parser::ParseResult;
use serde::{Deserialize, Serialize};

/// A persisted rule document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRule {
    /// Identifier assigned by the owning store
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// What the rule decides
    #[serde(default)]
    pub description: String,
    /// Rule document
    pub rule: serde_json::Value,
}

impl StoredRule {
    /// Create a rule with an empty description
    pub fn new(name: impl Into<String>, rule: serde_json::Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            rule,
        }
    }

    /// Check the rule document without evaluating it
    pub fn validate(&self, engine: &RuleEngine) -> ParseResult<ExpressionNode> {
        engine.parse(&self.rule)
    }

    /// Evaluate the rule against `data`
    pub fn evaluate(&self, engine: &RuleEngine, data: &Value) -> Result<Value, RuleError> {
        engine.evaluate_rule(&self.rule, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_rule_evaluates_against_data() {
        let rule: StoredRule = serde_json::from_value(json!({
            "name": "adult",
            "description": "Age at least 18",
            "rule": {">=": [{"var": "age"}, 18]}
        }))
        .unwrap();
        let engine = RuleEngine::new();

        assert!(rule.validate(&engine).is_ok());
        let data = Value::try_from(json!({"age": 21})).unwrap();
        assert_eq!(rule.evaluate(&engine, &data).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn invalid_rule_fails_validation() {
        let rule = StoredRule::new("broken", json!({"nope": [1]}));
        assert!(rule.validate(&RuleEngine::new()).is_err());
    }
}
