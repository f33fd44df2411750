//! Rule engine - the main entry point for rule evaluation

use super::context::EvaluationContext;
use super::error::{EvaluationError, EvaluationResult};
use crate::ast::ExpressionNode;
use crate::config::EngineConfig;
use crate::error::RuleError;
use crate::model::Value;
use crate::parser::{ParseResult, parse_with_registry};
use crate::registry::{
    LazyEvaluationContext, LazyEvaluator, OperatorImpl, OperatorRegistry, standard_registry,
};
use std::sync::Arc;

/// Main engine for parsing and evaluating rule expressions
///
/// The engine holds no per-call state: cloning it is cheap and a single
/// instance can be shared between threads.
#[derive(Clone, Debug)]
pub struct RuleEngine {
    /// Operators available to parsed expressions
    registry: Arc<OperatorRegistry>,
    /// Evaluation limits
    config: EngineConfig,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Create an engine with the built-in operators
    pub fn new() -> Self {
        Self::with_registry(standard_registry())
    }

    /// Create an engine over a custom registry
    pub fn with_registry(registry: Arc<OperatorRegistry>) -> Self {
        Self {
            registry,
            config: EngineConfig::default(),
        }
    }

    /// Replace the engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Operators known to this engine
    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a rule document against this engine's registry
    pub fn parse(&self, document: &serde_json::Value) -> ParseResult<ExpressionNode> {
        parse_with_registry(document, &self.registry)
    }

    /// Evaluate a parsed expression against `data`
    pub fn evaluate(&self, expression: &ExpressionNode, data: &Value) -> EvaluationResult<Value> {
        self.evaluate_node(expression, &EvaluationContext::new(data), 0)
    }

    /// Parse and evaluate a rule document in one step
    pub fn evaluate_rule(&self, rule: &serde_json::Value, data: &Value) -> Result<Value, RuleError> {
        let expression = self.parse(rule)?;
        Ok(self.evaluate(&expression, data)?)
    }

    /// Parse and evaluate with both rule and data in JSON form
    ///
    /// Data holding a number beyond the decimal range is an evaluation
    /// error; the rule is still checked first.
    pub fn evaluate_json(
        &self,
        rule: &serde_json::Value,
        data: &serde_json::Value,
    ) -> Result<Value, RuleError> {
        let expression = self.parse(rule)?;
        let data = Value::from_json(data).map_err(EvaluationError::from)?;
        Ok(self.evaluate(&expression, &data)?)
    }

    /// Whether a rule document evaluates truthy against `data`
    pub fn matches(&self, rule: &serde_json::Value, data: &Value) -> Result<bool, RuleError> {
        self.evaluate_rule(rule, data).map(|value| value.is_truthy())
    }

    fn evaluate_node(
        &self,
        node: &ExpressionNode,
        context: &EvaluationContext<'_>,
        depth: usize,
    ) -> EvaluationResult<Value> {
        if depth > self.config.max_evaluation_depth {
            return Err(EvaluationError::DepthExceeded {
                limit: self.config.max_evaluation_depth,
            });
        }

        match node {
            ExpressionNode::Literal(value) => Ok(value.clone()),
            ExpressionNode::Array(items) => items
                .iter()
                .map(|item| self.evaluate_node(item, context, depth + 1))
                .collect::<EvaluationResult<Vec<_>>>()
                .map(Value::array),
            ExpressionNode::Operation {
                operator,
                arguments,
            } => {
                let implementation = self.registry.get(operator).ok_or_else(|| {
                    EvaluationError::UnregisteredOperator {
                        operator: operator.clone(),
                    }
                })?;

                // Trees built by hand skip the parser's arity check
                let signature = implementation.signature();
                if !signature.accepts(arguments.len()) {
                    return Err(EvaluationError::InvalidArity {
                        operator: operator.clone(),
                        expected: signature.to_string(),
                        actual: arguments.len(),
                    });
                }

                match implementation {
                    OperatorImpl::Eager(op) => {
                        let args = arguments
                            .iter()
                            .map(|arg| self.evaluate_node(arg, context, depth + 1))
                            .collect::<EvaluationResult<Vec<_>>>()?;
                        Ok(op.evaluate(&args, context)?)
                    }
                    OperatorImpl::Lazy(op) => {
                        let evaluator: &LazyEvaluator<'_> =
                            &|node, scope| self.evaluate_node(node, scope, depth + 1);
                        let lazy_context = LazyEvaluationContext { context, evaluator };
                        op.evaluate_lazy(arguments, &lazy_context)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OperatorSignature;
    use serde_json::json;

    #[test]
    fn literal_documents_evaluate_to_themselves() {
        let engine = RuleEngine::new();
        assert_eq!(
            engine.evaluate_json(&json!("hello"), &json!({})).unwrap(),
            Value::from("hello")
        );
        assert_eq!(
            engine.evaluate_json(&json!({"a": 1, "b": 2}), &json!({})).unwrap(),
            Value::try_from(json!({"a": 1, "b": 2})).unwrap()
        );
    }

    #[test]
    fn array_elements_are_evaluated() {
        let engine = RuleEngine::new();
        let result = engine
            .evaluate_json(&json!([{"var": "a"}, 2]), &json!({"a": 1}))
            .unwrap();
        assert_eq!(result, Value::try_from(json!([1, 2])).unwrap());
    }

    #[test]
    fn depth_limit_stops_runaway_nesting() {
        let engine = RuleEngine::new().with_config(EngineConfig::default().with_max_depth(3));
        let rule = json!({"!": {"!": {"!": {"!": {"!": true}}}}});
        let error = engine.evaluate_json(&rule, &json!({})).unwrap_err();
        assert!(matches!(
            error,
            RuleError::Evaluation(EvaluationError::DepthExceeded { limit: 3 })
        ));
    }

    #[test]
    fn unregistered_operator_in_foreign_tree() {
        let engine = RuleEngine::with_registry(Arc::new(OperatorRegistry::new()));
        let tree = ExpressionNode::operation("var", vec![ExpressionNode::literal("a")]);
        assert!(matches!(
            engine.evaluate(&tree, &Value::Null),
            Err(EvaluationError::UnregisteredOperator { .. })
        ));
    }

    #[test]
    fn hand_built_tree_with_wrong_arity() {
        let tree = ExpressionNode::operation("==", vec![ExpressionNode::literal(1_i64)]);
        assert_eq!(
            RuleEngine::new().evaluate(&tree, &Value::Null),
            Err(EvaluationError::InvalidArity {
                operator: "==".to_string(),
                expected: OperatorSignature::exact(2).to_string(),
                actual: 1,
            })
        );
    }

    #[test]
    fn oversized_number_in_data() {
        let engine = RuleEngine::new();
        let error = engine
            .evaluate_json(&json!({">": [{"var": "x"}, 5]}), &json!({"x": 1e30}))
            .unwrap_err();
        assert!(matches!(
            error,
            RuleError::Evaluation(EvaluationError::NumberOutOfRange(_))
        ));

        let tiny = engine
            .evaluate_json(&json!({"==": [{"var": "x"}, 0]}), &json!({"x": 1e-30}))
            .unwrap();
        assert_eq!(tiny, Value::Boolean(true));
    }
}
