//! Rule document parser
//!
//! Converts the JSON document form of a rule into an [`ExpressionNode`]
//! tree. Operator names and argument counts are checked here, against the
//! registry that will later evaluate the tree, so a misspelt operator fails
//! before any data is looked at.

#![warn(missing_docs)]

pub mod error;

pub use error::{ParseError, ParseResult};

use crate::ast::ExpressionNode;
use crate::model::Value;
use crate::registry::{OperatorRegistry, standard_registry};
use serde_json::Value as JsonValue;

/// Parse a rule document against the built-in operators
pub fn parse_expression(document: &JsonValue) -> ParseResult<ExpressionNode> {
    parse_with_registry(document, &standard_registry())
}

/// Parse rule text against the built-in operators
pub fn parse_str(text: &str) -> ParseResult<ExpressionNode> {
    let document: JsonValue =
        serde_json::from_str(text).map_err(|e| ParseError::InvalidDocument {
            message: e.to_string(),
        })?;
    parse_expression(&document)
}

/// Parse a rule document against a specific registry
pub fn parse_with_registry(
    document: &JsonValue,
    registry: &OperatorRegistry,
) -> ParseResult<ExpressionNode> {
    Parser { registry }.parse_node(document, "")
}

struct Parser<'a> {
    registry: &'a OperatorRegistry,
}

impl Parser<'_> {
    fn parse_node(&self, document: &JsonValue, path: &str) -> ParseResult<ExpressionNode> {
        match document {
            JsonValue::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((operator, arguments)) => self.parse_operation(operator, arguments, path),
                None => literal(document, path),
            },
            JsonValue::Array(items) => {
                let nodes = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.parse_node(item, &format!("{path}/{index}")))
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(fold_constant_array(nodes))
            }
            other => literal(other, path),
        }
    }

    fn parse_operation(
        &self,
        operator: &str,
        arguments: &JsonValue,
        path: &str,
    ) -> ParseResult<ExpressionNode> {
        let path = format!("{path}/{}", escape_pointer(operator));

        let Some(implementation) = self.registry.get(operator) else {
            return Err(ParseError::UnknownOperator {
                operator: operator.to_string(),
                suggestion: self.registry.suggest(operator).map(str::to_string),
                path,
            });
        };

        // A bare argument is shorthand for a one-element list
        let arguments = match arguments {
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.parse_node(item, &format!("{path}/{index}")))
                .collect::<ParseResult<Vec<_>>>()?,
            single => vec![self.parse_node(single, &format!("{path}/0"))?],
        };

        let signature = implementation.signature();
        if !signature.accepts(arguments.len()) {
            return Err(ParseError::InvalidArity {
                operator: operator.to_string(),
                expected: signature.to_string(),
                actual: arguments.len(),
                path,
            });
        }

        Ok(ExpressionNode::operation(operator, arguments))
    }
}

fn literal(document: &JsonValue, path: &str) -> ParseResult<ExpressionNode> {
    Value::from_json(document)
        .map(ExpressionNode::Literal)
        .map_err(|error| ParseError::NumberOutOfRange {
            number: error.number,
            path: path.to_string(),
        })
}

fn fold_constant_array(nodes: Vec<ExpressionNode>) -> ExpressionNode {
    if !nodes.iter().all(|node| matches!(node, ExpressionNode::Literal(_))) {
        return ExpressionNode::Array(nodes);
    }
    let values = nodes
        .into_iter()
        .filter_map(|node| match node {
            ExpressionNode::Literal(value) => Some(value),
            _ => None,
        })
        .collect::<Vec<_>>();
    ExpressionNode::literal(values)
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_argument_is_a_single_element_list() {
        assert_eq!(
            parse_expression(&json!({"var": "a"})).unwrap(),
            parse_expression(&json!({"var": ["a"]})).unwrap()
        );
    }

    #[test]
    fn constant_arrays_fold_into_literals() {
        let node = parse_expression(&json!([1, "a", null])).unwrap();
        let expected = Value::try_from(json!([1, "a", null])).unwrap();
        assert_eq!(node, ExpressionNode::literal(expected));

        let node = parse_expression(&json!([1, {"var": "a"}])).unwrap();
        assert!(matches!(node, ExpressionNode::Array(ref items) if items.len() == 2));
    }

    #[test]
    fn oversized_number_literals_are_rejected() {
        let error = parse_expression(&json!({">": [5, 1e30]})).unwrap_err();
        assert_eq!(
            error,
            ParseError::NumberOutOfRange {
                number: "1e30".to_string(),
                path: "/>/1".to_string(),
            }
        );
        assert_eq!(
            parse_expression(&json!({"==": [{"var": "x"}, 1e-30]})).unwrap(),
            parse_expression(&json!({"==": [{"var": "x"}, 0]})).unwrap()
        );
    }

    #[test]
    fn multi_key_objects_are_data() {
        let node = parse_expression(&json!({"a": 1, "b": 2})).unwrap();
        assert!(matches!(node, ExpressionNode::Literal(Value::Object(_))));
    }

    #[test]
    fn unknown_operator_reports_location_and_suggestion() {
        let error =
            parse_expression(&json!({"or": [true, {"fliter": [[1], true]}]})).unwrap_err();
        assert_eq!(
            error,
            ParseError::UnknownOperator {
                operator: "fliter".to_string(),
                path: "/or/1/fliter".to_string(),
                suggestion: Some("filter".to_string()),
            }
        );
    }

    #[test]
    fn arity_is_checked() {
        let error = parse_expression(&json!({"==": [1]})).unwrap_err();
        assert!(matches!(
            error,
            ParseError::InvalidArity { ref operator, actual: 1, .. } if operator == "=="
        ));
    }

    #[test]
    fn operator_names_are_escaped_in_paths() {
        let error = parse_expression(&json!({"/": [1]})).unwrap_err();
        assert_eq!(error.path(), Some("/~1"));
    }

    #[test]
    fn invalid_text_is_structural() {
        assert!(matches!(
            parse_str("{\"var\": "),
            Err(ParseError::InvalidDocument { .. })
        ));
    }
}
