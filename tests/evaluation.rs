//! Integration tests for rule evaluation

use decision_logic::evaluator::EvaluationError;
use decision_logic::registry::OperatorError;
use decision_logic::{ErrorKind, ParseError, RuleEngine, RuleError, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value as JsonValue, json};

fn evaluate(rule: JsonValue, data: JsonValue) -> Result<Value, RuleError> {
    RuleEngine::new().evaluate_json(&rule, &data)
}

#[rstest]
#[case::nested_path(json!({"var": "a.b"}), json!({"a": {"b": 5}}), json!(5))]
#[case::default_used(json!({"var": ["a.c", 99]}), json!({"a": {"b": 5}}), json!(99))]
#[case::present_null(json!({"var": ["a.b", 1]}), json!({"a": {"b": null}}), json!(null))]
#[case::whole_data(json!({"var": ""}), json!({"x": 1}), json!({"x": 1}))]
#[case::no_path(json!({"var": []}), json!([1, 2]), json!([1, 2]))]
#[case::array_index(json!({"var": "items.1"}), json!({"items": [10, 20]}), json!(20))]
#[case::numeric_path(json!({"var": 1}), json!(["a", "b"]), json!("b"))]
#[case::computed_path(json!({"var": {"cat": ["a", ".b"]}}), json!({"a": {"b": 7}}), json!(7))]
#[case::absent_without_default(json!({"var": "nope"}), json!({}), json!(null))]
fn var_resolution(#[case] rule: JsonValue, #[case] data: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, data).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::one_missing(json!({"missing": ["a", "b"]}), json!({"a": 1}), json!(["b"]))]
#[case::key_list(json!({"missing": [["a", "b"]]}), json!({"b": 1}), json!(["a"]))]
#[case::empty_string(json!({"missing": ["a"]}), json!({"a": ""}), json!(["a"]))]
#[case::null_value(json!({"missing": ["a.b"]}), json!({"a": {"b": null}}), json!(["a.b"]))]
#[case::zero_present(json!({"missing": ["a"]}), json!({"a": 0}), json!([]))]
#[case::enough(json!({"missing_some": [1, ["a", "b"]]}), json!({"a": 1}), json!([]))]
#[case::not_enough(
    json!({"missing_some": [2, ["a", "b", "c"]]}),
    json!({"a": 1}),
    json!(["b", "c"])
)]
fn missing_keys(#[case] rule: JsonValue, #[case] data: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, data).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::between_inside(json!({"<": [1, 2, 3]}), json!(true))]
#[case::between_outside(json!({"<": [1, 5, 3]}), json!(false))]
#[case::between_inclusive(json!({"<=": [1, 1, 3]}), json!(true))]
#[case::between_descending(json!({">": [3, 2, 1]}), json!(true))]
#[case::lexical(json!({">": ["b", "a"]}), json!(true))]
#[case::numeric_string(json!({"<": ["10", 9]}), json!(false))]
#[case::unordered(json!({"<": ["abc", 1]}), json!(false))]
#[case::loose_number_string(json!({"==": [1, "1"]}), json!(true))]
#[case::loose_null(json!({"==": [null, 0]}), json!(false))]
#[case::loose_bool(json!({"==": [0, false]}), json!(true))]
#[case::strict_kinds(json!({"===": [1, "1"]}), json!(false))]
#[case::strict_numbers(json!({"!==": [1, 1.0]}), json!(false))]
#[case::not_equal(json!({"!=": ["a", "b"]}), json!(true))]
fn comparisons(#[case] rule: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, json!({})).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::and_last(json!({"and": [true, "a", 3]}), json!(3))]
#[case::and_first_falsy(json!({"and": [true, "", 3]}), json!(""))]
#[case::or_first_truthy(json!({"or": [false, 0, "x"]}), json!("x"))]
#[case::or_last(json!({"or": [false, 0]}), json!(0))]
#[case::not_empty_array(json!({"!": [[]]}), json!(true))]
#[case::not_alias(json!({"not": [1]}), json!(false))]
#[case::double_not(json!({"!!": ["0"]}), json!(true))]
#[case::if_then(json!({"if": [true, "yes", "no"]}), json!("yes"))]
#[case::if_chain(json!({"if": [false, "a", false, "b", "c"]}), json!("c"))]
#[case::if_no_default(json!({"if": [false, "a"]}), json!(null))]
#[case::if_empty(json!({"if": []}), json!(null))]
#[case::ternary(json!({"?:": [1, "t", "f"]}), json!("t"))]
fn logic_and_control(#[case] rule: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, json!({})).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::sum(json!({"+": [1, 2, 3]}), json!(6))]
#[case::empty_sum(json!({"+": []}), json!(0))]
#[case::cast(json!({"+": ["3.5"]}), json!(3.5))]
#[case::negate(json!({"-": [5]}), json!(-5))]
#[case::difference(json!({"-": [10, 4]}), json!(6))]
#[case::product(json!({"*": [2, "3"]}), json!(6))]
#[case::quotient(json!({"/": [7, 2]}), json!(3.5))]
#[case::integral_quotient(json!({"/": [4, 2]}), json!(2))]
#[case::remainder(json!({"%": [7, 3]}), json!(1))]
#[case::negative_remainder(json!({"%": [-7, 3]}), json!(-1))]
#[case::minimum(json!({"min": [3, 1, 2]}), json!(1))]
#[case::maximum(json!({"max": [3, 1.5, 2]}), json!(3))]
#[case::decimal_sum(json!({"+": [0.1, 0.2]}), json!(0.3))]
fn arithmetic(#[case] rule: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, json!({})).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::cat(json!({"cat": ["a", 1, null, true]}), json!("a1nulltrue"))]
#[case::cat_decimal(json!({"cat": ["v", 1.5]}), json!("v1.5"))]
#[case::substr_from(json!({"substr": ["jsonlogic", 4]}), json!("logic"))]
#[case::substr_negative_start(json!({"substr": ["jsonlogic", -5]}), json!("logic"))]
#[case::substr_length(json!({"substr": ["jsonlogic", 1, 3]}), json!("son"))]
#[case::substr_negative_length(json!({"substr": ["jsonlogic", 4, -2]}), json!("log"))]
#[case::substr_past_end(json!({"substr": ["abc", 10]}), json!(""))]
#[case::in_string(json!({"in": ["Spring", "Springfield"]}), json!(true))]
#[case::in_array(json!({"in": ["b", ["a", "b"]]}), json!(true))]
#[case::in_array_strict(json!({"in": [1, ["1"]]}), json!(false))]
#[case::in_null(json!({"in": ["a", null]}), json!(false))]
#[case::merge(json!({"merge": [[1, 2], 3, [[4]]]}), json!([1, 2, 3, [4]]))]
#[case::log(json!({"log": "x"}), json!("x"))]
fn strings_and_membership(#[case] rule: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, json!({})).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::map(json!({"map": [{"var": "xs"}, {"*": [{"var": ""}, 2]}]}), json!([2, 4, 6]))]
#[case::filter(json!({"filter": [{"var": "xs"}, {">": [{"var": ""}, 1]}]}), json!([2, 3]))]
#[case::reduce(
    json!({"reduce": [{"var": "xs"}, {"+": [{"var": "current"}, {"var": "accumulator"}]}, 0]}),
    json!(6)
)]
#[case::reduce_empty(json!({"reduce": [[], {"var": "current"}]}), json!(null))]
#[case::all(json!({"all": [{"var": "xs"}, {">": [{"var": ""}, 0]}]}), json!(true))]
#[case::all_empty(json!({"all": [[], true]}), json!(false))]
#[case::some(json!({"some": [{"var": "xs"}, {"==": [{"var": ""}, 2]}]}), json!(true))]
#[case::some_not_array(json!({"some": [{"var": "nope"}, true]}), json!(false))]
#[case::none(json!({"none": [{"var": "xs"}, {">": [{"var": ""}, 5]}]}), json!(true))]
#[case::none_empty(json!({"none": [[], true]}), json!(true))]
#[case::map_objects(
    json!({"map": [{"var": "people"}, {"var": "name"}]}),
    json!(["ann", "bo"])
)]
fn array_operators(#[case] rule: JsonValue, #[case] expected: JsonValue) {
    let data = json!({"xs": [1, 2, 3], "people": [{"name": "ann"}, {"name": "bo"}]});
    assert_eq!(evaluate(rule, data).unwrap(), Value::try_from(expected).unwrap());
}

#[rstest]
#[case::and(json!({"and": [false, {"/": [1, 0]}]}), json!(false))]
#[case::or(json!({"or": [true, {"/": [1, 0]}]}), json!(true))]
#[case::if_branch(json!({"if": [false, {"/": [1, 0]}, "safe"]}), json!("safe"))]
#[case::all_stops(json!({"all": [[0, "x"], {"+": [{"var": ""}]}]}), json!(false))]
fn skipped_branches_never_raise(#[case] rule: JsonValue, #[case] expected: JsonValue) {
    assert_eq!(evaluate(rule, json!({})).unwrap(), Value::try_from(expected).unwrap());
}

#[test]
fn test_division_by_zero_in_live_branch() {
    let error = evaluate(json!({"if": [true, {"/": [1, 0]}, "safe"]}), json!({})).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Evaluation);
    assert_eq!(
        error,
        RuleError::Evaluation(EvaluationError::Operator(OperatorError::DivisionByZero {
            operator: "/".to_string()
        }))
    );
}

#[test]
fn test_non_numeric_operand_is_an_error() {
    let error = evaluate(json!({"+": [1, "abc"]}), json!({})).unwrap_err();
    assert!(matches!(
        error,
        RuleError::Evaluation(EvaluationError::Operator(
            OperatorError::NonNumericOperand { .. }
        ))
    ));
}

#[test]
fn test_numbers_beyond_decimal_range() {
    let error = evaluate(json!({">": [5, 1e30]}), json!({})).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Structural);
    assert!(matches!(
        error,
        RuleError::Structural(ParseError::NumberOutOfRange { .. })
    ));

    let error = evaluate(json!({">": [{"var": "x"}, 5]}), json!({"x": -1e30})).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Evaluation);
}

#[test]
fn test_tiny_numbers_round_to_zero() {
    let rule = json!({"==": [{"var": "x"}, 1e-30]});
    assert_eq!(evaluate(rule.clone(), json!({"x": null})).unwrap(), Value::Boolean(false));
    assert_eq!(evaluate(rule, json!({"x": 0})).unwrap(), Value::Boolean(true));
}

#[test]
fn test_in_rejects_non_container_haystack() {
    let error = evaluate(json!({"in": ["a", 5]}), json!({})).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Evaluation);
    assert!(matches!(
        error,
        RuleError::Evaluation(EvaluationError::Operator(
            OperatorError::InvalidOperandTypes { .. }
        ))
    ));
}

#[test]
fn test_unknown_operator_fails_before_evaluation() {
    // The unknown operator sits in a branch that would be skipped
    let error = evaluate(json!({"and": [false, {"frob": [1]}]}), json!({})).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Structural);
    match error {
        RuleError::Structural(ParseError::UnknownOperator { operator, path, .. }) => {
            assert_eq!(operator, "frob");
            assert_eq!(path, "/and/1/frob");
        }
        other => panic!("expected unknown operator, got {other:?}"),
    }
}

#[test]
fn test_arity_violation_is_structural() {
    let error = evaluate(json!({"var": ["a", 1, 2]}), json!({})).unwrap_err();
    assert!(matches!(
        error,
        RuleError::Structural(ParseError::InvalidArity { actual: 3, .. })
    ));
}

#[test]
fn test_evaluation_is_deterministic() {
    let engine = RuleEngine::new();
    let rule = json!({"reduce": [
        {"filter": [{"var": "xs"}, {"%": [{"var": ""}, 2]}]},
        {"+": [{"var": "current"}, {"var": "accumulator"}]},
        0
    ]});
    let data = json!({"xs": [1, 2, 3, 4, 5]});
    let first = engine.evaluate_json(&rule, &data).unwrap();
    for _ in 0..10 {
        assert_eq!(engine.evaluate_json(&rule, &data).unwrap(), first);
    }
    assert_eq!(first, Value::Integer(9));
}

#[test]
fn test_inputs_are_not_mutated() {
    let engine = RuleEngine::new();
    let rule = json!({"map": [{"var": "xs"}, {"+": [{"var": ""}, 1]}]});
    let data = Value::try_from(json!({"xs": [1, 2]})).unwrap();
    let before = data.clone();
    let expression = engine.parse(&rule).unwrap();
    let snapshot = expression.clone();
    engine.evaluate(&expression, &data).unwrap();
    assert_eq!(data, before);
    assert_eq!(expression, snapshot);
}

#[test]
fn test_engine_is_shareable_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RuleEngine>();

    let engine = RuleEngine::new();
    let rule = json!({"*": [{"var": "n"}, 2]});
    std::thread::scope(|scope| {
        for n in 0..4_i64 {
            let engine = &engine;
            let rule = &rule;
            scope.spawn(move || {
                let result = engine.evaluate_json(rule, &json!({"n": n})).unwrap();
                assert_eq!(result, Value::Integer(n * 2));
            });
        }
    });
}
