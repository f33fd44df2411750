//! Integration tests for answer sessions

use decision_logic::{
    AnswerOption, AnswerSession, Diagnosis, DiagnosisSelector, Question, QuestionNavigator,
    Questionnaire, SessionError, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn questionnaire() -> Questionnaire {
    Questionnaire::new(vec![
        Question::new("hair", "Hair type?", 1)
            .entry_point()
            .with_option(AnswerOption::new("hair-curly", "Curly").with_value("curly"))
            .with_option(AnswerOption::new("hair-straight", "Straight").with_value("straight")),
        Question::new("scalp", "Scalp?", 2)
            .with_option(AnswerOption::new("scalp-dry", "Dry").with_value("dry"))
            .with_option(AnswerOption::new("scalp-oily", "Oily").with_value("oily")),
    ])
}

#[test]
fn test_answers_are_stored_under_question_and_option() {
    let questionnaire = questionnaire();
    let mut session = AnswerSession::new("s1");
    let hair = questionnaire.get("hair").unwrap();

    let recorded = session.record(hair, Some("hair-curly"), None).unwrap();
    assert_eq!(recorded.selected_option_text.as_deref(), Some("Curly"));

    assert_eq!(
        session.context(),
        Value::try_from(json!({"hair-curly": "curly", "hair": "curly"})).unwrap()
    );
}

#[test]
fn test_answering_again_replaces_the_answer() {
    let questionnaire = questionnaire();
    let mut session = AnswerSession::new("s1");
    let hair = questionnaire.get("hair").unwrap();

    session.record(hair, Some("hair-curly"), None).unwrap();
    session.record(hair, Some("hair-straight"), None).unwrap();

    assert_eq!(session.recorded().len(), 1);
    assert_eq!(
        session.context(),
        Value::try_from(json!({"hair": "straight", "hair-straight": "straight"})).unwrap()
    );
}

#[test]
fn test_option_value_overrides_free_form_value() {
    let questionnaire = questionnaire();
    let mut session = AnswerSession::new("s1");
    let scalp = questionnaire.get("scalp").unwrap();
    session
        .record(scalp, Some("scalp-dry"), Some(Value::from("ignored")))
        .unwrap();
    assert_eq!(session.answers().get("scalp"), Some(&Value::from("dry")));
}

#[test]
fn test_full_run_completes_once() {
    let questionnaire = questionnaire();
    let navigator = QuestionNavigator::new();
    let mut session = AnswerSession::new("s1");

    let first = navigator.first_question(&questionnaire).unwrap();
    session.record(first, Some("hair-curly"), None).unwrap();
    let next = navigator
        .resolve_next(&questionnaire, &first.id, Some("hair-curly"), &session.context())
        .unwrap()
        .unwrap();
    session.record(next, Some("scalp-dry"), None).unwrap();
    assert_eq!(
        navigator
            .resolve_next(&questionnaire, &next.id, Some("scalp-dry"), &session.context())
            .unwrap(),
        None
    );

    let candidates = vec![
        Diagnosis::new(
            "Dry Curls",
            json!({"and": [{"==": [{"var": "hair"}, "curly"]}, {"==": [{"var": "scalp"}, "dry"]}]}),
            10,
        ),
        Diagnosis::new("General Hair Care", json!(false), 0),
    ];
    let selector = DiagnosisSelector::new();
    let selection = session.complete(&selector, &candidates).unwrap();
    assert!(selection.is_match());
    assert_eq!(session.diagnosis(), Some("Dry Curls"));
    assert!(session.is_completed());

    assert_eq!(
        session.complete(&selector, &candidates).unwrap_err(),
        SessionError::AlreadyCompleted {
            session: "s1".to_string()
        }
    );
    assert!(matches!(
        session.record(first, Some("hair-straight"), None),
        Err(SessionError::AlreadyCompleted { .. })
    ));
}
