//! Command-line interface for rule evaluation, diagnosis selection and
//! questionnaire navigation
//!
//! Results are written to stdout as JSON. Failures print an error report
//! `{"kind": ..., "message": ...}` to stderr and exit with status 1.

use clap::{Parser, Subcommand};
use decision_logic::diagnostics::{DiagnosticFormatter, Format};
use decision_logic::{
    Diagnosis, DiagnosisSelector, EngineConfig, ErrorKind, ErrorReport, QuestionNavigator,
    Questionnaire, RuleEngine, SelectorConfig, Value,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use std::fs;
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "decision-logic")]
#[command(about = "Evaluate JSON rules, select diagnoses and walk questionnaires")]
#[command(version)]
struct Cli {
    /// Maximum expression nesting depth
    #[arg(long, global = true, default_value_t = EngineConfig::default().max_evaluation_depth)]
    max_depth: usize,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a rule against data
    Evaluate {
        /// Rule as inline JSON, or @FILE to read it from a file
        rule: String,
        /// JSON data file, `-` for stdin (defaults to `{}`)
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Check a rule for unknown operators and wrong argument counts
    Validate {
        /// Rule as inline JSON, or @FILE to read it from a file
        rule: String,
    },
    /// Select the diagnosis matching a set of answers
    Diagnose {
        /// JSON file holding an array of diagnoses
        #[arg(long)]
        diagnoses: String,
        /// JSON file holding the answers, `-` for stdin
        #[arg(long)]
        answers: String,
        /// Name of the diagnosis used when nothing matches
        #[arg(long, conflicts_with = "no_fallback")]
        fallback: Option<String>,
        /// Report not-found instead of falling back
        #[arg(long)]
        no_fallback: bool,
        /// Also consider inactive diagnoses
        #[arg(long)]
        include_inactive: bool,
    },
    /// Resolve the question that follows an answer
    Next {
        /// JSON file holding the questionnaire
        #[arg(long)]
        questionnaire: String,
        /// Id of the question just answered
        #[arg(long)]
        current: String,
        /// Id of the chosen option
        #[arg(long)]
        option: Option<String>,
        /// JSON file holding the answers so far, `-` for stdin
        #[arg(long)]
        answers: Option<String>,
    },
    /// Show the question a new run starts with
    First {
        /// JSON file holding the questionnaire
        #[arg(long)]
        questionnaire: String,
    },
}

fn main() {
    // Setup human-panic for better error messages
    human_panic::setup_panic!();
    env_logger::init();

    let cli = Cli::parse();
    let engine = RuleEngine::new().with_config(EngineConfig::new(cli.max_depth));

    let result = match cli.command {
        Commands::Evaluate { rule, data } => handle_evaluate(&engine, &rule, data.as_deref()),
        Commands::Validate { rule } => handle_validate(&engine, &rule),
        Commands::Diagnose {
            diagnoses,
            answers,
            fallback,
            no_fallback,
            include_inactive,
        } => {
            let mut config = SelectorConfig::default();
            if let Some(name) = fallback {
                config = config.with_fallback_name(name);
            }
            if no_fallback {
                config = config.without_fallback();
            }
            if include_inactive {
                config = config.including_inactive();
            }
            let selector = DiagnosisSelector::new()
                .with_engine(engine)
                .with_config(config);
            handle_diagnose(&selector, &diagnoses, &answers)
        }
        Commands::Next {
            questionnaire,
            current,
            option,
            answers,
        } => handle_next(
            &QuestionNavigator::with_engine(engine),
            &questionnaire,
            &current,
            option.as_deref(),
            answers.as_deref(),
        ),
        Commands::First { questionnaire } => {
            handle_first(&QuestionNavigator::with_engine(engine), &questionnaire)
        }
    };

    match result.and_then(|output| render(&output, cli.pretty)) {
        Ok(text) => println!("{text}"),
        Err(report) => {
            let text = serde_json::to_string(&report)
                .unwrap_or_else(|_| format!("{}: {}", report.kind, report.message));
            eprintln!("{text}");
            process::exit(1);
        }
    }
}

fn handle_evaluate(
    engine: &RuleEngine,
    rule: &str,
    data: Option<&str>,
) -> Result<JsonValue, ErrorReport> {
    let rule = read_rule(rule)?;
    let data = match data {
        Some(source) => read_json::<Value>(source)?,
        None => Value::Object(Default::default()),
    };
    let result = engine.evaluate_rule(&rule, &data).map_err(|e| e.to_report())?;
    Ok(json!({ "result": result }))
}

fn handle_validate(engine: &RuleEngine, rule: &str) -> Result<JsonValue, ErrorReport> {
    let rule = read_rule(rule)?;
    match engine.parse(&rule) {
        Ok(_) => Ok(json!({ "valid": true })),
        Err(error) => {
            let formatter = DiagnosticFormatter::new(Format::Text);
            eprintln!("{}", formatter.format(&error.to_diagnostic()));
            Err(ErrorReport::new(ErrorKind::Structural, error.to_string()))
        }
    }
}

fn handle_diagnose(
    selector: &DiagnosisSelector,
    diagnoses: &str,
    answers: &str,
) -> Result<JsonValue, ErrorReport> {
    let candidates: Vec<Diagnosis> = read_json(diagnoses)?;
    let answers: Value = read_json(answers)?;
    let selection = selector.select(&candidates, &answers);

    if !selection.diagnostics.is_empty() {
        let formatter = DiagnosticFormatter::new(Format::Compact);
        eprintln!("{}", formatter.format_all(&selection.diagnostics));
    }
    to_json(&selection)
}

fn handle_next(
    navigator: &QuestionNavigator,
    questionnaire: &str,
    current: &str,
    option: Option<&str>,
    answers: Option<&str>,
) -> Result<JsonValue, ErrorReport> {
    let questionnaire: Questionnaire = read_json(questionnaire)?;
    let answers = match answers {
        Some(source) => read_json::<Value>(source)?,
        None => Value::Object(Default::default()),
    };
    let resolution = navigator
        .resolve(&questionnaire, current, option, &answers)
        .map_err(|e| ErrorReport::from(&e))?;
    match resolution {
        Some(resolution) => to_json(&resolution),
        None => Ok(json!({ "question": null })),
    }
}

fn handle_first(
    navigator: &QuestionNavigator,
    questionnaire: &str,
) -> Result<JsonValue, ErrorReport> {
    let questionnaire: Questionnaire = read_json(questionnaire)?;
    let question = navigator.first_question(&questionnaire);
    to_json(&json!({ "question": question }))
}

fn read_rule(source: &str) -> Result<JsonValue, ErrorReport> {
    match source.strip_prefix('@') {
        Some(path) => read_json(path),
        None => serde_json::from_str(source).map_err(|e| {
            ErrorReport::new(ErrorKind::Structural, format!("Invalid rule document: {e}"))
        }),
    }
}

fn read_json<T: DeserializeOwned>(source: &str) -> Result<T, ErrorReport> {
    let text = if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| input_error(format!("Error reading from stdin: {e}")))?;
        buffer
    } else {
        fs::read_to_string(source)
            .map_err(|e| input_error(format!("Error reading file '{source}': {e}")))?
    };
    serde_json::from_str(&text).map_err(|e| input_error(format!("Error parsing '{source}': {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, ErrorReport> {
    serde_json::to_value(value).map_err(|e| input_error(e.to_string()))
}

fn render(output: &JsonValue, pretty: bool) -> Result<String, ErrorReport> {
    let text = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    };
    text.map_err(|e| input_error(e.to_string()))
}

fn input_error(message: String) -> ErrorReport {
    ErrorReport::new(ErrorKind::Input, message)
}
