//! Builder pattern for constructing diagnostics

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Builder for constructing diagnostics fluently
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    location: Option<String>,
    subject: Option<String>,
    suggestion: Option<String>,
}

impl DiagnosticBuilder {
    fn with_severity(severity: Severity, code: DiagnosticCode) -> Self {
        Self {
            severity,
            code,
            message: String::new(),
            location: None,
            subject: None,
            suggestion: None,
        }
    }

    /// Create a new error diagnostic builder
    pub fn error(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Error, code)
    }

    /// Create a new warning diagnostic builder
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Warning, code)
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the location inside the rule document
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the rule, diagnosis or question the diagnostic is about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a suggested replacement
    pub fn suggest(mut self, replacement: impl Into<String>) -> Self {
        self.suggestion = Some(replacement.into());
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            severity: self.severity,
            code: self.code,
            message: self.message,
            location: self.location,
            subject: self.subject,
            suggestion: self.suggestion,
        }
    }
}

// Convenience functions for common diagnostics
impl DiagnosticBuilder {
    /// Create an "unknown operator" error
    pub fn unknown_operator(op: &str) -> Self {
        Self::error(DiagnosticCode::UnknownOperator)
            .with_message(format!("Unknown operator '{op}'"))
    }

    /// Create a "dangling reference" warning
    pub fn dangling_reference(kind: &str, id: &str) -> Self {
        Self::warning(DiagnosticCode::DanglingReference)
            .with_message(format!("Referenced {kind} '{id}' does not exist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_all_fields() {
        let diagnostic = DiagnosticBuilder::unknown_operator("amd")
            .with_location("/or/0")
            .with_subject("rule")
            .suggest("and")
            .build();

        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "Unknown operator 'amd'");
        assert_eq!(diagnostic.location.as_deref(), Some("/or/0"));
        assert_eq!(diagnostic.suggestion.as_deref(), Some("and"));
        assert_eq!(diagnostic.code_string(), "E001");
    }
}
