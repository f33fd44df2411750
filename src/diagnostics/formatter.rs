//! Rendering of diagnostics for terminals and machine consumers

use super::diagnostic::Diagnostic;
#[cfg(feature = "terminal")]
use super::diagnostic::Severity;

/// Rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Multi-line report with location and suggestion
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// One line per diagnostic, `location: severity: [code] message`
    Compact,
}

/// Renders [`Diagnostic`]s in one [`Format`]
pub struct DiagnosticFormatter {
    format: Format,
    show_code: bool,
    #[cfg(feature = "terminal")]
    use_color: bool,
}

impl DiagnosticFormatter {
    /// Formatter with codes shown
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_code: true,
            #[cfg(feature = "terminal")]
            use_color: true,
        }
    }

    /// Include diagnostic codes such as `E001`
    pub fn with_code(mut self, show: bool) -> Self {
        self.show_code = show;
        self
    }

    /// Color severity labels
    #[cfg(feature = "terminal")]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Render one diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic),
            Format::Json => Self::format_json(diagnostic),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    /// Render a batch; JSON output is a single array
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        if self.format == Format::Json {
            return serde_json::to_string_pretty(diagnostics)
                .unwrap_or_else(|_| format!("{diagnostics:?}"));
        }
        diagnostics
            .iter()
            .map(|diagnostic| self.format(diagnostic))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn severity_label(&self, diagnostic: &Diagnostic) -> String {
        #[cfg(feature = "terminal")]
        if self.use_color {
            use colored::Colorize;
            let label = diagnostic.severity.to_string();
            return match diagnostic.severity {
                Severity::Error => label.red().bold().to_string(),
                Severity::Warning => label.yellow().bold().to_string(),
                Severity::Info => label.blue().bold().to_string(),
                Severity::Hint => label.green().bold().to_string(),
            };
        }

        diagnostic.severity.to_string()
    }

    fn format_text(&self, diagnostic: &Diagnostic) -> String {
        let mut result = format!("{}: {}", self.severity_label(diagnostic), diagnostic.message);

        if self.show_code {
            result.push_str(&format!(" [{}]", diagnostic.code_string()));
        }

        result.push('\n');

        if let Some(subject) = &diagnostic.subject {
            result.push_str(&format!(" --> {subject}"));
            if let Some(location) = &diagnostic.location {
                result.push_str(&format!(" at {location}"));
            }
            result.push('\n');
        } else if let Some(location) = &diagnostic.location {
            result.push_str(&format!(" --> {location}\n"));
        }

        if let Some(suggestion) = &diagnostic.suggestion {
            result.push_str(&format!("  help: did you mean '{suggestion}'?\n"));
        }

        result
    }

    fn format_json(diagnostic: &Diagnostic) -> String {
        serde_json::to_string_pretty(diagnostic).unwrap_or_else(|_| format!("{diagnostic:?}"))
    }

    fn format_compact(&self, diagnostic: &Diagnostic) -> String {
        let code = if self.show_code {
            format!("[{}] ", diagnostic.code_string())
        } else {
            String::new()
        };
        let location = diagnostic.location.as_deref().unwrap_or("/");

        format!(
            "{}: {}: {}{}",
            location, diagnostic.severity, code, diagnostic.message
        )
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::default())
    }
}
