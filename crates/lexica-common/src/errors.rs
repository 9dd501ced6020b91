use crate::span::Span;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A lexer diagnostic handed to a caller-supplied reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable machine-readable name of the problem, e.g. `UnexpectedCharacter`.
    pub code: Option<String>,
    pub message: String,
    pub span: Option<Span>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message)
    }

    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            span: None,
            suggestion: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.code {
            Some(ref code) => write!(f, "{}[{}]: {}", prefix, code, self.message)?,
            None => write!(f, "{}: {}", prefix, self.message)?,
        }
        if let Some(ref span) = self.span {
            write!(f, "\n  --> {}", span)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n   = help: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Convenience collector for diagnostics produced during a lexing pass.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.report(Diagnostic::error(message).with_span(span));
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.report(Diagnostic::warning(message).with_span(span));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn span() -> Span {
        let start = Position {
            line: 4,
            column: 9,
            offset: 30,
        };
        Span::new("main.c", start, start)
    }

    #[test]
    fn display_includes_code_span_and_help() {
        let diag = Diagnostic::error("unexpected character '@'")
            .with_code("UnexpectedCharacter")
            .with_span(span())
            .with_suggestion("remove the character");
        assert_eq!(
            diag.to_string(),
            "error[UnexpectedCharacter]: unexpected character '@'\n  --> main.c:4:9\n   = help: remove the character"
        );
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut bag = DiagnosticBag::new();
        bag.warning("integer literal overflows", span());
        assert!(!bag.has_errors());
        assert_eq!(bag.len(), 1);

        bag.error("unterminated string literal", span());
        assert!(bag.has_errors());
        assert_eq!(bag.error_count(), 1);
        assert_eq!(bag.into_diagnostics().len(), 2);
    }

    #[test]
    fn extend_appends_in_order() {
        let mut bag = DiagnosticBag::new();
        bag.extend(vec![Diagnostic::warning("first"), Diagnostic::error("second")]);
        let messages: Vec<_> = bag.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
