use lexica_common::{Diagnostic, Position, Severity, Span};
use std::fmt;

/// Lexical error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    UnterminatedComment,
    UnterminatedStringLiteral,
    InvalidEscapeSequence,
    MalformedNumericLiteral,
    NumericLiteralOverflow,
    UnexpectedCharacter,
}

impl LexErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            LexErrorKind::UnterminatedComment => "UnterminatedComment",
            LexErrorKind::UnterminatedStringLiteral => "UnterminatedStringLiteral",
            LexErrorKind::InvalidEscapeSequence => "InvalidEscapeSequence",
            LexErrorKind::MalformedNumericLiteral => "MalformedNumericLiteral",
            LexErrorKind::NumericLiteralOverflow => "NumericLiteralOverflow",
            LexErrorKind::UnexpectedCharacter => "UnexpectedCharacter",
        }
    }

    /// Fatal errors end the pass regardless of the recovery mode: the rest
    /// of the buffer cannot be resynchronized.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            LexErrorKind::UnterminatedComment | LexErrorKind::UnterminatedStringLiteral
        )
    }

    /// Errors that only invalidate the token they occur in.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            LexErrorKind::UnexpectedCharacter
                | LexErrorKind::MalformedNumericLiteral
                | LexErrorKind::InvalidEscapeSequence
        )
    }

    pub fn severity(self) -> Severity {
        match self {
            LexErrorKind::NumericLiteralOverflow => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexical error located at the first offending character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
    /// Byte offset of the offending character.
    pub offset: u32,
}

impl LexError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, at: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            line: at.line,
            column: at.column,
            offset: at.offset,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Convert into a generic diagnostic pointing into `file`.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let diagnostic = match self.kind.severity() {
            Severity::Error => Diagnostic::error(self.message.clone()),
            Severity::Warning => Diagnostic::warning(self.message.clone()),
        };
        let diagnostic = diagnostic
            .with_code(self.kind.name())
            .with_span(Span::point(file, self.position()));
        match self.kind {
            LexErrorKind::UnterminatedComment => {
                diagnostic.with_suggestion("close the block comment with '*/'")
            }
            LexErrorKind::UnterminatedStringLiteral => {
                diagnostic.with_suggestion("close the string with '\"' on the same line")
            }
            LexErrorKind::InvalidEscapeSequence => diagnostic.with_suggestion(
                "valid escapes are \\n \\t \\r \\0 \\a \\b \\f \\v \\\\ \\\" \\'",
            ),
            _ => diagnostic,
        }
    }
}
