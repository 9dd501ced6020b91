use lexica_common::{DiagnosticBag, LexerConfig, Position, RecoveryMode, Severity};

use super::cursor::Cursor;
use super::error::{LexError, LexErrorKind};
use super::operators;
use super::token::{IntegerBase, Keyword, LiteralValue, Token, TokenKind};

/// Two-character escapes accepted inside string literals.
static ESCAPES: &[(char, char)] = &[
    ('"', '"'),
    ('\\', '\\'),
    ('\'', '\''),
    ('n', '\n'),
    ('t', '\t'),
    ('r', '\r'),
    ('0', '\0'),
    ('a', '\u{07}'),
    ('b', '\u{08}'),
    ('f', '\u{0C}'),
    ('v', '\u{0B}'),
];

/// Hand-written lexer for a C-family language.
///
/// One `Lexer` is one pass over one buffer. Tokens are pulled lazily with
/// [`Lexer::next_token`] or the `Iterator` impl, or collected at once with
/// [`Lexer::tokenize`]; both produce the same sequence.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    config: LexerConfig,
    /// Every error and warning reported so far, in source order.
    reports: Vec<LexError>,
    error_count: usize,
    token_count: usize,
    /// Set once the pass stops on an error; replayed on later calls.
    halted: Option<LexError>,
    finished: bool,
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self::with_config(source, file, LexerConfig::default())
    }

    pub fn with_config(source: &'src str, file: impl Into<String>, config: LexerConfig) -> Self {
        let cursor = Cursor::new(source, file);
        log::debug!(
            "lexing {} ({} bytes, recovery {:?})",
            cursor.file(),
            source.len(),
            config.recovery
        );
        Self {
            cursor,
            config,
            reports: Vec::new(),
            error_count: 0,
            token_count: 0,
            halted: None,
            finished: false,
            exhausted: false,
        }
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Errors and warnings reported so far.
    pub fn reports(&self) -> &[LexError] {
        &self.reports
    }

    /// Tokenize the entire source, returning all tokens and every report.
    ///
    /// The token list ends with `EndOfInput` unless the pass halted.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        for token in self.by_ref().flatten() {
            tokens.push(token);
        }
        (tokens, self.reports)
    }

    /// Like [`Lexer::tokenize`], with reports converted to diagnostics.
    pub fn tokenize_with_diagnostics(self) -> (Vec<Token>, DiagnosticBag) {
        let file = self.cursor.file().to_string();
        let (tokens, reports) = self.tokenize();
        let mut diagnostics = DiagnosticBag::new();
        diagnostics.extend(reports.iter().map(|r| r.to_diagnostic(&file)));
        (tokens, diagnostics)
    }

    /// Scan the next token.
    ///
    /// After `EndOfInput` every call returns `EndOfInput` again; after a
    /// halting error every call returns that error again.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(ref err) = self.halted {
            return Err(err.clone());
        }

        let result = self
            .skip_whitespace_and_comments()
            .and_then(|()| self.scan_token());

        match result {
            Ok(token) => {
                if token.is_end_of_input() {
                    if !self.finished {
                        self.finished = true;
                        log::debug!(
                            "finished {}: {} tokens, {} reports",
                            self.cursor.file(),
                            self.token_count,
                            self.reports.len()
                        );
                    }
                } else {
                    self.token_count += 1;
                    log::trace!("{} at {}", token, token.span.start);
                }
                Ok(token)
            }
            Err(err) => {
                self.record_error(err.clone());
                Err(err)
            }
        }
    }

    fn record_error(&mut self, err: LexError) {
        self.error_count += 1;
        let halt = err.is_fatal()
            || self.config.recovery == RecoveryMode::Halt
            || self.error_count >= self.config.max_errors;
        log::debug!("{}: {} (halt: {})", err.kind, err, halt);
        if halt {
            self.halted = Some(err.clone());
        }
        self.reports.push(err);
    }

    fn report_overflow(&mut self, message: String, at: Position) {
        log::warn!("{} at {}", message, at);
        self.reports
            .push(LexError::new(LexErrorKind::NumericLiteralOverflow, message, at));
    }

    // ---------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------

    fn scan_token(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();
        let Some(ch) = self.cursor.peek() else {
            return Ok(Token::end_of_input(self.cursor.span_from(start)));
        };

        match ch {
            c if c.is_ascii_digit() => self.scan_number(start),
            '"' => self.scan_string(start),
            c if is_ident_start(c) => Ok(self.scan_identifier(start)),
            c => match operators::longest_match(self.cursor.rest()) {
                Some((text, kind)) => {
                    for _ in text.chars() {
                        self.cursor.advance();
                    }
                    Ok(self.make_token(kind, start))
                }
                None => {
                    self.cursor.advance();
                    Err(LexError::new(
                        LexErrorKind::UnexpectedCharacter,
                        format!("unexpected character '{}'", c.escape_debug()),
                        start,
                    ))
                }
            },
        }
    }

    // ---------------------------------------------------------------
    // Whitespace & comments
    // ---------------------------------------------------------------

    /// Skip whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            self.cursor.eat_while(is_whitespace);

            if self.cursor.peek() == Some('/') {
                match self.cursor.peek_second() {
                    Some('/') => {
                        // The newline is left for the whitespace pass.
                        self.cursor.eat_while(|c| c != '\n');
                        continue;
                    }
                    Some('*') => {
                        let start = self.cursor.position();
                        self.cursor.advance(); // /
                        self.cursor.advance(); // *
                        self.skip_block_comment(start)?;
                        continue;
                    }
                    _ => {}
                }
            }

            return Ok(());
        }
    }

    /// Skip a block comment whose `/*` began at `start`.
    ///
    /// Without `nested_comments` the first `*/` closes the comment.
    fn skip_block_comment(&mut self, start: Position) -> Result<(), LexError> {
        let nested = self.config.nested_comments;
        let mut depth: u32 = 1;
        while depth > 0 {
            match self.cursor.advance() {
                Some('/') if nested && self.cursor.peek() == Some('*') => {
                    self.cursor.advance();
                    depth += 1;
                }
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    depth -= 1;
                }
                Some(_) => {}
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedComment,
                        "unterminated block comment",
                        start,
                    ));
                }
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // String scanning
    // ---------------------------------------------------------------

    /// Scan a string literal; the cursor is on the opening `"`.
    ///
    /// An invalid escape does not stop the scan: the literal is read to its
    /// closing quote first so a collecting pass resumes after it.
    fn scan_string(&mut self, start: Position) -> Result<Token, LexError> {
        self.cursor.advance();
        let mut value = String::new();
        let mut invalid_escape = None;

        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedStringLiteral,
                        "unterminated string literal",
                        start,
                    ));
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.cursor.position();
                    self.cursor.advance();
                    match self.cursor.peek() {
                        // Reported as unterminated on the next iteration.
                        None | Some('\n') => {}
                        Some(c) => {
                            self.cursor.advance();
                            match decode_escape(c) {
                                Some(decoded) => value.push(decoded),
                                None if invalid_escape.is_none() => {
                                    invalid_escape = Some(LexError::new(
                                        LexErrorKind::InvalidEscapeSequence,
                                        format!("invalid escape sequence '\\{}'", c.escape_debug()),
                                        escape_start,
                                    ));
                                }
                                None => {}
                            }
                        }
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    value.push(c);
                }
            }
        }

        if let Some(err) = invalid_escape {
            return Err(err);
        }

        let lexeme = self.cursor.slice_from(start.offset);
        let span = self.cursor.span_from(start);
        Ok(Token::literal(
            TokenKind::StringLiteral,
            lexeme,
            LiteralValue::String(value),
            span,
        ))
    }

    // ---------------------------------------------------------------
    // Number scanning
    // ---------------------------------------------------------------

    /// Scan a number literal (integer or float); the cursor is on its
    /// first digit.
    fn scan_number(&mut self, start: Position) -> Result<Token, LexError> {
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_second(), Some('x' | 'X')) {
            return self.scan_hex(start);
        }

        self.cursor.eat_while(|c| c.is_ascii_digit());

        let mut is_float = false;
        let mut scientific = false;

        // Fraction: a decimal point followed by at least one digit.
        if self.cursor.peek() == Some('.')
            && self
                .cursor
                .peek_second()
                .is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            is_float = true;
        }

        // Scientific notation
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            let digits_start = self.cursor.position().offset;
            self.cursor.eat_while(|c| c.is_ascii_digit());
            if self.cursor.position().offset == digits_start {
                let lexeme = self.cursor.slice_from(start.offset);
                return Err(LexError::new(
                    LexErrorKind::MalformedNumericLiteral,
                    format!("malformed numeric literal '{}': exponent has no digits", lexeme),
                    start,
                ));
            }
            is_float = true;
            scientific = true;
        }

        let lexeme = self.cursor.slice_from(start.offset);
        let span = self.cursor.span_from(start);

        if is_float {
            let value: f64 = lexeme.parse().map_err(|e| {
                LexError::new(
                    LexErrorKind::MalformedNumericLiteral,
                    format!("malformed numeric literal '{}': {}", lexeme, e),
                    start,
                )
            })?;
            if !value.is_finite() {
                self.report_overflow(
                    format!("float literal '{}' is out of range", lexeme),
                    start,
                );
            }
            Ok(Token::literal(
                TokenKind::FloatLiteral,
                lexeme,
                LiteralValue::Float { value, scientific },
                span,
            ))
        } else {
            let value = self.integer_magnitude(lexeme, lexeme, IntegerBase::Decimal, start);
            Ok(Token::literal(
                TokenKind::IntegerLiteral,
                lexeme,
                LiteralValue::Integer {
                    value,
                    base: IntegerBase::Decimal,
                },
                span,
            ))
        }
    }

    /// Scan a hex literal; the cursor is on the leading `0` of `0x`.
    ///
    /// Only the hex digit run belongs to the literal; whatever follows
    /// starts the next token.
    fn scan_hex(&mut self, start: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // 0
        self.cursor.advance(); // x
        let digit_start = self.cursor.position().offset;
        self.cursor.eat_while(|c| c.is_ascii_hexdigit());

        if self.cursor.position().offset == digit_start {
            let lexeme = self.cursor.slice_from(start.offset);
            return Err(LexError::new(
                LexErrorKind::MalformedNumericLiteral,
                format!("malformed numeric literal '{}': expected hex digits", lexeme),
                start,
            ));
        }

        let lexeme = self.cursor.slice_from(start.offset);
        let digits = self.cursor.slice_from(digit_start);
        let span = self.cursor.span_from(start);
        let value = self.integer_magnitude(lexeme, digits, IntegerBase::Hex, start);
        Ok(Token::literal(
            TokenKind::IntegerLiteral,
            lexeme,
            LiteralValue::Integer {
                value,
                base: IntegerBase::Hex,
            },
            span,
        ))
    }

    /// Parse a digit run, reporting overflow as a warning.
    fn integer_magnitude(
        &mut self,
        lexeme: &str,
        digits: &str,
        base: IntegerBase,
        start: Position,
    ) -> Option<u64> {
        match u64::from_str_radix(digits, base.radix()) {
            Ok(value) => Some(value),
            Err(_) => {
                self.report_overflow(
                    format!("integer literal '{}' does not fit in 64 bits", lexeme),
                    start,
                );
                None
            }
        }
    }

    // ---------------------------------------------------------------
    // Identifier / keyword scanning
    // ---------------------------------------------------------------

    /// Scan an identifier or keyword. The keyword lookup runs on the full
    /// identifier, so `intero` stays an identifier.
    fn scan_identifier(&mut self, start: Position) -> Token {
        self.cursor.eat_while(is_ident_continue);
        let lexeme = self.cursor.slice_from(start.offset);
        let kind = Keyword::lookup(lexeme)
            .map(TokenKind::Keyword)
            .unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    /// Create a token using the slice from `start` to current position.
    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        let lexeme = self.cursor.slice_from(start.offset);
        let span = self.cursor.span_from(start);
        Token::new(kind, lexeme, span)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    /// Yields every token up to and including `EndOfInput`, interleaved
    /// with errors; ends after `EndOfInput` or a halting error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let item = self.next_token();
        self.exhausted = match item {
            Ok(ref token) => token.is_end_of_input(),
            Err(_) => self.halted.is_some(),
        };
        Some(item)
    }
}

/// Lex `source` with the default configuration, stopping at the first
/// error. Overflow warnings do not fail the pass; the affected tokens carry
/// no decoded value.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let (tokens, reports) = Lexer::new(source, "<input>").tokenize();
    match reports
        .into_iter()
        .find(|r| r.kind.severity() == Severity::Error)
    {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

fn decode_escape(c: char) -> Option<char> {
    ESCAPES
        .iter()
        .find(|(escape, _)| *escape == c)
        .map(|(_, decoded)| *decoded)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c == '_'
}
