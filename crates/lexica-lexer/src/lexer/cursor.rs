use lexica_common::{Position, Span};

/// Low-level character reader over source text.
///
/// Tracks the current position (line, column, byte offset) and provides
/// peek/advance primitives for the scanner. End of input is reported as
/// `None`, never as an error.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    file: String,
    chars: std::str::Chars<'src>,
    /// Byte offset of the *next* character to be consumed.
    offset: u32,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self {
            source,
            file: file.into(),
            chars: source.chars(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Current position in the source.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// Peek at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peek at the character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// The unconsumed remainder of the source.
    pub fn rest(&self) -> &'src str {
        self.chars.as_str()
    }

    /// Consume and return the next character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.offset += ch.len_utf8() as u32;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it matches `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True if there are no more characters.
    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Slice the source from byte offset `start` to `end`.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }

    /// Slice the source from byte offset `start` to the current offset.
    pub fn slice_from(&self, start: u32) -> &'src str {
        self.slice(start, self.offset)
    }

    /// Build a Span from a start position to the current position.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(self.file.clone(), start, self.position())
    }

    /// Consume characters while `predicate` returns true.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_line_one_column_one() {
        let cursor = Cursor::new("int", "t.c");
        assert_eq!(cursor.position(), Position::start());
        assert_eq!(cursor.peek(), Some('i'));
        assert_eq!(cursor.peek_second(), Some('n'));
    }

    #[test]
    fn newline_resets_column() {
        let mut cursor = Cursor::new("a\nbc", "t.c");
        cursor.advance();
        assert_eq!(cursor.position().column, 2);
        assert_eq!(cursor.advance(), Some('\n'));
        let pos = cursor.position();
        assert_eq!((pos.line, pos.column, pos.offset), (2, 1, 2));
        cursor.advance();
        assert_eq!(cursor.position().column, 2);
    }

    #[test]
    fn end_of_input_is_a_sentinel() {
        let mut cursor = Cursor::new("x", "t.c");
        assert_eq!(cursor.advance(), Some('x'));
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_second(), None);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position().offset, 1);
    }

    #[test]
    fn multibyte_characters_advance_offset_by_utf8_len() {
        let mut cursor = Cursor::new("ñx", "t.c");
        cursor.advance();
        let pos = cursor.position();
        assert_eq!(pos.offset, 2);
        assert_eq!(pos.column, 2);
        assert_eq!(cursor.rest(), "x");
    }

    #[test]
    fn eat_and_eat_while() {
        let mut cursor = Cursor::new("==abc1 rest", "t.c");
        assert!(cursor.eat('='));
        assert!(!cursor.eat('!'));
        assert!(cursor.eat('='));
        let start = cursor.position();
        cursor.eat_while(|c| c.is_ascii_alphanumeric());
        assert_eq!(cursor.slice_from(start.offset), "abc1");
        let span = cursor.span_from(start);
        assert_eq!(span.file, "t.c");
        assert_eq!(span.range(), 2..6);
    }
}
