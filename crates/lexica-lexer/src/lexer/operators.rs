//! Operator and punctuation classification.
//!
//! Every multi-character operator lives in one table ordered by descending
//! length, so the first entry that prefixes the remaining input is the
//! longest match. Adding an operator means adding a row; the scanner never
//! changes.

use serde::Serialize;
use std::fmt;

use super::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    LessLessEqual,       // <<=
    GreaterGreaterEqual, // >>=
    EqualEqual,          // ==
    BangEqual,           // !=
    LessEqual,           // <=
    GreaterEqual,        // >=
    AmpAmp,              // &&
    PipePipe,            // ||
    PlusPlus,            // ++
    MinusMinus,          // --
    PlusEqual,           // +=
    MinusEqual,          // -=
    StarEqual,           // *=
    SlashEqual,          // /=
    PercentEqual,        // %=
    AmpEqual,            // &=
    PipeEqual,           // |=
    CaretEqual,          // ^=
    LessLess,            // <<
    GreaterGreater,      // >>
    Arrow,               // ->
    Plus,                // +
    Minus,               // -
    Star,                // *
    Slash,               // /
    Percent,             // %
    Equal,               // =
    Less,                // <
    Greater,             // >
    Bang,                // !
    Amp,                 // &
    Pipe,                // |
    Caret,               // ^
    Tilde,               // ~
    Question,            // ?
    Colon,               // :
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Punctuation {
    Semicolon,    // ;
    Comma,        // ,
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Dot,          // .
}

/// Longest-match table: sorted by descending text length.
static TABLE: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::Operator(Operator::LessLessEqual)),
    (">>=", TokenKind::Operator(Operator::GreaterGreaterEqual)),
    ("==", TokenKind::Operator(Operator::EqualEqual)),
    ("!=", TokenKind::Operator(Operator::BangEqual)),
    ("<=", TokenKind::Operator(Operator::LessEqual)),
    (">=", TokenKind::Operator(Operator::GreaterEqual)),
    ("&&", TokenKind::Operator(Operator::AmpAmp)),
    ("||", TokenKind::Operator(Operator::PipePipe)),
    ("++", TokenKind::Operator(Operator::PlusPlus)),
    ("--", TokenKind::Operator(Operator::MinusMinus)),
    ("+=", TokenKind::Operator(Operator::PlusEqual)),
    ("-=", TokenKind::Operator(Operator::MinusEqual)),
    ("*=", TokenKind::Operator(Operator::StarEqual)),
    ("/=", TokenKind::Operator(Operator::SlashEqual)),
    ("%=", TokenKind::Operator(Operator::PercentEqual)),
    ("&=", TokenKind::Operator(Operator::AmpEqual)),
    ("|=", TokenKind::Operator(Operator::PipeEqual)),
    ("^=", TokenKind::Operator(Operator::CaretEqual)),
    ("<<", TokenKind::Operator(Operator::LessLess)),
    (">>", TokenKind::Operator(Operator::GreaterGreater)),
    ("->", TokenKind::Operator(Operator::Arrow)),
    ("+", TokenKind::Operator(Operator::Plus)),
    ("-", TokenKind::Operator(Operator::Minus)),
    ("*", TokenKind::Operator(Operator::Star)),
    ("/", TokenKind::Operator(Operator::Slash)),
    ("%", TokenKind::Operator(Operator::Percent)),
    ("=", TokenKind::Operator(Operator::Equal)),
    ("<", TokenKind::Operator(Operator::Less)),
    (">", TokenKind::Operator(Operator::Greater)),
    ("!", TokenKind::Operator(Operator::Bang)),
    ("&", TokenKind::Operator(Operator::Amp)),
    ("|", TokenKind::Operator(Operator::Pipe)),
    ("^", TokenKind::Operator(Operator::Caret)),
    ("~", TokenKind::Operator(Operator::Tilde)),
    ("?", TokenKind::Operator(Operator::Question)),
    (":", TokenKind::Operator(Operator::Colon)),
    (";", TokenKind::Punctuation(Punctuation::Semicolon)),
    (",", TokenKind::Punctuation(Punctuation::Comma)),
    ("(", TokenKind::Punctuation(Punctuation::LeftParen)),
    (")", TokenKind::Punctuation(Punctuation::RightParen)),
    ("{", TokenKind::Punctuation(Punctuation::LeftBrace)),
    ("}", TokenKind::Punctuation(Punctuation::RightBrace)),
    ("[", TokenKind::Punctuation(Punctuation::LeftBracket)),
    ("]", TokenKind::Punctuation(Punctuation::RightBracket)),
    (".", TokenKind::Punctuation(Punctuation::Dot)),
];

/// Find the longest operator or punctuation that prefixes `rest`.
pub fn longest_match(rest: &str) -> Option<(&'static str, TokenKind)> {
    TABLE
        .iter()
        .find(|(text, _)| rest.starts_with(text))
        .map(|&(text, kind)| (text, kind))
}

fn text_of(kind: TokenKind) -> &'static str {
    TABLE
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(text, _)| *text)
        .unwrap_or("")
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        text_of(TokenKind::Operator(self))
    }
}

impl Punctuation {
    pub fn as_str(self) -> &'static str {
        text_of(TokenKind::Punctuation(self))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_longest_first() {
        for pair in TABLE.windows(2) {
            assert!(
                pair[0].0.len() >= pair[1].0.len(),
                "{:?} listed before longer {:?}",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn table_has_no_duplicates() {
        for (i, (text, kind)) in TABLE.iter().enumerate() {
            for (other_text, other_kind) in &TABLE[i + 1..] {
                assert_ne!(text, other_text);
                assert_ne!(kind, other_kind);
            }
        }
    }

    #[test]
    fn every_prefix_is_itself_an_entry() {
        // Falling back one character at a time must always land on an entry.
        for (text, _) in TABLE {
            for end in 1..text.len() {
                let prefix = &text[..end];
                assert!(
                    TABLE.iter().any(|(t, _)| *t == prefix),
                    "prefix {:?} of {:?} missing",
                    prefix,
                    text
                );
            }
        }
    }

    #[test]
    fn longest_match_prefers_multi_character() {
        assert_eq!(
            longest_match("==1"),
            Some(("==", TokenKind::Operator(Operator::EqualEqual)))
        );
        assert_eq!(
            longest_match("=1"),
            Some(("=", TokenKind::Operator(Operator::Equal)))
        );
        assert_eq!(
            longest_match("<<=x"),
            Some(("<<=", TokenKind::Operator(Operator::LessLessEqual)))
        );
        assert_eq!(
            longest_match("&x"),
            Some(("&", TokenKind::Operator(Operator::Amp)))
        );
        assert_eq!(longest_match("@"), None);
    }

    #[test]
    fn every_accepted_character_starts_an_entry() {
        for c in "+-*/%=<>!&|^~?:;,(){}[].".chars() {
            let text = c.to_string();
            assert!(longest_match(&text).is_some(), "{:?}", c);
        }
        for c in "@#$`\\'\"a1_ ".chars() {
            let text = c.to_string();
            assert!(longest_match(&text).is_none(), "{:?}", c);
        }
    }

    #[test]
    fn as_str_round_trips_through_table() {
        assert_eq!(Operator::AmpAmp.as_str(), "&&");
        assert_eq!(Operator::GreaterEqual.to_string(), ">=");
        assert_eq!(Punctuation::LeftBrace.as_str(), "{");
        assert_eq!(Punctuation::Dot.to_string(), ".");
    }
}
