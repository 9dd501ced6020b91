//! Token patterns as deterministic automata.
//!
//! Patterns are regular expressions over two character classes, `L`
//! (letter or `_`) and `D` (decimal digit). A [`Dfa`] is built from the
//! syntax tree directly through followpos sets, without an intermediate
//! NFA, and can then be minimized.

mod dfa;
mod regex;

pub use dfa::{Dfa, FollowposEntry, Trace};
pub use regex::Regex;

use std::fmt;

/// Abstract input alphabet of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharClass {
    Letter,
    Digit,
}

impl CharClass {
    pub const ALL: [CharClass; 2] = [CharClass::Letter, CharClass::Digit];

    /// Map a source character onto the alphabet. Letters follow the
    /// scanner's identifier rule.
    pub fn classify(c: char) -> Option<CharClass> {
        if c.is_alphabetic() || c == '_' {
            Some(CharClass::Letter)
        } else if c.is_ascii_digit() {
            Some(CharClass::Digit)
        } else {
            None
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CharClass::Letter => 'L',
            CharClass::Digit => 'D',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unexpected character '{ch}' at {at} in pattern")]
    UnexpectedCharacter { ch: char, at: usize },
    #[error("unbalanced parenthesis at {at} in pattern")]
    UnbalancedParenthesis { at: usize },
    #[error("operator '{op}' is missing an operand")]
    MissingOperand { op: char },
}

/// `L(L|D)*`: the identifier rule.
pub fn identifier_dfa() -> Dfa {
    let letter_or_digit = Regex::alt(
        Regex::Symbol(CharClass::Letter),
        Regex::Symbol(CharClass::Digit),
    );
    let pattern = Regex::concat(
        Regex::Symbol(CharClass::Letter),
        Regex::star(letter_or_digit),
    );
    Dfa::from_regex(&pattern).minimize()
}

/// `D+`: the decimal integer rule.
pub fn integer_dfa() -> Dfa {
    Dfa::from_regex(&Regex::plus(Regex::Symbol(CharClass::Digit))).minimize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_follows_identifier_rule() {
        assert_eq!(CharClass::classify('a'), Some(CharClass::Letter));
        assert_eq!(CharClass::classify('_'), Some(CharClass::Letter));
        assert_eq!(CharClass::classify('ñ'), Some(CharClass::Letter));
        assert_eq!(CharClass::classify('7'), Some(CharClass::Digit));
        assert_eq!(CharClass::classify('+'), None);
        assert_eq!(CharClass::classify(' '), None);
    }

    #[test]
    fn identifier_pattern() {
        let dfa = identifier_dfa();
        for word in ["x", "PotionBrewer", "_tmp1", "a1b2"] {
            assert!(dfa.accepts(word), "{}", word);
        }
        for word in ["", "1abc", "a-b", "9"] {
            assert!(!dfa.accepts(word), "{}", word);
        }
        assert_eq!(dfa.state_count(), 2);
    }

    #[test]
    fn integer_pattern() {
        let dfa = integer_dfa();
        assert!(dfa.accepts("0"));
        assert!(dfa.accepts("42"));
        assert!(!dfa.accepts(""));
        assert!(!dfa.accepts("4a"));
        assert!(!dfa.accepts("0x1"));
        assert_eq!(dfa.state_count(), 2);
    }

    #[test]
    fn parsed_and_built_patterns_agree() {
        let parsed = Dfa::from_regex(&Regex::parse("L(L|D)*").unwrap()).minimize();
        let built = identifier_dfa();
        for word in ["", "a", "1", "a1", "1a", "ab_9", "_", "__1"] {
            assert_eq!(parsed.accepts(word), built.accepts(word), "{}", word);
        }
    }
}
