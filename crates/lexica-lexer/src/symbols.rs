//! Identifier table built from a token stream.

use indexmap::IndexMap;
use lexica_common::Span;
use serde::Serialize;

use crate::lexer::{Token, TokenKind};

/// One distinct identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    /// Where the identifier was first seen.
    pub first_span: Span,
    pub occurrences: usize,
}

/// Distinct identifiers in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `Identifier` token. Keywords are never entered.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut table = Self::new();
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Identifier) {
            table.insert(&token.lexeme, &token.span);
        }
        log::debug!(
            "symbol table: {} distinct identifiers from {} tokens",
            table.len(),
            tokens.len()
        );
        table
    }

    /// Record one occurrence of `name`. Returns true if it was new.
    pub fn insert(&mut self, name: &str, span: &Span) -> bool {
        if let Some(symbol) = self.symbols.get_mut(name) {
            symbol.occurrences += 1;
            return false;
        }
        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                first_span: span.clone(),
                occurrences: 1,
            },
        );
        true
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Index of `name` in first-seen order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.symbols.get_index_of(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn first_seen_order_and_counts() {
        let tokens = lex("int b = a; a = b + c; a++;").unwrap();
        let table = SymbolTable::from_tokens(&tokens);

        let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(table.get("a").unwrap().occurrences, 3);
        assert_eq!(table.get("b").unwrap().occurrences, 2);
        assert_eq!(table.get("c").unwrap().occurrences, 1);
        assert_eq!(table.index_of("c"), Some(2));
    }

    #[test]
    fn keywords_are_not_symbols() {
        let tokens = lex("int while return x").unwrap();
        let table = SymbolTable::from_tokens(&tokens);
        assert_eq!(table.len(), 1);
        assert!(table.contains("x"));
        assert!(!table.contains("int"));
    }

    #[test]
    fn first_span_is_kept() {
        let tokens = lex("x\n  x").unwrap();
        let table = SymbolTable::from_tokens(&tokens);
        let x = table.get("x").unwrap();
        assert_eq!(x.first_span.start.line, 1);
        assert_eq!(x.occurrences, 2);
    }

    #[test]
    fn insert_reports_novelty() {
        let span = Span::point("t.c", lexica_common::Position::start());
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        assert!(table.insert("foo", &span));
        assert!(!table.insert("foo", &span));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("missing"), None);
    }
}
