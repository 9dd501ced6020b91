//! Lexical analysis for a curly-brace, C-family language.
//!
//! [`Lexer`] turns source text into [`Token`]s, either lazily through
//! [`Lexer::next_token`] / [`Iterator`] or in one batch with
//! [`Lexer::tokenize`]. [`SymbolTable`] indexes the identifiers of a token
//! stream, and [`automata`] builds DFAs for token patterns directly from
//! regular expressions.

pub mod automata;
pub mod lexer;
pub mod symbols;

pub use lexer::{
    lex, IntegerBase, Keyword, LexError, LexErrorKind, Lexer, LiteralValue, Operator, Punctuation,
    Token, TokenKind,
};
pub use symbols::{Symbol, SymbolTable};
