pub mod cursor;
pub mod error;
pub mod operators;
pub mod token;

mod scanner;

pub use error::{LexError, LexErrorKind};
pub use operators::{Operator, Punctuation};
pub use scanner::{lex, Lexer};
pub use token::{IntegerBase, Keyword, LiteralValue, Token, TokenKind};
