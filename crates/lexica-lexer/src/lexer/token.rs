use lexica_common::Span;
use serde::Serialize;
use std::fmt;

use super::operators::{Operator, Punctuation};

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text, escapes and quotes included.
    pub lexeme: String,
    /// Decoded value, present only for literals.
    pub value: Option<LiteralValue>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            value: None,
            span,
        }
    }

    pub fn literal(
        kind: TokenKind,
        lexeme: impl Into<String>,
        value: LiteralValue,
        span: Span,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            value: Some(value),
            span,
        }
    }

    pub fn end_of_input(span: Span) -> Self {
        Self::new(TokenKind::EndOfInput, "", span)
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// Decoded text of a string literal.
    pub fn string_value(&self) -> Option<&str> {
        match self.value {
            Some(LiteralValue::String(ref s)) => Some(s),
            _ => None,
        }
    }

    /// Magnitude of an integer literal; `None` if absent or overflowed.
    pub fn integer_value(&self) -> Option<u64> {
        match self.value {
            Some(LiteralValue::Integer { value, .. }) => value,
            _ => None,
        }
    }

    pub fn float_value(&self) -> Option<f64> {
        match self.value {
            Some(LiteralValue::Float { value, .. }) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.lexeme)
    }
}

/// Token classification. Closed per grammar version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword(Keyword),
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Operator(Operator),
    Punctuation(Punctuation),
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => f.write_str("Identifier"),
            TokenKind::Keyword(kw) => write!(f, "Keyword({})", kw),
            TokenKind::IntegerLiteral => f.write_str("IntegerLiteral"),
            TokenKind::FloatLiteral => f.write_str("FloatLiteral"),
            TokenKind::StringLiteral => f.write_str("StringLiteral"),
            TokenKind::Operator(op) => write!(f, "Operator({})", op),
            TokenKind::Punctuation(p) => write!(f, "Punctuation({})", p),
            TokenKind::EndOfInput => f.write_str("EndOfInput"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegerBase {
    Decimal,
    Hex,
}

impl IntegerBase {
    pub fn radix(self) -> u32 {
        match self {
            IntegerBase::Decimal => 10,
            IntegerBase::Hex => 16,
        }
    }
}

/// Decoded literal payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    /// `value` is `None` when the magnitude does not fit in `u64`.
    Integer {
        value: Option<u64>,
        base: IntegerBase,
    },
    Float {
        value: f64,
        /// Written with an exponent, e.g. `1.6e-19`.
        scientific: bool,
    },
    String(String),
}

/// Reserved words. Identifier-shaped lexemes in this set become `Keyword`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Auto,
    Bool,
    Break,
    Case,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    False,
    Float,
    For,
    If,
    Int,
    Long,
    New,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    String,
    Struct,
    Switch,
    This,
    True,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
}

impl Keyword {
    /// Try to match a fully scanned identifier to a keyword.
    pub fn lookup(s: &str) -> Option<Keyword> {
        match s {
            "auto" => Some(Keyword::Auto),
            "bool" => Some(Keyword::Bool),
            "break" => Some(Keyword::Break),
            "case" => Some(Keyword::Case),
            "char" => Some(Keyword::Char),
            "class" => Some(Keyword::Class),
            "const" => Some(Keyword::Const),
            "continue" => Some(Keyword::Continue),
            "default" => Some(Keyword::Default),
            "do" => Some(Keyword::Do),
            "double" => Some(Keyword::Double),
            "else" => Some(Keyword::Else),
            "enum" => Some(Keyword::Enum),
            "extern" => Some(Keyword::Extern),
            "false" => Some(Keyword::False),
            "float" => Some(Keyword::Float),
            "for" => Some(Keyword::For),
            "if" => Some(Keyword::If),
            "int" => Some(Keyword::Int),
            "long" => Some(Keyword::Long),
            "new" => Some(Keyword::New),
            "private" => Some(Keyword::Private),
            "protected" => Some(Keyword::Protected),
            "public" => Some(Keyword::Public),
            "return" => Some(Keyword::Return),
            "short" => Some(Keyword::Short),
            "signed" => Some(Keyword::Signed),
            "sizeof" => Some(Keyword::Sizeof),
            "static" => Some(Keyword::Static),
            "string" => Some(Keyword::String),
            "struct" => Some(Keyword::Struct),
            "switch" => Some(Keyword::Switch),
            "this" => Some(Keyword::This),
            "true" => Some(Keyword::True),
            "typedef" => Some(Keyword::Typedef),
            "union" => Some(Keyword::Union),
            "unsigned" => Some(Keyword::Unsigned),
            "void" => Some(Keyword::Void),
            "volatile" => Some(Keyword::Volatile),
            "while" => Some(Keyword::While),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Auto => "auto",
            Keyword::Bool => "bool",
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Char => "char",
            Keyword::Class => "class",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Default => "default",
            Keyword::Do => "do",
            Keyword::Double => "double",
            Keyword::Else => "else",
            Keyword::Enum => "enum",
            Keyword::Extern => "extern",
            Keyword::False => "false",
            Keyword::Float => "float",
            Keyword::For => "for",
            Keyword::If => "if",
            Keyword::Int => "int",
            Keyword::Long => "long",
            Keyword::New => "new",
            Keyword::Private => "private",
            Keyword::Protected => "protected",
            Keyword::Public => "public",
            Keyword::Return => "return",
            Keyword::Short => "short",
            Keyword::Signed => "signed",
            Keyword::Sizeof => "sizeof",
            Keyword::Static => "static",
            Keyword::String => "string",
            Keyword::Struct => "struct",
            Keyword::Switch => "switch",
            Keyword::This => "this",
            Keyword::True => "true",
            Keyword::Typedef => "typedef",
            Keyword::Union => "union",
            Keyword::Unsigned => "unsigned",
            Keyword::Void => "void",
            Keyword::Volatile => "volatile",
            Keyword::While => "while",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
