//! Types shared across the lexica crates: source spans, diagnostics and
//! lexer configuration.

pub mod config;
pub mod errors;
pub mod span;

pub use config::{load_config, parse_config, ConfigError, LexerConfig, RecoveryMode};
pub use errors::{Diagnostic, DiagnosticBag, Severity};
pub use span::{Position, Span};
