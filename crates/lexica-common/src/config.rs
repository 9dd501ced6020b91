use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a pass reacts to a per-token error (unexpected character, malformed
/// number, invalid escape). Unterminated comments and strings always halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
    /// Stop at the first error.
    #[default]
    Halt,
    /// Drop the offending token, resynchronize, and keep collecting errors.
    Collect,
}

/// Lexer settings, usually read from the `[lexer]` table of a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexerConfig {
    pub recovery: RecoveryMode,
    /// Track `/* /* */ */` depth instead of closing at the first `*/`.
    pub nested_comments: bool,
    /// Upper bound on collected errors before a `Collect` pass gives up.
    pub max_errors: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            recovery: RecoveryMode::Halt,
            nested_comments: false,
            max_errors: default_max_errors(),
        }
    }
}

fn default_max_errors() -> usize {
    64
}

impl LexerConfig {
    pub fn collecting() -> Self {
        Self {
            recovery: RecoveryMode::Collect,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_errors == 0 {
            return Err(ConfigError::Invalid(
                "[lexer] max_errors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur when loading lexer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read lexer config: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid lexer config: {0}")]
    Parse(String),
    #[error("invalid lexer config: {0}")]
    Invalid(String),
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    lexer: LexerConfig,
}

/// Parse and validate lexer configuration from a TOML string.
///
/// A document without a `[lexer]` table yields the defaults.
pub fn parse_config(content: &str) -> Result<LexerConfig, ConfigError> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    raw.lexer.validate()?;
    Ok(raw.lexer)
}

/// Load and validate lexer configuration from a file path.
pub fn load_config(path: &Path) -> Result<LexerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, LexerConfig::default());
        assert_eq!(config.recovery, RecoveryMode::Halt);
        assert!(!config.nested_comments);
        assert_eq!(config.max_errors, 64);
    }

    #[test]
    fn parse_full_lexer_table() {
        let toml = r#"
[lexer]
recovery = "collect"
nested_comments = true
max_errors = 10
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.recovery, RecoveryMode::Collect);
        assert!(config.nested_comments);
        assert_eq!(config.max_errors, 10);
    }

    #[test]
    fn partial_table_fills_defaults() {
        let config = parse_config("[lexer]\nnested_comments = true\n").unwrap();
        assert!(config.nested_comments);
        assert_eq!(config.recovery, RecoveryMode::Halt);
    }

    #[test]
    fn unknown_recovery_mode_fails() {
        let err = parse_config("[lexer]\nrecovery = \"retry\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_field_fails() {
        let err = parse_config("[lexer]\ntab_width = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_max_errors_is_invalid() {
        let err = parse_config("[lexer]\nmax_errors = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("max_errors"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_config(Path::new("/nonexistent/lexica.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn collecting_preset() {
        let config = LexerConfig::collecting();
        assert_eq!(config.recovery, RecoveryMode::Collect);
        assert_eq!(config.max_errors, 64);
    }
}
