//! Shared error type for the lexer, parser, and interpreter.
//!
//! LOLCODE recognizes exactly two error kinds end to end: a syntax error
//! raised by the lexer or parser, and a runtime error raised by the
//! interpreter. Both carry the offending lexeme and its source line, and
//! both render to the same wire format so the CLI driver never needs to
//! know which stage failed.

use thiserror::Error;

/// Either kind of LOLCODE error, carrying enough to reproduce the exact
/// `<ErrorKind>: '<lexeme>' at line <N>\nDetails: <message>\n` display text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LolError {
    #[error("Invalid Syntax: '{lexeme}' at line {line}\nDetails: {details}\n")]
    InvalidSyntax {
        lexeme: String,
        line: u32,
        details: String,
    },

    #[error("Runtime Error: '{lexeme}' at line {line}\nDetails: {details}\n")]
    Runtime {
        lexeme: String,
        line: u32,
        details: String,
    },
}

impl LolError {
    pub fn invalid_syntax(lexeme: impl Into<String>, line: u32, details: impl Into<String>) -> Self {
        LolError::InvalidSyntax {
            lexeme: lexeme.into(),
            line,
            details: details.into(),
        }
    }

    pub fn runtime(lexeme: impl Into<String>, line: u32, details: impl Into<String>) -> Self {
        LolError::Runtime {
            lexeme: lexeme.into(),
            line,
            details: details.into(),
        }
    }

    /// The 1-based source line the error occurred on.
    pub fn line(&self) -> u32 {
        match self {
            LolError::InvalidSyntax { line, .. } | LolError::Runtime { line, .. } => *line,
        }
    }
}

/// Convenience alias used throughout the pipeline, matching the
/// `type XResult<T> = Result<T, XError>` convention of every stage.
pub type LolResult<T> = Result<T, LolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_syntax_display_matches_wire_format() {
        let err = LolError::invalid_syntax("MKAY", 4, "Unexpected Syntax");
        assert_eq!(
            err.to_string(),
            "Invalid Syntax: 'MKAY' at line 4\nDetails: Unexpected Syntax\n"
        );
    }

    #[test]
    fn runtime_display_matches_wire_format() {
        let err = LolError::runtime("0", 2, "Division by Zero");
        assert_eq!(
            err.to_string(),
            "Runtime Error: '0' at line 2\nDetails: Division by Zero\n"
        );
        assert_eq!(err.line(), 2);
    }
}
