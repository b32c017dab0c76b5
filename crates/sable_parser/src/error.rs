//! The error a failed parse propagates to its caller.

use thiserror::Error;

/// Why a parse stopped. The matching diagnostic has already been reported to
/// the sink by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("{line}:{column}: expected expression, found {found}")]
    ExpectedExpression { line: u32, column: u32, found: String },

    #[error("{line}:{column}: unclosed '{delimiter}'")]
    UnclosedDelimiter { line: u32, column: u32, delimiter: char },

    #[error("{line}:{column}: expected a selector after '.', found {found}")]
    ExpectedSelector { line: u32, column: u32, found: String },

    #[error("{line}:{column}: integer literal '{text}' does not fit in 64 bits")]
    IntegerTooLarge { line: u32, column: u32, text: String },

    #[error("{line}:{column}: expression nested deeper than {limit} levels")]
    NestingTooDeep { line: u32, column: u32, limit: u32 },

    /// The lexer produced an invalid token; it already reported why.
    #[error("{line}:{column}: invalid token")]
    InvalidToken { line: u32, column: u32 },
}

impl SyntaxError {
    /// Line and column the error points at.
    pub fn position(&self) -> (u32, u32) {
        match *self {
            SyntaxError::ExpectedExpression { line, column, .. }
            | SyntaxError::UnclosedDelimiter { line, column, .. }
            | SyntaxError::ExpectedSelector { line, column, .. }
            | SyntaxError::IntegerTooLarge { line, column, .. }
            | SyntaxError::NestingTooDeep { line, column, .. }
            | SyntaxError::InvalidToken { line, column } => (line, column),
        }
    }
}
