//! Error types for the FluentPath engine
//!
//! Lexing and parsing errors carry the offset of the offending character or
//! token. Absent data is never an error: it propagates as an empty collection.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// FluentPath errors, one variant per pipeline stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Malformed input detected while tokenizing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Lex error at offset {offset}: {message}")]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

impl LexError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Token stream that does not form a valid expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error at offset {offset}: expected {expected}, found {found}")]
pub struct ParseError {
    pub offset: usize,
    pub expected: String,
    pub found: String,
}

impl ParseError {
    pub fn new(offset: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Failures raised while walking a well-formed expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Undefined external constant: %{0}")]
    UndefinedConstant(String),

    #[error("Cannot compare {left} {operator} {right}")]
    IncomparableOperands {
        operator: String,
        left: String,
        right: String,
    },
}

impl Error {
    /// Source offset for lexing and parsing failures
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Lex(e) => Some(e.offset),
            Error::Parse(e) => Some(e.offset),
            Error::Eval(_) => None,
        }
    }
}
