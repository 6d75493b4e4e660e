//! Token types for the FluentPath lexer
//!
//! Tokens represent the lexical elements of FluentPath expressions.

use std::fmt;

/// Token types for the FluentPath lexer
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum TokenType {
    // Literals
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,

    // Identifiers
    Identifier,

    // Keywords
    And,
    Or,
    Not,
    In,

    // External constant: %identifier
    ExternalConstant,
    // Context reference: $context
    Context,

    // Operators
    Dot,                // .
    Pipe,               // |
    LessThanOrEqual,    // <=
    LessThan,           // <
    GreaterThanOrEqual, // >=
    GreaterThan,        // >
    Equal,              // =
    NotEqual,           // !=

    // Delimiters
    OpenParen,  // (
    CloseParen, // )
    Comma,      // ,

    // End of input
    Eof,
}

/// Coarse lexical category of a token
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum TokenCategory {
    Identifier,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    Keyword,
    Operator,
    Punctuation,
    ExternalConstantSigil,
    ContextSigil,
    End,
}

impl TokenType {
    pub fn category(self) -> TokenCategory {
        match self {
            TokenType::StringLiteral => TokenCategory::StringLiteral,
            TokenType::NumberLiteral => TokenCategory::NumberLiteral,
            TokenType::BooleanLiteral => TokenCategory::BooleanLiteral,
            TokenType::Identifier => TokenCategory::Identifier,
            TokenType::And | TokenType::Or | TokenType::Not | TokenType::In => {
                TokenCategory::Keyword
            }
            TokenType::ExternalConstant => TokenCategory::ExternalConstantSigil,
            TokenType::Context => TokenCategory::ContextSigil,
            TokenType::Dot
            | TokenType::Pipe
            | TokenType::LessThanOrEqual
            | TokenType::LessThan
            | TokenType::GreaterThanOrEqual
            | TokenType::GreaterThan
            | TokenType::Equal
            | TokenType::NotEqual => TokenCategory::Operator,
            TokenType::OpenParen | TokenType::CloseParen | TokenType::Comma => {
                TokenCategory::Punctuation
            }
            TokenType::Eof => TokenCategory::End,
        }
    }

    /// Human readable description used in parse errors
    pub fn describe(self) -> &'static str {
        match self {
            TokenType::StringLiteral => "string literal",
            TokenType::NumberLiteral => "number literal",
            TokenType::BooleanLiteral => "boolean literal",
            TokenType::Identifier => "identifier",
            TokenType::And => "'and'",
            TokenType::Or => "'or'",
            TokenType::Not => "'not'",
            TokenType::In => "'in'",
            TokenType::ExternalConstant => "external constant",
            TokenType::Context => "'$context'",
            TokenType::Dot => "'.'",
            TokenType::Pipe => "'|'",
            TokenType::LessThanOrEqual => "'<='",
            TokenType::LessThan => "'<'",
            TokenType::GreaterThanOrEqual => "'>='",
            TokenType::GreaterThan => "'>'",
            TokenType::Equal => "'='",
            TokenType::NotEqual => "'!='",
            TokenType::OpenParen => "'('",
            TokenType::CloseParen => "')'",
            TokenType::Comma => "','",
            TokenType::Eof => "end of input",
        }
    }
}

/// A token in the FluentPath expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    /// Lexeme text; string literals hold their unescaped content and
    /// external constants hold the name without the `%` sigil.
    pub value: String,
    /// Character offset of the first character of the token
    pub position: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, position: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self {
            token_type: TokenType::Eof,
            value: String::new(),
            position,
        }
    }

    pub fn category(&self) -> TokenCategory {
        self.token_type.category()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("end of input"),
            TokenType::StringLiteral => write!(f, "string literal '{}'", self.value),
            TokenType::ExternalConstant => write!(f, "'%{}'", self.value),
            TokenType::Identifier | TokenType::NumberLiteral | TokenType::BooleanLiteral => {
                write!(f, "{} '{}'", self.token_type.describe(), self.value)
            }
            other => f.write_str(other.describe()),
        }
    }
}
