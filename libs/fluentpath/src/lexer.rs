//! FluentPath lexer - tokenizes input strings
//!
//! Converts FluentPath expression strings into a stream of tokens.
//! Positions are character offsets into the source string.

use crate::error::LexError;
use crate::token::{Token, TokenType};

/// Tokenize an entire expression, including the trailing `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = token.token_type == TokenType::Eof;
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}

/// The FluentPath lexer
pub struct Lexer {
    position: usize,
    chars: Vec<char>,
    current_char: Option<char>,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            position: 0,
            chars,
            current_char,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip one comment (`//` to end of line, or `/* */`)
    fn skip_comment(&mut self) -> Result<(), LexError> {
        let start = self.position;
        self.advance(); // Skip '/'
        if self.current_char == Some('/') {
            while let Some(c) = self.current_char {
                self.advance();
                if c == '\n' {
                    break;
                }
            }
            return Ok(());
        }

        self.advance(); // Skip '*'
        while let Some(c) = self.current_char {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }
        Err(LexError::new(start, "unterminated block comment"))
    }

    /// Read an identifier
    fn read_identifier(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read an external constant name; unlike identifiers these may contain '-'
    fn read_constant_name(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.advance();
            } else {
                break;
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read a string literal: 'string'
    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        self.advance(); // Skip opening quote

        let mut value = String::new();

        while let Some(c) = self.current_char {
            match c {
                '\'' => {
                    self.advance(); // Skip closing quote
                    return Ok(value);
                }
                '\\' => {
                    self.advance(); // Skip backslash
                    let Some(escaped) = self.current_char else {
                        break;
                    };
                    match escaped {
                        'f' => value.push('\x0C'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        'u' => {
                            value.push(self.read_unicode_escape()?);
                            continue; // Already positioned after the hex digits
                        }
                        other => value.push(other),
                    }
                    self.advance();
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Err(LexError::new(start, "unterminated string literal"))
    }

    /// Read the `XXXX` of a `\uXXXX` escape; the cursor sits on the `u`
    fn read_unicode_escape(&mut self) -> Result<char, LexError> {
        let start = self.position;
        self.advance(); // Skip 'u'
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.current_char {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(h);
                    self.advance();
                }
                _ => return Err(LexError::new(start, "invalid unicode escape sequence")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| LexError::new(start, "invalid unicode code point"))
    }

    /// Read a number: digits with an optional fractional part
    fn read_number(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // A dot only belongs to the number when digits follow it; `1.empty()`
        // keeps the dot for navigation.
        if self.current_char == Some('.') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // Skip '.'
            while let Some(c) = self.current_char {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Single-character token at the current position
    fn single(&mut self, token_type: TokenType, lexeme: &str, position: usize) -> Token {
        self.advance();
        Token::new(token_type, lexeme, position)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        // Skip whitespace and comments
        loop {
            self.skip_whitespace();
            let starts_comment = self.current_char == Some('/')
                && matches!(self.peek(), Some('/') | Some('*'));
            if !starts_comment {
                break;
            }
            self.skip_comment()?;
        }

        let position = self.position;

        let Some(c) = self.current_char else {
            return Ok(Token::eof(position));
        };

        let token = match c {
            '.' => self.single(TokenType::Dot, ".", position),
            '(' => self.single(TokenType::OpenParen, "(", position),
            ')' => self.single(TokenType::CloseParen, ")", position),
            ',' => self.single(TokenType::Comma, ",", position),
            '|' => self.single(TokenType::Pipe, "|", position),
            '=' => self.single(TokenType::Equal, "=", position),
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.single(TokenType::LessThanOrEqual, "<=", position)
                } else {
                    Token::new(TokenType::LessThan, "<", position)
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.single(TokenType::GreaterThanOrEqual, ">=", position)
                } else {
                    Token::new(TokenType::GreaterThan, ">", position)
                }
            }
            '!' => {
                self.advance();
                if self.current_char != Some('=') {
                    return Err(LexError::new(position, "unexpected character: !"));
                }
                self.single(TokenType::NotEqual, "!=", position)
            }
            '\'' => Token::new(TokenType::StringLiteral, self.read_string()?, position),
            '%' => {
                self.advance();
                let ident = self.read_constant_name();
                if ident.is_empty() {
                    return Err(LexError::new(
                        position,
                        "expected constant name after '%'",
                    ));
                }
                Token::new(TokenType::ExternalConstant, ident, position)
            }
            '$' => {
                self.advance();
                let ident = self.read_identifier();
                if ident != "context" {
                    return Err(LexError::new(
                        position,
                        format!("unknown variable: ${}", ident),
                    ));
                }
                Token::new(TokenType::Context, "$context", position)
            }
            c if c.is_ascii_digit() => {
                Token::new(TokenType::NumberLiteral, self.read_number(), position)
            }
            c if c.is_alphabetic() || c == '_' => {
                let ident = self.read_identifier();
                // `string'` is read as the string 'string': a word with only
                // its closing quote still names a literal
                if self.current_char == Some('\'') {
                    self.advance();
                    return Ok(Token::new(TokenType::StringLiteral, ident, position));
                }
                // Check for keywords
                let token_type = match ident.as_str() {
                    "true" | "false" => TokenType::BooleanLiteral,
                    "and" => TokenType::And,
                    "or" => TokenType::Or,
                    "not" => TokenType::Not,
                    "in" => TokenType::In,
                    _ => TokenType::Identifier,
                };
                Token::new(token_type, ident, position)
            }
            other => {
                return Err(LexError::new(
                    position,
                    format!("unexpected character: {}", other),
                ))
            }
        };

        Ok(token)
    }
}
