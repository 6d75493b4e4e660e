//! FluentPath parser - converts token streams to AST
//!
//! Recursive descent parser following the FluentPath precedence rules.
//! Precedence (lowest to highest):
//! 1. or
//! 2. and
//! 3. membership and comparison (in, =, !=, <=, <, >=, >)
//! 4. union (|)
//! 5. invocation chain (.), including the postfix `not()`
//! 6. term (literal, parenthesized, %constant, $context, identifier)

use crate::ast::*;
use crate::error::{ParseError, Result};
use crate::functions::{self, FunctionKind};
use crate::lexer::tokenize;
use crate::token::{Token, TokenType};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Tokenize and parse an expression string
pub fn parse(source: &str) -> Result<AstNode> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens).parse()?)
}

/// Parser for FluentPath token streams
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    recursion_depth: usize,
    /// Height of the node most recently built by a `parse_*` method
    height: usize,
}

/// Bounds both parser recursion and the height of the resulting tree
const MAX_RECURSION_DEPTH: usize = 200;

impl Parser {
    /// Create a parser over a token stream. A missing trailing `Eof` is added.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            let end = tokens
                .last()
                .map(|t| t.position + t.value.chars().count())
                .unwrap_or(0);
            tokens.push(Token::eof(end));
        }
        Self {
            tokens,
            position: 0,
            recursion_depth: 0,
            height: 0,
        }
    }

    /// Parse the entire token stream (top-level entry point)
    pub fn parse(&mut self) -> std::result::Result<AstNode, ParseError> {
        let expr = self.parse_expression()?;

        // Ensure we've consumed all input
        if !self.current_token_is(TokenType::Eof) {
            let token = self.current_token();
            return Err(ParseError::new(
                token.position,
                "end of input",
                token.to_string(),
            ));
        }

        Ok(expr)
    }

    fn current_token(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current_token().token_type == token_type
    }

    /// Consume the current token. `Eof` is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.token_type != TokenType::Eof {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, token_type: TokenType) -> std::result::Result<Token, ParseError> {
        if self.current_token_is(token_type) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(token_type.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current_token();
        ParseError::new(token.position, expected, token.to_string())
    }

    fn too_deep(&self) -> ParseError {
        ParseError::new(
            self.current_token().position,
            format!("at most {} levels of nesting", MAX_RECURSION_DEPTH),
            "deeper nesting",
        )
    }

    fn check_recursion_depth(&mut self) -> std::result::Result<(), ParseError> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    /// Record the height of a node about to be built. Long `.` chains and
    /// operator runs nest without recursing in the parser, so they are
    /// bounded here.
    fn set_height(&mut self, height: usize) -> std::result::Result<(), ParseError> {
        if height > MAX_RECURSION_DEPTH {
            return Err(self.too_deep());
        }
        self.height = height;
        Ok(())
    }

    /// Parse an expression (lowest precedence)
    fn parse_expression(&mut self) -> std::result::Result<AstNode, ParseError> {
        self.check_recursion_depth()?;
        let expr = self.parse_or_expression()?;
        self.recursion_depth -= 1;
        Ok(expr)
    }

    /// Parse or expression: expression 'or' expression
    fn parse_or_expression(&mut self) -> std::result::Result<AstNode, ParseError> {
        let mut left = self.parse_and_expression()?;
        let mut height = self.height;

        while self.current_token_is(TokenType::Or) {
            self.advance();
            let right = self.parse_and_expression()?;
            height = height.max(self.height) + 1;
            self.set_height(height)?;
            left = AstNode::BinaryExpr {
                operator: BinaryOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse and expression: expression 'and' expression
    fn parse_and_expression(&mut self) -> std::result::Result<AstNode, ParseError> {
        let mut left = self.parse_comparison_expression()?;
        let mut height = self.height;

        while self.current_token_is(TokenType::And) {
            self.advance();
            let right = self.parse_comparison_expression()?;
            height = height.max(self.height) + 1;
            self.set_height(height)?;
            left = AstNode::BinaryExpr {
                operator: BinaryOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse comparison or membership: expression ('=' | '!=' | '<' | ... | 'in') expression
    fn parse_comparison_expression(&mut self) -> std::result::Result<AstNode, ParseError> {
        let mut left = self.parse_union_expression()?;
        let mut height = self.height;

        while let Some(operator) = comparison_operator(self.current_token().token_type) {
            self.advance();
            let right = self.parse_union_expression()?;
            height = height.max(self.height) + 1;
            self.set_height(height)?;
            left = AstNode::BinaryExpr {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse union expression: chain ('|' chain)*, flattened into one node
    fn parse_union_expression(&mut self) -> std::result::Result<AstNode, ParseError> {
        let first = self.parse_invocation_expression()?;
        if !self.current_token_is(TokenType::Pipe) {
            return Ok(first);
        }

        let mut operands = vec![first];
        let mut height = self.height;
        while self.current_token_is(TokenType::Pipe) {
            self.advance(); // Skip '|'
            operands.push(self.parse_invocation_expression()?);
            height = height.max(self.height);
        }
        self.set_height(height + 1)?;
        Ok(AstNode::UnionExpr(operands))
    }

    /// Parse invocation expression: term ('.' invocation)*
    fn parse_invocation_expression(&mut self) -> std::result::Result<AstNode, ParseError> {
        let mut expr = self.parse_term()?;

        while self.current_token_is(TokenType::Dot) {
            self.advance(); // Skip '.'
            let target_height = self.height;
            expr = self.parse_invocation(Some((expr, target_height)))?;
        }

        Ok(expr)
    }

    /// Parse a term
    fn parse_term(&mut self) -> std::result::Result<AstNode, ParseError> {
        match self.current_token().token_type {
            TokenType::OpenParen => {
                self.advance(); // Skip '('
                let expr = self.parse_expression()?;
                self.expect(TokenType::CloseParen)?;
                Ok(expr)
            }
            TokenType::StringLiteral => {
                let token = self.advance();
                self.height = 1;
                Ok(AstNode::Literal(Literal::String(token.value)))
            }
            TokenType::NumberLiteral => {
                let token = self.advance();
                self.height = 1;
                parse_number(&token).map(AstNode::Literal)
            }
            TokenType::BooleanLiteral => {
                let token = self.advance();
                self.height = 1;
                Ok(AstNode::Literal(Literal::Boolean(token.value == "true")))
            }
            TokenType::ExternalConstant => {
                let token = self.advance();
                self.height = 1;
                Ok(AstNode::ExternalConstantRef(token.value))
            }
            TokenType::Context => {
                self.advance();
                self.height = 1;
                Ok(AstNode::ContextRef)
            }
            TokenType::Identifier | TokenType::Not => self.parse_invocation(None),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parse a member or function invocation applied to `target`, which
    /// comes with its height
    fn parse_invocation(
        &mut self,
        target: Option<(AstNode, usize)>,
    ) -> std::result::Result<AstNode, ParseError> {
        let (target, mut height) = match target {
            Some((node, height)) => (Some(node), height),
            None => (None, 0),
        };

        // The 'not' keyword doubles as a function name
        if !self.current_token_is(TokenType::Identifier) && !self.current_token_is(TokenType::Not)
        {
            return Err(self.unexpected("identifier"));
        }
        let ident = self.advance();

        if !self.current_token_is(TokenType::OpenParen) {
            if ident.token_type == TokenType::Not {
                return Err(self.unexpected("'('"));
            }
            self.set_height(height + 1)?;
            return Ok(AstNode::PathStep {
                target: target.map(Box::new),
                name: ident.value,
            });
        }

        let metadata = functions::lookup(&ident.value).ok_or_else(|| {
            let mut known: Vec<&str> = functions::names().collect();
            known.sort_unstable();
            ParseError::new(
                ident.position,
                format!("one of {}", known.join(", ")),
                format!("unknown function '{}'", ident.value),
            )
        })?;

        self.advance(); // Skip '('
        let mut arguments = Vec::new();
        if !self.current_token_is(TokenType::CloseParen) {
            loop {
                arguments.push(self.parse_expression()?);
                height = height.max(self.height);
                if self.current_token_is(TokenType::Comma) {
                    self.advance(); // Skip ','
                } else {
                    break;
                }
            }
        }
        self.expect(TokenType::CloseParen)?;

        if !metadata.accepts(arguments.len()) {
            return Err(ParseError::new(
                ident.position,
                format!("{} for {}()", metadata.arity(), metadata.name),
                match arguments.len() {
                    1 => "1 argument".to_string(),
                    n => format!("{} arguments", n),
                },
            ));
        }

        self.set_height(height + 1)?;
        match (metadata.kind, target) {
            (FunctionKind::Not, Some(operand)) => Ok(AstNode::UnaryExpr {
                operator: UnaryOperator::Not,
                operand: Box::new(operand),
            }),
            (function, target) => Ok(AstNode::Invocation {
                target: target.map(Box::new),
                function,
                arguments,
            }),
        }
    }
}

fn comparison_operator(token_type: TokenType) -> Option<BinaryOperator> {
    let operator = match token_type {
        TokenType::Equal => BinaryOperator::Equal,
        TokenType::NotEqual => BinaryOperator::NotEqual,
        TokenType::LessThan => BinaryOperator::LessThan,
        TokenType::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
        TokenType::GreaterThan => BinaryOperator::GreaterThan,
        TokenType::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
        TokenType::In => BinaryOperator::In,
        _ => return None,
    };
    Some(operator)
}

/// Integers that overflow `i64` fall back to decimals
fn parse_number(token: &Token) -> std::result::Result<Literal, ParseError> {
    if !token.value.contains('.') {
        if let Ok(n) = token.value.parse::<i64>() {
            return Ok(Literal::Integer(n));
        }
    }
    Decimal::from_str(&token.value)
        .map(Literal::Decimal)
        .map_err(|_| ParseError::new(token.position, "number literal", token.to_string()))
}
