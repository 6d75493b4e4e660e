//! Unit tests for the FluentPath lexer module

use ferrum_fluentpath::lexer::Lexer;
use ferrum_fluentpath::token::{Token, TokenCategory, TokenType};
use ferrum_fluentpath::{tokenize, LexError};

/// Helper function to tokenize input and collect all tokens
fn lex(input: &str) -> Vec<Token> {
    tokenize(input).unwrap_or_else(|e| panic!("failed to tokenize {:?}: {}", input, e))
}

fn types(input: &str) -> Vec<TokenType> {
    lex(input).iter().map(|t| t.token_type).collect()
}

#[test]
fn test_literal_integers() {
    let tokens = lex("42");
    assert_eq!(tokens.len(), 2); // NumberLiteral + EOF
    assert_eq!(tokens[0].token_type, TokenType::NumberLiteral);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].token_type, TokenType::Eof);
}

#[test]
fn test_literal_decimals() {
    let tokens = lex("3.14");
    assert_eq!(tokens[0].token_type, TokenType::NumberLiteral);
    assert_eq!(tokens[0].value, "3.14");
    assert_eq!(tokens.len(), 2);
}

#[test]
fn test_number_followed_by_invocation() {
    assert_eq!(
        types("1.empty()"),
        vec![
            TokenType::NumberLiteral,
            TokenType::Dot,
            TokenType::Identifier,
            TokenType::OpenParen,
            TokenType::CloseParen,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_string_literals() {
    let tokens = lex("'http://unitsofmeasure.org'");
    assert_eq!(tokens[0].token_type, TokenType::StringLiteral);
    assert_eq!(tokens[0].value, "http://unitsofmeasure.org");

    let escaped = lex(r"'it\'s'");
    assert_eq!(escaped[0].value, "it's");
}

#[test]
fn test_keywords_and_booleans() {
    assert_eq!(
        types("true and false or not in"),
        vec![
            TokenType::BooleanLiteral,
            TokenType::And,
            TokenType::BooleanLiteral,
            TokenType::Or,
            TokenType::Not,
            TokenType::In,
            TokenType::Eof,
        ]
    );
    // Keywords are case sensitive
    assert_eq!(types("AND")[0], TokenType::Identifier);
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        types("= != <= < >= >"),
        vec![
            TokenType::Equal,
            TokenType::NotEqual,
            TokenType::LessThanOrEqual,
            TokenType::LessThan,
            TokenType::GreaterThanOrEqual,
            TokenType::GreaterThan,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_positions_are_offsets() {
    let tokens = lex("a.b = 'x'");
    let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 4, 6, 9]);
}

#[test]
fn test_external_constant_and_context() {
    let tokens = lex("system = %ucum and $context.code");
    assert_eq!(tokens[2].token_type, TokenType::ExternalConstant);
    assert_eq!(tokens[2].value, "ucum");
    assert_eq!(tokens[2].category(), TokenCategory::ExternalConstantSigil);
    assert_eq!(tokens[4].token_type, TokenType::Context);
    assert_eq!(tokens[4].category(), TokenCategory::ContextSigil);

    let tokens = lex("%vs-administrative-gender");
    assert_eq!(tokens[0].value, "vs-administrative-gender");
    assert_eq!(tokens.len(), 2);
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(types("  a \n\t . b  ").len(), 4);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("code = 'kg").unwrap_err();
    assert_eq!(err.offset, 7);
}

#[test]
fn test_unknown_character() {
    let err: LexError = tokenize("a # b").unwrap_err();
    assert_eq!(err.offset, 2);
    assert!(err.message.contains('#'));

    let err = tokenize("a ! b").unwrap_err();
    assert_eq!(err.offset, 2);
}

#[test]
fn test_lexer_streams_tokens() {
    let mut lexer = Lexer::new("a|b");
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Identifier);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Pipe);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Identifier);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Eof);
    // Eof repeats once the input is exhausted
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Eof);
}
