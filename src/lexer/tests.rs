//! Unit tests for the lexer module.

use super::{lexer::tokenize, tokens::TokenKind};
use crate::Position;

#[test]
fn test_tokenize_keywords() {
    let tokens = tokenize("if else while for return let const final");

    for token in &tokens[..8] {
        assert_eq!(token.kind, TokenKind::Keyword);
    }
    assert_eq!(tokens[0].value, "if");
    assert_eq!(tokens[7].value, "final");
    assert_eq!(tokens[8].kind, TokenKind::EndOfFile);
}

#[test]
fn test_tokenize_type_keywords() {
    let tokens = tokenize("int number Result owned ref list");

    for token in &tokens[..6] {
        assert_eq!(token.kind, TokenKind::Keyword);
        assert!(token.is_type_keyword());
    }
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _underscore CamelCase");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_underscore");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert!(!tokens[3].is_type_keyword());
}

#[test]
fn test_tokenize_literals() {
    let tokens = tokenize("42 3.14 \"hi there\" 'c' true false null");

    assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[2].value, "\"hi there\"");
    assert_eq!(tokens[3].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[4].kind, TokenKind::BooleanLiteral);
    assert_eq!(tokens[5].kind, TokenKind::BooleanLiteral);
    assert_eq!(tokens[6].kind, TokenKind::NullLiteral);
}

#[test]
fn test_tokenize_string_with_escapes() {
    let tokens = tokenize(r#""a \"quoted\" word""#);

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].value, r#""a \"quoted\" word""#);
}

#[test]
fn test_tokenize_operators() {
    let tokens = tokenize("== != <= >= && || = < > + - * / % ! & ?");
    let values: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.value.as_str())
        .collect();

    assert_eq!(
        values,
        vec!["==", "!=", "<=", ">=", "&&", "||", "=", "<", ">", "+", "-", "*", "/", "%", "!", "&", "?"]
    );
}

#[test]
fn test_tokenize_punctuators() {
    let tokens = tokenize("( ) { } [ ] ; , . :");

    for token in &tokens[..10] {
        assert_eq!(token.kind, TokenKind::Punctuator);
    }
}

#[test]
fn test_tokenize_comments() {
    let tokens = tokenize("/// docs\nint x; // trailing\n/* block\ncomment */ y");

    assert_eq!(tokens[0].kind, TokenKind::DocComment);
    assert_eq!(tokens[0].value, "/// docs");
    assert_eq!(tokens[4].kind, TokenKind::Comment);
    assert_eq!(tokens[4].value, "// trailing");
    assert_eq!(tokens[5].kind, TokenKind::Comment);
    assert_eq!(tokens[6].value, "y");
    assert_eq!(tokens[6].span.start, Position::new(4, 12));
}

#[test]
fn test_tokenize_positions() {
    let tokens = tokenize("int x = 5;\n  return x;");

    assert_eq!(tokens[0].span.start, Position::new(1, 1));
    assert_eq!(tokens[0].span.end, Position::new(1, 4));
    assert_eq!(tokens[1].span.start, Position::new(1, 5));
    assert_eq!(tokens[5].value, "return");
    assert_eq!(tokens[5].span.start, Position::new(2, 3));
}

#[test]
fn test_tokenize_unknown_character() {
    let tokens = tokenize("int @ x");

    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].value, "@");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn test_tokenize_empty() {
    let tokens = tokenize("");

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EndOfFile);
}
