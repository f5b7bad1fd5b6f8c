//! Tests for token module

use super::*;
use logos::Logos;

#[test]
fn test_keywords() {
    let mut lexer = Symbol::lexer("program is begin end");
    assert_eq!(lexer.next(), Some(Ok(Symbol::Program)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Is)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Begin)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::End)));
    assert_eq!(lexer.next(), None);
}

#[test]
fn test_keywords_ignore_case() {
    let mut lexer = Symbol::lexer("PROGRAM Is BeGiN writeLN");
    assert_eq!(lexer.next(), Some(Ok(Symbol::Program)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Is)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Begin)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Writeln)));
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let mut lexer = Symbol::lexer("integers ending in_range");
    assert_eq!(lexer.next(), Some(Ok(Symbol::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Identifier)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Identifier)));
}

#[test]
fn test_operators() {
    let mut lexer = Symbol::lexer("+ - * / ** & = <> < <= > >= := ..");
    assert_eq!(lexer.next(), Some(Ok(Symbol::Plus)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Minus)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Star)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Slash)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Power)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Ampersand)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Equals)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::NotEquals)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Less)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::LessEqual)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Greater)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::GreaterEqual)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Becomes)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Range)));
}

#[test]
fn test_comments_are_skipped() {
    let mut lexer = Symbol::lexer("null; -- trailing words\nnull");
    assert_eq!(lexer.next(), Some(Ok(Symbol::Null)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Semicolon)));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Null)));
    assert_eq!(lexer.next(), None);
}

#[test]
fn test_unrecognized_character() {
    let mut lexer = Symbol::lexer("x ? y");
    assert_eq!(lexer.next(), Some(Ok(Symbol::Identifier)));
    assert_eq!(lexer.next(), Some(Err(())));
    assert_eq!(lexer.next(), Some(Ok(Symbol::Identifier)));
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_relops() {
    for symbol in [
        Symbol::Greater,
        Symbol::Less,
        Symbol::Equals,
        Symbol::NotEquals,
        Symbol::GreaterEqual,
        Symbol::LessEqual,
    ] {
        assert!(symbol.is_relop(), "{symbol:?} should be a relop");
        assert!(!symbol.is_addop());
    }
    assert!(!Symbol::Becomes.is_relop());
}

#[test]
fn test_first_sets() {
    assert!(Symbol::Identifier.starts_declaration());
    assert!(Symbol::Function.starts_declaration());
    assert!(!Symbol::Begin.starts_declaration());

    assert!(Symbol::Null.starts_statement());
    assert!(Symbol::While.starts_statement());
    assert!(!Symbol::End.starts_statement());

    assert!(Symbol::Minus.starts_expr());
    assert!(Symbol::StringLiteral.starts_expr());
    assert!(Symbol::True.starts_expr());
    assert!(!Symbol::RParen.starts_expr());
}

#[test]
fn test_describe() {
    assert_eq!(Symbol::Semicolon.to_string(), "';'");
    assert_eq!(Symbol::Begin.to_string(), "begin");
    assert_eq!(Symbol::EndOfProgram.to_string(), "end of program");
}
