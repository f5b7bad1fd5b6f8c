//! Symbol kinds produced by the Lille lexer
//!
//! Keywords are case-insensitive. String literals and real numbers are
//! finished by hand in [`crate::lexer`]; logos only sees their first part.

#[cfg(test)]
mod tests;

use std::fmt;

use logos::Logos;
use serde::{Deserialize, Serialize};

/// Lille symbol kinds
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"--[^\n]*")]
pub enum Symbol {
    // ==================== Keywords ====================
    #[token("program", ignore(ascii_case))]
    Program,
    #[token("is", ignore(ascii_case))]
    Is,
    #[token("begin", ignore(ascii_case))]
    Begin,
    #[token("end", ignore(ascii_case))]
    End,
    #[token("procedure", ignore(ascii_case))]
    Procedure,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("return", ignore(ascii_case))]
    Return,
    #[token("constant", ignore(ascii_case))]
    Constant,
    #[token("value", ignore(ascii_case))]
    Value,
    #[token("ref", ignore(ascii_case))]
    Ref,

    // Type names
    #[token("integer", ignore(ascii_case))]
    IntegerType,
    #[token("real", ignore(ascii_case))]
    RealType,
    #[token("string", ignore(ascii_case))]
    StringType,
    #[token("boolean", ignore(ascii_case))]
    BooleanType,

    // Control flow
    #[token("if", ignore(ascii_case))]
    If,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("elsif", ignore(ascii_case))]
    Elsif,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("in", ignore(ascii_case))]
    In,
    #[token("reverse", ignore(ascii_case))]
    Reverse,
    #[token("loop", ignore(ascii_case))]
    Loop,
    #[token("exit", ignore(ascii_case))]
    Exit,
    #[token("when", ignore(ascii_case))]
    When,

    // Input/output and no-op
    #[token("read", ignore(ascii_case))]
    Read,
    #[token("write", ignore(ascii_case))]
    Write,
    #[token("writeln", ignore(ascii_case))]
    Writeln,
    #[token("null", ignore(ascii_case))]
    Null,

    // Word operators
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("odd", ignore(ascii_case))]
    Odd,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,

    // ==================== Boolean Literals ====================
    #[token("true", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    False,

    // ==================== Punctuation ====================
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(":=")]
    Becomes,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("..")]
    Range,

    // ==================== Operators ====================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("**")]
    Power,
    #[token("&")]
    Ampersand,
    #[token("=")]
    Equals,
    #[token("<>")]
    NotEquals,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,

    // ==================== Literals ====================
    /// Digits only; the lexer extends it into a real when a fraction follows
    #[regex(r"[0-9]+")]
    IntegerLiteral,
    /// Never produced by logos directly
    RealLiteral,
    /// Opening quote; the lexer scans to the closing quote
    #[token("\"")]
    DoubleQuote,
    /// Complete string literal produced by the lexer
    StringLiteral,

    // ==================== Identifiers ====================
    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Identifier,

    // ==================== Special ====================
    /// Synthesized once the source is exhausted
    EndOfProgram,
    /// Character the lexer could not recognize
    Illegal,
}

impl Symbol {
    /// Human readable spelling used in "expected X" diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            Symbol::Program => "program",
            Symbol::Is => "is",
            Symbol::Begin => "begin",
            Symbol::End => "end",
            Symbol::Procedure => "procedure",
            Symbol::Function => "function",
            Symbol::Return => "return",
            Symbol::Constant => "constant",
            Symbol::Value => "value",
            Symbol::Ref => "ref",
            Symbol::IntegerType => "integer",
            Symbol::RealType => "real",
            Symbol::StringType => "string",
            Symbol::BooleanType => "boolean",
            Symbol::If => "if",
            Symbol::Then => "then",
            Symbol::Elsif => "elsif",
            Symbol::Else => "else",
            Symbol::While => "while",
            Symbol::For => "for",
            Symbol::In => "in",
            Symbol::Reverse => "reverse",
            Symbol::Loop => "loop",
            Symbol::Exit => "exit",
            Symbol::When => "when",
            Symbol::Read => "read",
            Symbol::Write => "write",
            Symbol::Writeln => "writeln",
            Symbol::Null => "null",
            Symbol::Not => "not",
            Symbol::Odd => "odd",
            Symbol::And => "and",
            Symbol::Or => "or",
            Symbol::True => "true",
            Symbol::False => "false",
            Symbol::Semicolon => "';'",
            Symbol::Colon => "':'",
            Symbol::Comma => "','",
            Symbol::Becomes => "':='",
            Symbol::LParen => "'('",
            Symbol::RParen => "')'",
            Symbol::Range => "'..'",
            Symbol::Plus => "'+'",
            Symbol::Minus => "'-'",
            Symbol::Star => "'*'",
            Symbol::Slash => "'/'",
            Symbol::Power => "'**'",
            Symbol::Ampersand => "'&'",
            Symbol::Equals => "'='",
            Symbol::NotEquals => "'<>'",
            Symbol::Less => "'<'",
            Symbol::LessEqual => "'<='",
            Symbol::Greater => "'>'",
            Symbol::GreaterEqual => "'>='",
            Symbol::IntegerLiteral => "integer literal",
            Symbol::RealLiteral => "real literal",
            Symbol::DoubleQuote | Symbol::StringLiteral => "string literal",
            Symbol::Identifier => "identifier",
            Symbol::EndOfProgram => "end of program",
            Symbol::Illegal => "illegal character",
        }
    }

    /// `<relop> ::= > | < | = | <> | <= | >=`
    pub fn is_relop(&self) -> bool {
        matches!(
            self,
            Symbol::Greater
                | Symbol::Less
                | Symbol::Equals
                | Symbol::NotEquals
                | Symbol::GreaterEqual
                | Symbol::LessEqual
        )
    }

    /// `<addop> ::= + | -`
    pub fn is_addop(&self) -> bool {
        matches!(self, Symbol::Plus | Symbol::Minus)
    }

    /// `<multop> ::= * | /`
    pub fn is_multop(&self) -> bool {
        matches!(self, Symbol::Star | Symbol::Slash)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Symbol::IntegerLiteral | Symbol::RealLiteral)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Symbol::True | Symbol::False)
    }

    /// Any literal allowed as a declaration initializer
    pub fn is_literal(&self) -> bool {
        self.is_number() || self.is_bool() || *self == Symbol::StringLiteral
    }

    pub fn starts_declaration(&self) -> bool {
        matches!(
            self,
            Symbol::Identifier | Symbol::Procedure | Symbol::Function
        )
    }

    pub fn starts_simple_statement(&self) -> bool {
        matches!(
            self,
            Symbol::Identifier
                | Symbol::Exit
                | Symbol::Return
                | Symbol::Read
                | Symbol::Write
                | Symbol::Writeln
                | Symbol::Null
        )
    }

    pub fn starts_compound_statement(&self) -> bool {
        matches!(self, Symbol::If | Symbol::Loop | Symbol::For | Symbol::While)
    }

    pub fn starts_statement(&self) -> bool {
        self.starts_simple_statement() || self.starts_compound_statement()
    }

    pub fn starts_expr(&self) -> bool {
        self.is_addop()
            || self.is_number()
            || self.is_bool()
            || matches!(
                self,
                Symbol::Not
                    | Symbol::Odd
                    | Symbol::LParen
                    | Symbol::Identifier
                    | Symbol::StringLiteral
            )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
