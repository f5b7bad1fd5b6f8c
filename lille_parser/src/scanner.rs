//! Token source consumed by the analyzer
//!
//! [`TokenSource`] is the whole contract the analyzer relies on: a current
//! token, a way to advance, and `expect`. [`Scanner`] implements it on top of
//! [`Lexer`], decoding literal values and identifiers as it goes.

use serde::{Deserialize, Serialize};

use crate::diagnostic::{DiagnosticSink, ErrorCode};
use crate::error::LexError;
use crate::lexer::{Lexer, SpannedToken};
use crate::span::Span;
use crate::token::Symbol;

/// Decoded payload of a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    None,
    Integer(i64),
    Real(f64),
    String(String),
    Boolean(bool),
    /// Upper-cased spelling; identifiers are case-insensitive
    Identifier(String),
}

/// A token as seen by the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: Symbol,
    pub value: TokenValue,
    pub span: Span,
    /// Source spelling
    pub text: String,
}

impl Token {
    /// A token that does not come from the lexer
    pub fn synthetic(symbol: Symbol, span: Span, text: impl Into<String>) -> Self {
        Self {
            symbol,
            value: TokenValue::None,
            span,
            text: text.into(),
        }
    }

    /// Identifier name used as a scope key
    pub fn identifier(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn is(&self, symbol: Symbol) -> bool {
        self.symbol == symbol
    }
}

/// Cursor over a stream of tokens
pub trait TokenSource {
    /// The token under the cursor. Once input is exhausted this is an
    /// `EndOfProgram` token, forever.
    fn current_token(&self) -> &Token;

    /// Move past the current token and return it
    fn advance(&mut self) -> Token;

    /// Lexical errors found since the last call
    fn take_lexical_errors(&mut self) -> Vec<LexError> {
        Vec::new()
    }

    fn have(&self, symbol: Symbol) -> bool {
        self.current_token().is(symbol)
    }

    /// Consume the current token if it is `symbol`.
    ///
    /// Otherwise flag "expected `symbol`" and leave the cursor where it is,
    /// so the caller carries on as if the terminal had been present.
    fn expect(&mut self, symbol: Symbol, sink: &mut dyn DiagnosticSink) -> Option<Token> {
        if self.have(symbol) {
            Some(self.advance())
        } else {
            sink.flag(self.current_token(), ErrorCode::ExpectedSymbol(symbol));
            None
        }
    }
}

/// Token source reading Lille source text
#[derive(Debug)]
pub struct Scanner<'a> {
    lexer: Lexer<'a>,
    current: Token,
    errors: Vec<LexError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let lexer = Lexer::new(source);
        let current = Token::synthetic(Symbol::EndOfProgram, lexer.eof_span(), "");
        let mut scanner = Self {
            lexer,
            current,
            errors: Vec::new(),
        };
        scanner.current = scanner.next_decoded();
        scanner
    }

    fn next_decoded(&mut self) -> Token {
        loop {
            match self.lexer.next_token() {
                Some(Ok(token)) => return self.decode(token),
                Some(Err(err)) => {
                    let illegal = match &err {
                        LexError::UnrecognizedCharacter { found, span } => {
                            Some(Token::synthetic(Symbol::Illegal, *span, found.clone()))
                        }
                        _ => None,
                    };
                    self.errors.push(err);
                    if let Some(token) = illegal {
                        return token;
                    }
                }
                None => {
                    return Token::synthetic(Symbol::EndOfProgram, self.lexer.eof_span(), "");
                }
            }
        }
    }

    fn decode(&mut self, token: SpannedToken<'_>) -> Token {
        let value = match token.symbol {
            Symbol::IntegerLiteral => match token.text.parse::<i64>() {
                Ok(n) => TokenValue::Integer(n),
                Err(_) => {
                    self.invalid_number(&token);
                    TokenValue::Integer(0)
                }
            },
            Symbol::RealLiteral => match token.text.parse::<f64>() {
                Ok(x) if x.is_finite() => TokenValue::Real(x),
                _ => {
                    self.invalid_number(&token);
                    TokenValue::Real(0.0)
                }
            },
            Symbol::StringLiteral => {
                let inner = &token.text[1..token.text.len() - 1];
                TokenValue::String(inner.replace("\"\"", "\""))
            }
            Symbol::Identifier => TokenValue::Identifier(token.text.to_ascii_uppercase()),
            Symbol::True => TokenValue::Boolean(true),
            Symbol::False => TokenValue::Boolean(false),
            _ => TokenValue::None,
        };
        Token {
            symbol: token.symbol,
            value,
            span: token.span,
            text: token.text.to_string(),
        }
    }

    fn invalid_number(&mut self, token: &SpannedToken<'_>) {
        self.errors.push(LexError::InvalidNumber {
            literal: token.text.to_string(),
            span: token.span,
        });
    }
}

impl TokenSource for Scanner<'_> {
    fn current_token(&self) -> &Token {
        &self.current
    }

    fn advance(&mut self) -> Token {
        if self.current.is(Symbol::EndOfProgram) {
            return self.current.clone();
        }
        let next = self.next_decoded();
        std::mem::replace(&mut self.current, next)
    }

    fn take_lexical_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }
}

/// Tokenize source text, ending with the end-of-program token
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.advance();
        let done = token.is(Symbol::EndOfProgram);
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
