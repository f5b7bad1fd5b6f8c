//! Recursive descent analyzer for Lille
//!
//! One method per grammar nonterminal. Each consumes the tokens of its
//! production, declares or resolves names through the [`ScopeManager`] and
//! returns the inferred [`Type`] where the nonterminal is an expression.
//! There is no syntax tree: diagnostics are pushed as the tokens go by and
//! parsing always carries on as if the expected terminal had been present.

mod calls;
mod declarations;
mod expressions;
mod program;
mod statements;

use crate::binding::BindingId;
use crate::config::AnalyzerConfig;
use crate::diagnostic::{DiagnosticSink, Diagnostics, ErrorCode};
use crate::error::LexError;
use crate::scanner::{Token, TokenSource};
use crate::scope::ScopeManager;
use crate::token::Symbol;
use crate::types::Type;

/// Lille analyzer
pub struct Parser<S: TokenSource> {
    /// Token cursor
    pub(crate) source: S,
    /// Everything flagged so far
    pub(crate) diagnostics: Diagnostics,
    pub(crate) scopes: ScopeManager,
    pub(crate) config: AnalyzerConfig,
    /// Procedures and functions whose bodies are being analyzed, innermost last
    pub(crate) callables: Vec<BindingId>,
    /// Nonterminal nesting, for traces
    depth: usize,
}

impl<S: TokenSource> std::fmt::Debug for Parser<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("current", &self.current().symbol)
            .field("level", &self.scopes.current_level())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

impl<S: TokenSource> Parser<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, AnalyzerConfig::default())
    }

    pub fn with_config(source: S, config: AnalyzerConfig) -> Self {
        let mut scopes = ScopeManager::new();
        scopes.set_trace(config.trace);
        let mut parser = Self {
            source,
            diagnostics: Diagnostics::new(),
            scopes,
            config,
            callables: Vec::new(),
            depth: 0,
        };
        // The first token was lexed before we got hold of the source
        parser.drain_lexical_errors();
        parser
    }

    /// Analyze a whole program
    pub fn parse_program(mut self) -> (Diagnostics, ScopeManager) {
        self.prog();
        (self.diagnostics, self.scopes)
    }

    /// Analyze one standalone expression with only the built-ins in scope
    pub fn parse_expression(mut self) -> (Type, Diagnostics) {
        self.scopes.predefine_builtins();
        let ty = self.expr();
        if !self.have(Symbol::EndOfProgram) {
            self.flag_current(ErrorCode::MissingEndOfProgram);
        }
        (ty, self.diagnostics)
    }

    // ==================== Token Management ====================

    pub(crate) fn current(&self) -> &Token {
        self.source.current_token()
    }

    pub(crate) fn have(&self, symbol: Symbol) -> bool {
        self.source.have(symbol)
    }

    /// Consume the current token, whatever it is
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.source.advance();
        self.drain_lexical_errors();
        token
    }

    /// Consume `symbol` or flag that it was expected
    pub(crate) fn must_be(&mut self, symbol: Symbol) -> Option<Token> {
        let token = self.source.expect(symbol, &mut self.diagnostics);
        self.drain_lexical_errors();
        token
    }

    fn drain_lexical_errors(&mut self) {
        for err in self.source.take_lexical_errors() {
            let found = match &err {
                LexError::UnrecognizedCharacter { found, .. } => found.clone(),
                LexError::InvalidNumber { literal, .. } => literal.clone(),
                LexError::UnterminatedString { .. } => String::new(),
            };
            let token = Token::synthetic(Symbol::Illegal, *err.span(), found);
            self.diagnostics.flag(&token, ErrorCode::from(&err));
        }
    }

    // ==================== Diagnostics ====================

    pub(crate) fn flag(&mut self, token: &Token, code: ErrorCode) {
        self.diagnostics.flag(token, code);
    }

    pub(crate) fn flag_current(&mut self, code: ErrorCode) {
        let token = self.current().clone();
        self.diagnostics.flag(&token, code);
    }

    /// Check `actual` against a concrete type or category, flagging at
    /// `token` on failure. Always hands `actual` back.
    pub(crate) fn must_be_type(&mut self, token: &Token, actual: Type, expected: Type) -> Type {
        if let Some(code) = Type::violation(actual, expected) {
            self.flag(token, code);
        }
        actual
    }

    /// Whether `actual` passed; flags at `token` like [`Self::must_be_type`]
    pub(crate) fn check_type(&mut self, token: &Token, actual: Type, expected: Type) -> bool {
        match Type::violation(actual, expected) {
            Some(code) => {
                self.flag(token, code);
                false
            }
            None => true,
        }
    }

    // ==================== Tracing ====================

    /// Run one nonterminal, tracing its entry and exit when enabled
    pub(crate) fn traced<T: std::fmt::Debug>(
        &mut self,
        nonterminal: &'static str,
        body: impl FnOnce(&mut Self) -> T,
    ) -> T {
        if self.config.trace {
            tracing::trace!(
                depth = self.depth,
                at = %self.current().span,
                token = %self.current().symbol,
                "enter <{nonterminal}>"
            );
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        if self.config.trace {
            tracing::trace!(depth = self.depth, result = ?result, "leave <{nonterminal}>");
        }
        result
    }
}
