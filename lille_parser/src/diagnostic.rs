//! Diagnostics reported by the analyzer
//!
//! Every diagnostic carries a stable numeric code. Codes are never merged:
//! each distinct failure the analyzer can detect has its own variant.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LexError;
use crate::scanner::Token;
use crate::span::Span;
use crate::token::Symbol;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // ==================== Lexical ====================
    #[error("unrecognized character")]
    UnrecognizedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid numeric literal")]
    InvalidNumber,

    // ==================== Structural ====================
    #[error("expected {0}")]
    ExpectedSymbol(Symbol),
    #[error("program name does not match the name after 'end'")]
    ProgramNameMismatch,
    #[error("text found after the end of the program")]
    MissingEndOfProgram,
    #[error("statement expected")]
    StatementExpected,
    #[error("literal or expression operand expected")]
    OperandExpected,
    #[error("parameter passing mode 'value' or 'ref' expected")]
    ParameterModeExpected,
    #[error("type name expected")]
    TypeExpected,
    #[error("declaration expected")]
    DeclarationExpected,
    #[error("block name does not match the name after 'end'")]
    BlockNameMismatch,

    // ==================== Binding ====================
    #[error("undefined identifier")]
    UndefinedIdentifier,
    #[error("identifier already declared in this scope")]
    DuplicateDeclaration,
    #[error("identifier is not a variable or ref parameter and cannot be assigned")]
    NotAssignable,
    #[error("return with a value outside a function")]
    ReturnOutsideFunction,
    #[error("identifier is not a procedure or function")]
    NotCallable,
    #[error("constant declaration requires an initializer")]
    MissingInitializer,
    #[error("functions cannot declare ref parameters")]
    RefParameterInFunction,

    // ==================== Type ====================
    #[error("assignment type mismatch")]
    AssignmentTypeMismatch,
    #[error("number of actual and formal parameters differ")]
    ParameterCountMismatch,
    #[error("initializer does not match the declared type")]
    InitializerTypeMismatch,
    #[error("operand types are incompatible")]
    IncompatibleOperands,
    #[error("actual parameter type does not match formal parameter type")]
    ParameterTypeMismatch,
    #[error("ordered type expected")]
    OrderedExpected,
    #[error("arithmetic type expected")]
    ArithmeticExpected,
    #[error("arithmetic or boolean type expected")]
    ArithmeticOrBooleanExpected,
    #[error("arithmetic or string type expected")]
    ArithmeticOrStringExpected,
    #[error("integer expected")]
    IntegerExpected,
    #[error("real expected")]
    RealExpected,
    #[error("string expected")]
    StringExpected,
    #[error("boolean expected")]
    BooleanExpected,
    #[error("procedure expected")]
    ProcedureExpected,
    #[error("function expected")]
    FunctionExpected,
    #[error("program expected")]
    ProgramExpected,
}

impl ErrorCode {
    /// Stable numeric code
    pub fn number(&self) -> u16 {
        match self {
            ErrorCode::UnrecognizedCharacter => 1,
            ErrorCode::UnterminatedString => 2,
            ErrorCode::InvalidNumber => 3,
            ErrorCode::ExpectedSymbol(_) => 10,
            ErrorCode::ProgramNameMismatch => 75,
            ErrorCode::MissingEndOfProgram => 77,
            ErrorCode::StatementExpected => 80,
            ErrorCode::UndefinedIdentifier => 81,
            ErrorCode::DuplicateDeclaration => 82,
            ErrorCode::OperandExpected => 84,
            ErrorCode::NotAssignable => 85,
            ErrorCode::ReturnOutsideFunction => 88,
            ErrorCode::NotCallable => 91,
            ErrorCode::AssignmentTypeMismatch => 93,
            ErrorCode::ParameterModeExpected => 94,
            ErrorCode::TypeExpected => 96,
            ErrorCode::ParameterCountMismatch => 98,
            ErrorCode::DeclarationExpected => 106,
            ErrorCode::BlockNameMismatch => 107,
            ErrorCode::MissingInitializer => 110,
            ErrorCode::InitializerTypeMismatch => 111,
            ErrorCode::ArithmeticExpected => 116,
            ErrorCode::IntegerExpected => 119,
            ErrorCode::BooleanExpected => 120,
            ErrorCode::IncompatibleOperands => 121,
            ErrorCode::ParameterTypeMismatch => 122,
            ErrorCode::RefParameterInFunction => 123,
            ErrorCode::OrderedExpected => 125,
            ErrorCode::ArithmeticOrBooleanExpected => 126,
            ErrorCode::RealExpected => 127,
            ErrorCode::StringExpected => 128,
            ErrorCode::ProcedureExpected => 129,
            ErrorCode::FunctionExpected => 130,
            ErrorCode::ArithmeticOrStringExpected => 131,
            ErrorCode::ProgramExpected => 132,
        }
    }
}

impl From<&LexError> for ErrorCode {
    fn from(err: &LexError) -> Self {
        match err {
            LexError::UnrecognizedCharacter { .. } => ErrorCode::UnrecognizedCharacter,
            LexError::UnterminatedString { .. } => ErrorCode::UnterminatedString,
            LexError::InvalidNumber { .. } => ErrorCode::InvalidNumber,
        }
    }
}

/// One recorded diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub span: Span,
    /// Source text of the offending token
    pub found: String,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, span: Span, found: impl Into<String>) -> Self {
        Self {
            code,
            span,
            found: found.into(),
        }
    }

    /// Format the diagnostic with the source line and a marker under it
    pub fn format_with_context(&self, source: &str) -> String {
        let Some(line) = source.lines().nth(self.span.line.saturating_sub(1)) else {
            return self.to_string();
        };
        let col = self.span.column.saturating_sub(1);
        let marker = "^".repeat(self.span.len().clamp(1, line.len().saturating_sub(col).max(1)));
        let gutter = " ".repeat(self.span.line.to_string().len());
        format!(
            "{}\n  {} | {}\n  {} | {}{}",
            self,
            self.span.line,
            line,
            gutter,
            " ".repeat(col),
            marker
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {} at {}: {}", self.code.number(), self.span, self.code)?;
        if !self.found.is_empty() {
            write!(f, " (found '{}')", self.found)?;
        }
        Ok(())
    }
}

/// Write-only destination for diagnostics
pub trait DiagnosticSink {
    /// Record one diagnostic at the position of `token`
    fn flag(&mut self, token: &Token, code: ErrorCode);
}

/// Ordered collection of diagnostics
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.items.first()
    }

    /// Numeric codes in the order they were reported
    pub fn codes(&self) -> Vec<u16> {
        self.items.iter().map(|d| d.code.number()).collect()
    }

    /// How many diagnostics carry `code`
    pub fn count(&self, code: ErrorCode) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }

    pub fn contains(&self, code: ErrorCode) -> bool {
        self.count(code) > 0
    }

    /// Format all diagnostics with source context, separated by blank lines
    pub fn format_all(&self, source: &str) -> String {
        self.items
            .iter()
            .map(|d| d.format_with_context(source))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render the diagnostics as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.items)
    }
}

impl DiagnosticSink for Diagnostics {
    fn flag(&mut self, token: &Token, code: ErrorCode) {
        tracing::debug!(code = code.number(), at = %token.span, "{}", code);
        self.push(Diagnostic::new(code, token.span, token.text.clone()));
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
