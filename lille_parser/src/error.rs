//! Error types for lexing and the binding API

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::span::Span;
use crate::types::Type;

/// Lexical error raised while producing tokens
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LexError {
    /// Character that starts no token
    #[error("unrecognized character '{found}' at {span}")]
    UnrecognizedCharacter { found: String, span: Span },

    /// String literal without its closing quote on the same line
    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    /// Integer out of range or unparsable real
    #[error("invalid number literal '{literal}' at {span}")]
    InvalidNumber { literal: String, span: Span },
}

impl LexError {
    /// Get the span of the error
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnrecognizedCharacter { span, .. } => span,
            LexError::UnterminatedString { span } => span,
            LexError::InvalidNumber { span, .. } => span,
        }
    }
}

/// Misuse of the binding API
///
/// These are contract violations inside the analyzer, never the result of
/// user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("'{name}' is a {ty}, not a function, and has no return type")]
    NotAFunction { name: String, ty: Type },

    #[error("'{name}' is a {ty}, not a procedure or function, and has no parameters")]
    NotCallable { name: String, ty: Type },

    #[error("'{name}' is not a constant and cannot hold a value")]
    NotAConstant { name: String },

    #[error("constant '{name}' of type {ty} cannot hold a {found} value")]
    ValueTypeMismatch { name: String, ty: Type, found: Type },
}

/// Result type for binding operations
pub type BindingResult<T> = Result<T, BindingError>;
