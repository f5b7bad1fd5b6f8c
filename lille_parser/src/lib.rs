//! lille_parser
//!
//! Single-pass syntax and semantic analyzer for Lille, a small Ada-like
//! teaching language. Parsing, name binding and type checking happen in one
//! recursive descent; the result is a list of numbered diagnostics and the
//! symbol table the program declared.
//!
//! # Example
//!
//! ```
//! use lille_parser::{analyze, Type};
//!
//! let analysis = analyze("program P is x : integer; begin x := 1 + 2; end P;");
//! assert!(analysis.is_ok());
//!
//! let x = analysis.bindings_named("X").next().unwrap();
//! assert_eq!(x.ty(), Type::Integer);
//! ```

pub mod binding;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scanner;
pub mod scope;
pub mod span;
pub mod token;
pub mod types;

// Re-exports
pub use binding::{Binding, BindingId, ConstValue, Kind};
pub use config::AnalyzerConfig;
pub use diagnostic::{Diagnostic, DiagnosticSink, Diagnostics, ErrorCode};
pub use error::{BindingError, BindingResult, LexError};
pub use lexer::{Lexer, SpannedToken};
pub use parser::Parser;
pub use scanner::{Scanner, Token, TokenSource, TokenValue};
pub use scope::{ScopeManager, BUILTINS};
pub use span::{SourceMap, Span};
pub use token::Symbol;
pub use types::{compatible_type, Type};

/// Outcome of analyzing one program
#[derive(Debug, Clone)]
pub struct Analysis {
    pub diagnostics: Diagnostics,
    /// Every binding the program declared, built-ins included
    pub scopes: ScopeManager,
}

impl Analysis {
    /// Whether the program produced no diagnostics
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Bindings declared under `name` in any scope, in declaration order.
    /// Names are matched in their upper-cased form.
    pub fn bindings_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Binding> + 'a {
        self.scopes.bindings_named(name)
    }
}

/// Analyze a Lille program
///
/// # Example
///
/// ```
/// use lille_parser::analyze;
///
/// let analysis = analyze("program P is begin write(y); end P;");
/// assert_eq!(analysis.diagnostics.codes(), vec![81]);
/// ```
pub fn analyze(source: &str) -> Analysis {
    analyze_with_config(source, AnalyzerConfig::default())
}

/// Analyze a Lille program with explicit debug switches
pub fn analyze_with_config(source: &str, config: AnalyzerConfig) -> Analysis {
    tracing::debug!(bytes = source.len(), "analyzing program");
    let (diagnostics, scopes) = Parser::with_config(Scanner::new(source), config).parse_program();
    Analysis {
        diagnostics,
        scopes,
    }
}

/// Tokenize Lille source code
///
/// Returns every token up to and including the end-of-program token.
pub fn tokenize(source: &str) -> Vec<Token> {
    scanner::tokenize(source)
}

/// Infer the type of a standalone expression
///
/// Only the built-in conversion functions are in scope.
///
/// ```
/// use lille_parser::{infer_expression_type, Type};
///
/// let (ty, diagnostics) = infer_expression_type("INT2REAL(2) * 3");
/// assert_eq!(ty, Type::Real);
/// assert!(diagnostics.is_empty());
/// ```
pub fn infer_expression_type(source: &str) -> (Type, Diagnostics) {
    Parser::new(Scanner::new(source)).parse_expression()
}

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_minimal() {
        let analysis = analyze("program P is begin null; end P;");
        assert!(analysis.is_ok());
        assert_eq!(analysis.bindings_named("P").count(), 1);
    }

    #[test]
    fn test_builtins_are_recorded() {
        let analysis = analyze("program P is begin null; end P;");
        for (name, _, _) in BUILTINS {
            assert_eq!(analysis.bindings_named(name).count(), 1);
        }
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("x := 1;");
        assert_eq!(tokens.len(), 5);
        assert!(tokens[4].is(Symbol::EndOfProgram));
    }

    #[test]
    fn test_infer_expression_type() {
        let (ty, diagnostics) = infer_expression_type("1 + 2.0");
        assert_eq!(ty, Type::Real);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
