//! Program and block analysis

use crate::binding::{Binding, Kind};
use crate::diagnostic::ErrorCode;
use crate::scanner::TokenSource;
use crate::token::Symbol;
use crate::types::Type;

use crate::parser::Parser;

/// What a block's trailing identifier is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockOwner {
    Program,
    Callable,
}

impl BlockOwner {
    fn mismatch_code(self) -> ErrorCode {
        match self {
            BlockOwner::Program => ErrorCode::ProgramNameMismatch,
            BlockOwner::Callable => ErrorCode::BlockNameMismatch,
        }
    }
}

impl<S: TokenSource> Parser<S> {
    // ==================== Program ====================

    /// `<prog> ::= program <ident> is <block> ;`
    pub(crate) fn prog(&mut self) {
        self.traced("prog", Self::parse_prog)
    }

    fn parse_prog(&mut self) {
        self.scopes.predefine_builtins();

        self.must_be(Symbol::Program);
        let name = self.must_be(Symbol::Identifier).and_then(|token| {
            let name = token.identifier()?.to_string();
            let binding = Binding::new(name.as_str(), Type::Program, Kind::Unknown, 0)
                .with_span(token.span);
            let (_, fresh) = self.scopes.declare(binding);
            if !fresh {
                self.flag(&token, ErrorCode::DuplicateDeclaration);
            }
            Some(name)
        });
        self.must_be(Symbol::Is);

        self.scopes.enter_scope();
        self.block(name.as_deref(), BlockOwner::Program);
        if self.config.dump_scopes {
            tracing::debug!("scopes after program block\n{}", self.scopes.dump());
        }
        self.scopes.exit_scope();

        self.must_be(Symbol::Semicolon);
        if !self.have(Symbol::EndOfProgram) {
            self.flag_current(ErrorCode::MissingEndOfProgram);
        }
    }

    // ==================== Block ====================

    /// `<block> ::= { <declaration> }* begin <statement_list> end [ <ident> ]`
    ///
    /// The caller has already entered the block's scope.
    pub(crate) fn block(&mut self, name: Option<&str>, owner: BlockOwner) {
        self.traced("block", |p| p.parse_block(name, owner))
    }

    fn parse_block(&mut self, name: Option<&str>, owner: BlockOwner) {
        loop {
            let symbol = self.current().symbol;
            if symbol.starts_declaration() {
                self.declaration();
            } else if matches!(symbol, Symbol::Begin | Symbol::End | Symbol::EndOfProgram)
                || symbol.starts_statement()
            {
                break;
            } else {
                self.flag_current(ErrorCode::DeclarationExpected);
                self.advance();
            }
        }

        self.must_be(Symbol::Begin);
        self.statement_list();
        self.must_be(Symbol::End);

        if self.have(Symbol::Identifier) {
            let closing = self.advance();
            let matches = match (name, closing.identifier()) {
                (Some(expected), Some(found)) => expected == found,
                _ => true,
            };
            if !matches {
                self.flag(&closing, owner.mismatch_code());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn codes(source: &str) -> Vec<u16> {
        let (diagnostics, _) = Parser::new(Scanner::new(source)).parse_program();
        diagnostics.codes()
    }

    #[test]
    fn test_minimal_program() {
        assert!(codes("program P is begin null; end P;").is_empty());
    }

    #[test]
    fn test_closing_name_is_optional() {
        assert!(codes("program P is begin null; end;").is_empty());
    }

    #[test]
    fn test_closing_name_is_case_insensitive() {
        assert!(codes("program Main is begin null; end MAIN;").is_empty());
    }

    #[test]
    fn test_program_name_mismatch() {
        assert_eq!(codes("program P is begin null; end Q;"), vec![75]);
    }

    #[test]
    fn test_text_after_program() {
        assert_eq!(codes("program P is begin null; end P; null"), vec![77]);
    }

    #[test]
    fn test_missing_is() {
        assert_eq!(codes("program P begin null; end P;"), vec![10]);
    }

    #[test]
    fn test_junk_in_declaration_part() {
        assert_eq!(codes("program P is 42 begin null; end P;"), vec![106]);
    }

    #[test]
    fn test_program_name_declared_at_level_zero() {
        let (_, scopes) = Parser::new(Scanner::new("program P is begin null; end P;"))
            .parse_program();
        let program = scopes.lookup("P").unwrap();
        assert_eq!(program.ty(), crate::types::Type::Program);
        assert_eq!(program.level(), 0);
    }
}
