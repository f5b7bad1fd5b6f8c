//! Statement analysis

use crate::binding::{Binding, Kind};
use crate::diagnostic::ErrorCode;
use crate::scanner::TokenSource;
use crate::token::Symbol;
use crate::types::Type;

use crate::parser::Parser;

impl<S: TokenSource> Parser<S> {
    // ==================== Statement Lists ====================

    /// `<statement_list> ::= <statement> ; { <statement> ; }*`
    pub(crate) fn statement_list(&mut self) {
        self.traced("statement_list", |p| {
            p.statement();
            p.must_be(Symbol::Semicolon);
            while p.current().symbol.starts_statement() {
                p.statement();
                p.must_be(Symbol::Semicolon);
            }
        })
    }

    /// `<statement> ::= <simple_statement> | <compound_statement>`
    fn statement(&mut self) {
        let symbol = self.current().symbol;
        if symbol.starts_simple_statement() {
            self.simple_statement();
        } else if symbol.starts_compound_statement() {
            self.compound_statement();
        } else {
            self.flag_current(ErrorCode::StatementExpected);
        }
    }

    // ==================== Simple Statements ====================

    fn simple_statement(&mut self) {
        self.traced("simple_statement", |p| match p.current().symbol {
            Symbol::Identifier => p.identifier_statement(),
            Symbol::Exit => p.exit_statement(),
            Symbol::Return => p.return_statement(),
            Symbol::Read => p.read_statement(),
            Symbol::Write => p.write_statement(true),
            Symbol::Writeln => p.write_statement(false),
            _ => {
                p.must_be(Symbol::Null);
            }
        })
    }

    /// `<ident> := <expr>` or a procedure call `<ident> [ ( <expr_list> ) ]`
    fn identifier_statement(&mut self) {
        let target = self.advance();
        let entry = target.identifier().and_then(|name| self.scopes.lookup_id(name));
        let Some(id) = entry else {
            self.flag(&target, ErrorCode::UndefinedIdentifier);
            if self.have(Symbol::Becomes) {
                self.advance();
                self.expr();
            } else {
                self.actual_parameters();
            }
            return;
        };

        if self.have(Symbol::Becomes) {
            self.advance();
            let value = self.expr();
            let binding = self.scopes.get(id);
            let (kind, ty) = (binding.kind(), binding.ty());
            if !kind.is_assignable() {
                self.flag(&target, ErrorCode::NotAssignable);
            } else if value != Type::Unknown && ty != Type::Unknown && value != ty {
                self.flag(&target, ErrorCode::AssignmentTypeMismatch);
            }
            return;
        }

        if self.scopes.get(id).ty() == Type::Procedure {
            let actuals = self.actual_parameters();
            self.check_call(&target, id, &actuals);
        } else {
            self.flag(&target, ErrorCode::NotCallable);
            self.actual_parameters();
        }
    }

    /// `exit [ when <expr> ]`
    fn exit_statement(&mut self) {
        self.must_be(Symbol::Exit);
        if self.have(Symbol::When) {
            self.advance();
            self.condition();
        }
    }

    /// `return [ <expr> ]`
    fn return_statement(&mut self) {
        let keyword = self.advance();
        if !self.current().symbol.starts_expr() {
            return;
        }
        let start = self.current().clone();
        let value = self.expr();

        let function = self
            .callables
            .last()
            .map(|id| self.scopes.get(*id))
            .filter(|callable| callable.is_function())
            .map(Binding::return_type);
        match function {
            Some(Ok(expected)) => {
                self.must_be_type(&start, value, expected);
            }
            Some(Err(err)) => unreachable!("{err}"),
            None => self.flag(&keyword, ErrorCode::ReturnOutsideFunction),
        }
    }

    /// `read [(] <ident_list> [)]`
    fn read_statement(&mut self) {
        self.must_be(Symbol::Read);
        let parenthesized = self.have(Symbol::LParen);
        if parenthesized {
            self.advance();
        }

        for target in self.ident_list() {
            let entry = target.identifier().and_then(|name| self.scopes.lookup(name));
            match entry.map(Binding::kind) {
                None => self.flag(&target, ErrorCode::UndefinedIdentifier),
                Some(kind) if !kind.is_assignable() => {
                    self.flag(&target, ErrorCode::NotAssignable)
                }
                Some(_) => {}
            }
        }

        if parenthesized {
            self.must_be(Symbol::RParen);
        }
    }

    /// `write [(] <expr_list> [)]` and `writeln [(] [<expr_list>] [)]`
    fn write_statement(&mut self, needs_argument: bool) {
        self.advance();
        let parenthesized = self.have(Symbol::LParen);
        if parenthesized {
            self.advance();
        }

        if needs_argument || self.current().symbol.starts_expr() {
            self.expr_list();
        }

        if parenthesized {
            self.must_be(Symbol::RParen);
        }
    }

    // ==================== Compound Statements ====================

    fn compound_statement(&mut self) {
        self.traced("compound_statement", |p| match p.current().symbol {
            Symbol::If => p.if_statement(),
            Symbol::While => p.while_statement(),
            Symbol::For => p.for_statement(),
            _ => p.loop_statement(),
        })
    }

    /// ```text
    /// <if> ::= if <expr> then <statement_list>
    ///          { elsif <expr> then <statement_list> }*
    ///          [ else <statement_list> ]
    ///          end if
    /// ```
    fn if_statement(&mut self) {
        self.must_be(Symbol::If);
        self.condition();
        self.must_be(Symbol::Then);
        self.statement_list();

        while self.have(Symbol::Elsif) {
            self.advance();
            self.condition();
            self.must_be(Symbol::Then);
            self.statement_list();
        }

        if self.have(Symbol::Else) {
            self.advance();
            self.statement_list();
        }

        self.must_be(Symbol::End);
        self.must_be(Symbol::If);
    }

    /// `<while> ::= while <expr> <loop>`
    fn while_statement(&mut self) {
        self.must_be(Symbol::While);
        self.condition();
        self.loop_statement();
    }

    /// `<for> ::= for <ident> in [reverse] <range> <loop>`
    ///
    /// The loop index lives in a scope of its own.
    fn for_statement(&mut self) {
        self.must_be(Symbol::For);
        self.scopes.enter_scope();

        if let Some(index) = self.must_be(Symbol::Identifier) {
            if let Some(name) = index.identifier() {
                let binding = Binding::new(
                    name,
                    Type::Integer,
                    Kind::ForLoopIndex,
                    self.scopes.current_level(),
                )
                .with_span(index.span);
                self.scopes.declare(binding);
            }
        }

        self.must_be(Symbol::In);
        if self.have(Symbol::Reverse) {
            self.advance();
        }
        self.range();
        self.loop_statement();

        self.scopes.exit_scope();
    }

    /// `<loop> ::= loop <statement_list> end loop`
    fn loop_statement(&mut self) {
        self.must_be(Symbol::Loop);
        self.statement_list();
        self.must_be(Symbol::End);
        self.must_be(Symbol::Loop);
    }

    /// A boolean expression controlling `if`, `elsif`, `while` or `exit when`
    fn condition(&mut self) {
        let start = self.current().clone();
        let ty = self.expr();
        self.must_be_type(&start, ty, Type::Boolean);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parser::Parser;
    use crate::scanner::Scanner;

    /// Analyze `statements` inside a program declaring a few variables
    fn codes(statements: &str) -> Vec<u16> {
        let source = format!(
            "program P is \
               i : integer; r : real; s : string; b : boolean; \
               k : constant integer := 1; \
               procedure Q(a : value integer) is begin null; end Q; \
               function F(a : value integer) return integer is begin return a; end F; \
             begin {statements} end P;"
        );
        let (diagnostics, _) = Parser::new(Scanner::new(&source)).parse_program();
        diagnostics.codes()
    }

    #[test]
    fn test_assignments() {
        assert!(codes("i := 1; r := 2.5; s := \"x\"; b := true;").is_empty());
    }

    #[test]
    fn test_assignment_type_mismatch() {
        assert_eq!(codes("i := 2.5;"), vec![93]);
        assert_eq!(codes("r := 1;"), vec![93]);
    }

    #[test]
    fn test_assignment_to_untyped_variable() {
        let source = "program P is x : intger; begin x := 1; end P;";
        let (diagnostics, _) = Parser::new(Scanner::new(source)).parse_program();
        assert_eq!(diagnostics.codes(), vec![96]);
    }

    #[test]
    fn test_assignment_to_constant() {
        assert_eq!(codes("k := 2;"), vec![85]);
    }

    #[test]
    fn test_assignment_to_undefined() {
        assert_eq!(codes("z := 2;"), vec![81]);
    }

    #[test]
    fn test_unknown_value_is_not_a_mismatch() {
        assert_eq!(codes("i := z;"), vec![81]);
    }

    #[test]
    fn test_procedure_call_statement() {
        assert!(codes("Q(1);").is_empty());
        assert_eq!(codes("Q;"), vec![98]);
        assert_eq!(codes("Q(1, 2);"), vec![98]);
        assert_eq!(codes("Q(true);"), vec![122]);
    }

    #[test]
    fn test_function_as_statement() {
        assert_eq!(codes("F(1);"), vec![91]);
        assert_eq!(codes("i;"), vec![91]);
    }

    #[test]
    fn test_control_flow() {
        assert!(codes(
            "if b then null; elsif i > 1 then null; else null; end if; \
             while not b loop exit when i = 3; end loop; \
             for n in reverse 1..10 loop i := n; end loop; \
             loop exit; end loop;"
        )
        .is_empty());
    }

    #[test]
    fn test_conditions_must_be_boolean() {
        assert_eq!(codes("if i then null; end if;"), vec![120]);
        assert_eq!(codes("while s loop null; end loop;"), vec![120]);
        assert_eq!(codes("loop exit when 1; end loop;"), vec![120]);
    }

    #[test]
    fn test_loop_index_is_read_only_and_scoped() {
        assert_eq!(codes("for n in 1..3 loop n := 2; end loop;"), vec![85]);
        assert_eq!(codes("for n in 1..3 loop null; end loop; i := n;"), vec![81]);
    }

    #[test]
    fn test_range_bounds_must_be_integer() {
        assert_eq!(codes("for n in 1..2.5 loop null; end loop;"), vec![119]);
    }

    #[test]
    fn test_read_targets() {
        assert!(codes("read(i, r); read s;").is_empty());
        assert_eq!(codes("read(z);"), vec![81]);
        assert_eq!(codes("read(k);"), vec![85]);
    }

    #[test]
    fn test_write_forms() {
        assert!(codes("write(1, \"a\"); write i; writeln; writeln(); writeln(r);").is_empty());
    }

    #[test]
    fn test_write_undefined_reports_once() {
        assert_eq!(codes("write(y);"), vec![81]);
    }

    #[test]
    fn test_return_outside_function() {
        assert_eq!(codes("return 1;"), vec![88]);
        assert!(codes("return;").is_empty());
    }

    #[test]
    fn test_missing_statement() {
        assert_eq!(codes(""), vec![80, 10]);
    }

    #[test]
    fn test_missing_semicolon() {
        assert_eq!(codes("null null;"), vec![10]);
    }
}
