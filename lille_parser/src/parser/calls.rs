//! Actual parameter lists and call checking

use crate::binding::BindingId;
use crate::diagnostic::ErrorCode;
use crate::scanner::{Token, TokenSource};
use crate::token::Symbol;
use crate::types::Type;

use crate::parser::Parser;

impl<S: TokenSource> Parser<S> {
    /// `<expr_list> ::= <expr> { , <expr> }*`, returning each type in order
    pub(crate) fn expr_list(&mut self) -> Vec<Type> {
        self.traced("expr_list", |p| {
            let mut types = vec![p.expr()];
            while p.have(Symbol::Comma) {
                p.advance();
                types.push(p.expr());
            }
            types
        })
    }

    /// Optional `( [<expr_list>] )` after a callee name
    pub(crate) fn actual_parameters(&mut self) -> Vec<Type> {
        if !self.have(Symbol::LParen) {
            return Vec::new();
        }
        self.advance();
        let actuals = if self.current().symbol.starts_expr() {
            self.expr_list()
        } else {
            Vec::new()
        };
        self.must_be(Symbol::RParen);
        actuals
    }

    /// Check actual parameter types against the formals of `callee`.
    ///
    /// A call earns at most one diagnostic: a count mismatch wins over type
    /// mismatches, and formals or actuals that are already `Unknown` are not
    /// compared.
    /// Types must match exactly; there is no widening at a call.
    pub(crate) fn check_call(&mut self, call: &Token, callee: BindingId, actuals: &[Type]) {
        let formals: Vec<Type> = match self.scopes.get(callee).parameters() {
            Ok(ids) => ids.iter().map(|id| self.scopes.get(*id).ty()).collect(),
            Err(err) => unreachable!("{err}"),
        };

        if formals.len() != actuals.len() {
            self.flag(call, ErrorCode::ParameterCountMismatch);
            return;
        }

        let mismatch = formals
            .iter()
            .zip(actuals)
            .filter(|(formal, actual)| **formal != Type::Unknown && **actual != Type::Unknown)
            .any(|(formal, actual)| actual != formal);
        if mismatch {
            self.flag(call, ErrorCode::ParameterTypeMismatch);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::Parser;
    use crate::scanner::Scanner;
    use crate::types::Type;

    fn infer(source: &str) -> (Type, Vec<u16>) {
        let (ty, diagnostics) = Parser::new(Scanner::new(source)).parse_expression();
        (ty, diagnostics.codes())
    }

    #[test]
    fn test_builtin_calls() {
        assert_eq!(infer("INT2REAL(1)"), (Type::Real, vec![]));
        assert_eq!(infer("real2int(2.5)"), (Type::Integer, vec![]));
        assert_eq!(infer("INT2STRING(7)"), (Type::String, vec![]));
        assert_eq!(infer("REAL2STRING(0.5)"), (Type::String, vec![]));
    }

    #[test]
    fn test_no_widening_at_call() {
        assert_eq!(infer("INT2REAL(1.0)"), (Type::Real, vec![122]));
    }

    #[test]
    fn test_count_mismatch_wins() {
        assert_eq!(infer("INT2REAL(true, 2)"), (Type::Real, vec![98]));
        assert_eq!(infer("INT2REAL()"), (Type::Real, vec![98]));
        assert_eq!(infer("INT2REAL"), (Type::Real, vec![98]));
    }

    #[test]
    fn test_unknown_actual_is_not_compared() {
        assert_eq!(infer("INT2REAL(nothing)"), (Type::Real, vec![81]));
    }

    #[test]
    fn test_untyped_formal_is_not_compared() {
        let source = "program P is \
                        procedure Q(a : value intger) is begin null; end Q; \
                      begin Q(1); end P;";
        let (diagnostics, _) = Parser::new(Scanner::new(source)).parse_program();
        assert_eq!(diagnostics.codes(), vec![96]);
    }
}
