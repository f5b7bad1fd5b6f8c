//! Expression analysis
//!
//! Precedence, lowest first:
//!
//! | level         | operators              |
//! |---------------|------------------------|
//! | `expr`        | relational, `in` range |
//! | `simple_expr` | `&`                    |
//! | `expr2`       | `+ - or`               |
//! | `term`        | `* / and`              |
//! | `factor`      | unary sign, `**`       |
//! | `primary`     | atoms, `not`, `odd`    |
//!
//! Every method returns a concrete type or `Unknown`. Once an operand is
//! `Unknown` nothing more is reported about it.

use crate::diagnostic::ErrorCode;
use crate::scanner::{Token, TokenSource, TokenValue};
use crate::token::Symbol;
use crate::types::{compatible_type, Type};

use crate::parser::Parser;

impl<S: TokenSource> Parser<S> {
    // ==================== Relational ====================

    /// `<expr> ::= <simple_expr> [<relop> <simple_expr>] | <simple_expr> in <range>`
    pub(crate) fn expr(&mut self) -> Type {
        self.traced("expr", Self::parse_expr)
    }

    fn parse_expr(&mut self) -> Type {
        let lhs_start = self.current().clone();
        let lhs = self.simple_expr();

        if self.current().symbol.is_relop() {
            let op = self.advance();
            let rhs_start = self.current().clone();
            let rhs = self.simple_expr();

            let lhs_ok = self.check_type(&lhs_start, lhs, Type::ArithmeticOrBoolean);
            let rhs_ok = self.check_type(&rhs_start, rhs, Type::ArithmeticOrBoolean);
            let known = lhs != Type::Unknown && rhs != Type::Unknown;
            if lhs_ok && rhs_ok && known && lhs.is_arithmetic() != rhs.is_arithmetic() {
                self.flag(&op, ErrorCode::IncompatibleOperands);
            }
            return Type::Boolean;
        }

        if self.have(Symbol::In) {
            self.must_be_type(&lhs_start, lhs, Type::Integer);
            self.advance();
            self.range();
            return Type::Boolean;
        }

        self.must_be_type(&lhs_start, lhs, Type::Ordered)
    }

    /// `<range> ::= <simple_expr> .. <simple_expr>`, both bounds integer
    pub(crate) fn range(&mut self) {
        self.traced("range", |p| {
            p.integer_bound();
            p.must_be(Symbol::Range);
            p.integer_bound();
        })
    }

    fn integer_bound(&mut self) {
        let start = self.current().clone();
        let ty = self.simple_expr();
        self.must_be_type(&start, ty, Type::Integer);
    }

    // ==================== Binary Operators ====================

    /// `<simple_expr> ::= <expr2> { & <expr2> }*`
    fn simple_expr(&mut self) -> Type {
        self.traced("simple_expr", |p| {
            let mut ty = p.expr2();
            while p.have(Symbol::Ampersand) {
                let op = p.advance();
                let rhs = p.expr2();
                ty = p.combine(&op, ty, rhs);
            }
            ty
        })
    }

    /// `<expr2> ::= <term> { (<addop>|or) <term> }*`
    fn expr2(&mut self) -> Type {
        self.traced("expr2", |p| {
            let mut ty = p.term();
            while p.current().symbol.is_addop() || p.have(Symbol::Or) {
                let op = p.advance();
                let rhs = p.term();
                ty = p.combine(&op, ty, rhs);
            }
            ty
        })
    }

    /// `<term> ::= <factor> { (<multop>|and) <factor> }*`
    fn term(&mut self) -> Type {
        self.traced("term", |p| {
            let mut ty = p.factor();
            while p.current().symbol.is_multop() || p.have(Symbol::And) {
                let op = p.advance();
                let rhs = p.factor();
                ty = p.combine(&op, ty, rhs);
            }
            ty
        })
    }

    /// Type of `lhs op rhs`.
    ///
    /// Both operands must belong to the operator's category; the first
    /// operand that does not is flagged at the operator and the result is
    /// `Unknown`. Otherwise integer and real widen to real.
    fn combine(&mut self, op: &Token, lhs: Type, rhs: Type) -> Type {
        let category = match op.symbol {
            Symbol::And | Symbol::Or => Type::Boolean,
            Symbol::Ampersand => Type::String,
            _ => Type::Arithmetic,
        };
        if !self.check_type(op, lhs, category) || !self.check_type(op, rhs, category) {
            return Type::Unknown;
        }
        compatible_type(lhs, rhs)
    }

    // ==================== Unary ====================

    /// `<factor> ::= [<addop>] <primary> | <primary> [ ** <primary> ]`
    fn factor(&mut self) -> Type {
        self.traced("factor", |p| {
            if p.current().symbol.is_addop() {
                let sign = p.advance();
                let ty = p.primary();
                if !p.check_type(&sign, ty, Type::Arithmetic) {
                    return Type::Unknown;
                }
                return ty;
            }

            let base = p.primary();
            if !p.have(Symbol::Power) {
                return base;
            }
            let op = p.advance();
            let exponent_start = p.current().clone();
            let exponent = p.primary();

            let base_ok = p.check_type(&op, base, Type::Arithmetic);
            let exponent_ok = p.check_type(&exponent_start, exponent, Type::Integer);
            if base_ok && exponent_ok {
                compatible_type(base, exponent)
            } else {
                Type::Unknown
            }
        })
    }

    // ==================== Primary ====================

    /// ```text
    /// <primary> ::= not <expr> | odd <expr> | ( <simple_expr> )
    ///             | <ident> [ ( <expr_list> ) ] | <number> | <string> | <bool>
    /// ```
    fn primary(&mut self) -> Type {
        self.traced("primary", Self::parse_primary)
    }

    fn parse_primary(&mut self) -> Type {
        match self.current().symbol {
            Symbol::Not | Symbol::Odd => {
                let operator = self.advance();
                let operand_start = self.current().clone();
                let operand = self.expr();
                let expected = if operator.is(Symbol::Not) {
                    Type::Boolean
                } else {
                    Type::Integer
                };
                self.must_be_type(&operand_start, operand, expected);
                Type::Boolean
            }
            Symbol::LParen => {
                self.advance();
                let ty = self.simple_expr();
                self.must_be(Symbol::RParen);
                ty
            }
            Symbol::Identifier => self.named_operand(),
            Symbol::IntegerLiteral => {
                self.advance();
                Type::Integer
            }
            Symbol::RealLiteral => {
                self.advance();
                Type::Real
            }
            Symbol::StringLiteral => {
                self.advance();
                Type::String
            }
            Symbol::True | Symbol::False => {
                self.advance();
                Type::Boolean
            }
            _ => {
                self.flag_current(ErrorCode::OperandExpected);
                Type::Unknown
            }
        }
    }

    /// An identifier in an expression: a variable, constant or parameter, or
    /// a function call with or without an argument list
    fn named_operand(&mut self) -> Type {
        let name = self.advance();
        let entry = match &name.value {
            TokenValue::Identifier(id) => self.scopes.lookup_id(id),
            _ => None,
        };
        let Some(id) = entry else {
            self.flag(&name, ErrorCode::UndefinedIdentifier);
            self.actual_parameters();
            return Type::Unknown;
        };

        let binding = self.scopes.get(id);
        match binding.ty() {
            Type::Function => {
                let returns = match binding.return_type() {
                    Ok(ty) => ty,
                    Err(err) => unreachable!("{err}"),
                };
                let actuals = self.actual_parameters();
                self.check_call(&name, id, &actuals);
                returns
            }
            Type::Procedure => {
                self.flag(&name, ErrorCode::FunctionExpected);
                self.actual_parameters();
                Type::Unknown
            }
            ty => {
                if self.have(Symbol::LParen) {
                    self.flag(&name, ErrorCode::NotCallable);
                    self.actual_parameters();
                    return Type::Unknown;
                }
                ty
            }
        }
    }
}
