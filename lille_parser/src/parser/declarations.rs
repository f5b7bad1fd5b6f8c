//! Declaration analysis: data, procedures, functions and parameters

use crate::binding::{Binding, BindingId, ConstValue, Kind};
use crate::diagnostic::ErrorCode;
use crate::scanner::{Token, TokenSource, TokenValue};
use crate::token::Symbol;
use crate::types::Type;

use crate::parser::program::BlockOwner;
use crate::parser::Parser;

impl<S: TokenSource> Parser<S> {
    // ==================== Declarations ====================

    /// ```text
    /// <declaration> ::= <ident_list> : [constant] <type> [:= <literal>] ;
    ///                 | procedure <ident> [ ( <param_list> ) ] is <block> ;
    ///                 | function <ident> [ ( <param_list> ) ] return <type> is <block> ;
    /// ```
    pub(crate) fn declaration(&mut self) {
        self.traced("declaration", |p| match p.current().symbol {
            Symbol::Identifier => p.data_declaration(),
            Symbol::Procedure | Symbol::Function => p.callable_declaration(),
            _ => p.flag_current(ErrorCode::DeclarationExpected),
        })
    }

    fn data_declaration(&mut self) {
        let identifiers = self.ident_list();
        self.must_be(Symbol::Colon);

        let constant = self.have(Symbol::Constant);
        if constant {
            self.advance();
        }
        let kind = if constant {
            Kind::Constant
        } else {
            Kind::Variable
        };
        let ty = self.type_name();

        let value = if self.have(Symbol::Becomes) {
            self.advance();
            self.initializer(ty)
        } else {
            if constant {
                self.flag_current(ErrorCode::MissingInitializer);
            }
            None
        };

        for token in &identifiers {
            let Some(name) = token.identifier() else {
                continue;
            };
            let mut binding = Binding::new(name, ty, kind, self.scopes.current_level())
                .with_span(token.span);
            if let (Kind::Constant, Some(value)) = (kind, &value) {
                if let Err(err) = binding.fix_const(value.clone()) {
                    unreachable!("{err}");
                }
            }
            self.declare(token, binding);
        }

        self.must_be(Symbol::Semicolon);
    }

    /// `[+|-] <literal>` after `:=`. The value is returned only when it fits
    /// the declared type; an integer fits a real.
    fn initializer(&mut self, ty: Type) -> Option<ConstValue> {
        let sign = self.current().symbol;
        let negate = sign == Symbol::Minus;
        if sign.is_addop() {
            self.advance();
        }
        let signed = sign.is_addop();

        let literal = self.current().clone();
        if !literal.symbol.is_literal() {
            self.flag(&literal, ErrorCode::OperandExpected);
            if !literal.is(Symbol::Semicolon) {
                self.advance();
            }
            return None;
        }
        let value = match (&literal.value, literal.symbol) {
            (TokenValue::Integer(n), Symbol::IntegerLiteral) => {
                Some(ConstValue::Integer(if negate { n.wrapping_neg() } else { *n }))
            }
            (TokenValue::Real(x), Symbol::RealLiteral) => {
                Some(ConstValue::Real(if negate { -x } else { *x }))
            }
            (TokenValue::String(s), Symbol::StringLiteral) if !signed => {
                Some(ConstValue::String(s.clone()))
            }
            (TokenValue::Boolean(b), _) if !signed => Some(ConstValue::Boolean(*b)),
            _ => None,
        };

        // Signed strings and booleans
        self.advance();
        let Some(value) = value else {
            self.flag(&literal, ErrorCode::OperandExpected);
            return None;
        };

        let fits = match (ty, &value) {
            (Type::Unknown, _) => return None,
            (Type::Real, ConstValue::Integer(_)) => true,
            (ty, value) => value.ty() == ty,
        };
        if fits {
            Some(value)
        } else {
            self.flag(&literal, ErrorCode::InitializerTypeMismatch);
            None
        }
    }

    fn callable_declaration(&mut self) {
        let is_function = self.advance().is(Symbol::Function);
        let ty = if is_function {
            Type::Function
        } else {
            Type::Procedure
        };

        // Declared in the enclosing scope before the parameters so the body
        // can call it recursively
        let header = self.must_be(Symbol::Identifier).and_then(|token| {
            let name = token.identifier()?.to_string();
            let binding = Binding::new(name.as_str(), ty, Kind::Unknown, self.scopes.current_level())
                .with_span(token.span);
            let id = self.declare(&token, binding);
            Some((id, name))
        });
        let callable = header.as_ref().map(|(id, _)| *id);

        self.scopes.enter_scope();

        if self.have(Symbol::LParen) {
            self.advance();
            self.param_list(callable, is_function);
            self.must_be(Symbol::RParen);
        }

        if is_function {
            self.must_be(Symbol::Return);
            let return_type = self.type_name();
            if let Some(id) = callable {
                if let Err(err) = self.scopes.get_mut(id).fix_return_type(return_type) {
                    unreachable!("{err}");
                }
            }
        }

        self.must_be(Symbol::Is);

        if let Some(id) = callable {
            self.callables.push(id);
        }
        let name = header.as_ref().map(|(_, name)| name.as_str());
        self.block(name, BlockOwner::Callable);
        if callable.is_some() {
            self.callables.pop();
        }

        self.must_be(Symbol::Semicolon);
        self.scopes.exit_scope();
    }

    // ==================== Parameters ====================

    /// `<param_list> ::= <param> { ; <param> }*`
    fn param_list(&mut self, callable: Option<BindingId>, is_function: bool) {
        self.traced("param_list", |p| {
            p.param(callable, is_function);
            while p.have(Symbol::Semicolon) {
                p.advance();
                p.param(callable, is_function);
            }
        })
    }

    /// `<param> ::= <ident_list> : (value|ref) <type>`
    fn param(&mut self, callable: Option<BindingId>, is_function: bool) {
        let identifiers = self.ident_list();
        self.must_be(Symbol::Colon);

        let kind = match self.current().symbol {
            Symbol::Value => {
                self.advance();
                Kind::ValueParameter
            }
            Symbol::Ref => {
                self.advance();
                Kind::RefParameter
            }
            _ => {
                self.flag_current(ErrorCode::ParameterModeExpected);
                Kind::Unknown
            }
        };
        let ty = self.type_name();

        for token in &identifiers {
            let Some(name) = token.identifier() else {
                continue;
            };
            let binding = Binding::new(name, ty, kind, self.scopes.current_level())
                .with_span(token.span);
            let parameter = self.declare(token, binding);
            if let Some(id) = callable {
                if let Err(err) = self.scopes.get_mut(id).add_parameter(parameter) {
                    unreachable!("{err}");
                }
            }
            if is_function && kind == Kind::RefParameter {
                self.flag(token, ErrorCode::RefParameterInFunction);
            }
        }
    }

    // ==================== Shared pieces ====================

    /// `<ident_list> ::= <ident> { , <ident> }*`
    pub(crate) fn ident_list(&mut self) -> Vec<Token> {
        let mut identifiers = Vec::new();
        identifiers.extend(self.must_be(Symbol::Identifier));
        while self.have(Symbol::Comma) {
            self.advance();
            identifiers.extend(self.must_be(Symbol::Identifier));
        }
        identifiers
    }

    /// `<type> ::= integer | real | string | boolean`
    pub(crate) fn type_name(&mut self) -> Type {
        let ty = match self.current().symbol {
            Symbol::IntegerType => Type::Integer,
            Symbol::RealType => Type::Real,
            Symbol::StringType => Type::String,
            Symbol::BooleanType => Type::Boolean,
            _ => {
                self.flag_current(ErrorCode::TypeExpected);
                // A misspelt type name is still one token
                if self.have(Symbol::Identifier) {
                    self.advance();
                }
                return Type::Unknown;
            }
        };
        self.advance();
        ty
    }

    /// Declare `binding` in the current scope, flagging a duplicate at `token`
    fn declare(&mut self, token: &Token, binding: Binding) -> BindingId {
        let (id, fresh) = self.scopes.declare(binding);
        if !fresh {
            self.flag(token, ErrorCode::DuplicateDeclaration);
        }
        id
    }
}
