//! Identifier table entries
//!
//! A [`Binding`] is created for every declared name. Callables refer to
//! their parameters by [`BindingId`], an index into the arena owned by the
//! [`crate::scope::ScopeManager`], so the parameter list is a lookup relation
//! and never owns the parameter bindings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BindingError, BindingResult};
use crate::span::Span;
use crate::types::Type;

/// Index of a binding in the scope manager's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub(crate) usize);

/// Declarative role of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Variable,
    Constant,
    ValueParameter,
    RefParameter,
    ForLoopIndex,
    /// Callables, the program name and anything whose role failed to parse
    Unknown,
}

impl Kind {
    /// Whether a binding of this kind may be the target of `:=` or `read`
    pub fn is_assignable(self) -> bool {
        matches!(self, Kind::Variable | Kind::RefParameter)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Variable => "variable",
            Kind::Constant => "constant",
            Kind::ValueParameter => "value parameter",
            Kind::RefParameter => "ref parameter",
            Kind::ForLoopIndex => "for loop index",
            Kind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Value of a constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    String(String),
}

impl ConstValue {
    pub fn ty(&self) -> Type {
        match self {
            ConstValue::Integer(_) => Type::Integer,
            ConstValue::Real(_) => Type::Real,
            ConstValue::Boolean(_) => Type::Boolean,
            ConstValue::String(_) => Type::String,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Integer(n) => write!(f, "{n}"),
            ConstValue::Real(x) => write!(f, "{x:?}"),
            ConstValue::Boolean(b) => write!(f, "{b}"),
            ConstValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    name: String,
    ty: Type,
    kind: Kind,
    level: usize,
    /// Where the name was declared; `None` for built-ins
    span: Option<Span>,
    /// Constants only
    value: Option<ConstValue>,
    /// Procedures and functions only
    parameters: Option<Vec<BindingId>>,
    /// Functions only
    return_type: Option<Type>,
}

impl Binding {
    /// Create a binding. Callables start with an empty parameter list and
    /// functions with an `Unknown` return type until it is fixed.
    pub fn new(name: impl Into<String>, ty: Type, kind: Kind, level: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            level,
            span: None,
            value: None,
            parameters: ty.is_callable().then(Vec::new),
            return_type: (ty == Type::Function).then_some(Type::Unknown),
        }
    }

    /// A function whose signature is known up front
    pub fn function(
        name: impl Into<String>,
        level: usize,
        parameters: Vec<BindingId>,
        return_type: Type,
    ) -> Self {
        Self {
            parameters: Some(parameters),
            return_type: Some(return_type),
            ..Self::new(name, Type::Function, Kind::Unknown, level)
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn value(&self) -> Option<&ConstValue> {
        self.value.as_ref()
    }

    pub fn is_callable(&self) -> bool {
        self.parameters.is_some()
    }

    pub fn is_function(&self) -> bool {
        self.ty == Type::Function
    }

    /// Fix the value of a constant. A real constant accepts an integer value
    /// and stores it widened.
    pub fn fix_const(&mut self, value: ConstValue) -> BindingResult<()> {
        if self.kind != Kind::Constant {
            return Err(BindingError::NotAConstant {
                name: self.name.clone(),
            });
        }
        let value = match (self.ty, value) {
            (Type::Real, ConstValue::Integer(n)) => ConstValue::Real(n as f64),
            (ty, value) if value.ty() == ty => value,
            (ty, value) => {
                return Err(BindingError::ValueTypeMismatch {
                    name: self.name.clone(),
                    ty,
                    found: value.ty(),
                })
            }
        };
        self.value = Some(value);
        Ok(())
    }

    pub fn return_type(&self) -> BindingResult<Type> {
        self.return_type.ok_or_else(|| BindingError::NotAFunction {
            name: self.name.clone(),
            ty: self.ty,
        })
    }

    pub fn fix_return_type(&mut self, return_type: Type) -> BindingResult<()> {
        match self.return_type.as_mut() {
            Some(slot) => {
                *slot = return_type;
                Ok(())
            }
            None => Err(BindingError::NotAFunction {
                name: self.name.clone(),
                ty: self.ty,
            }),
        }
    }

    pub fn add_parameter(&mut self, parameter: BindingId) -> BindingResult<()> {
        self.parameters_mut()?.push(parameter);
        Ok(())
    }

    /// Formal parameters in declaration order
    pub fn parameters(&self) -> BindingResult<&[BindingId]> {
        self.parameters.as_deref().ok_or_else(|| self.not_callable())
    }

    pub fn parameter_count(&self) -> BindingResult<usize> {
        self.parameters().map(<[BindingId]>::len)
    }

    /// The `n`th formal parameter (0-indexed), `None` past the end
    pub fn nth_parameter(&self, n: usize) -> BindingResult<Option<BindingId>> {
        self.parameters().map(|params| params.get(n).copied())
    }

    fn parameters_mut(&mut self) -> BindingResult<&mut Vec<BindingId>> {
        if self.parameters.is_none() {
            return Err(self.not_callable());
        }
        Ok(self.parameters.get_or_insert_with(Vec::new))
    }

    fn not_callable(&self) -> BindingError {
        BindingError::NotCallable {
            name: self.name.clone(),
            ty: self.ty,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} {} (level {})",
            self.name, self.kind, self.ty, self.level
        )?;
        if let Some(params) = &self.parameters {
            write!(f, ", {} parameter(s)", params.len())?;
        }
        if let Some(return_type) = self.return_type {
            write!(f, ", returns {return_type}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}
