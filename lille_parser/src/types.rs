//! Type lattice
//!
//! Concrete types are the values expressions evaluate to. The category
//! variants (`Arithmetic`, `Ordered`, ...) only ever appear as the expected
//! side of a query and are never stored in a binding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostic::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Integer,
    Real,
    String,
    Boolean,
    /// Integer | Real
    Arithmetic,
    /// Arithmetic | String
    ArithmeticOrString,
    /// Arithmetic | Boolean
    ArithmeticOrBoolean,
    /// Arithmetic | String | Boolean
    Ordered,
    /// Result of anything that already failed; suppresses further checks
    Unknown,
    Procedure,
    Function,
    Program,
}

impl Type {
    /// Equality against a concrete type, membership against a category
    pub fn is_type(self, expected: Type) -> bool {
        match expected {
            Type::Arithmetic => matches!(self, Type::Integer | Type::Real),
            Type::ArithmeticOrString => self.is_type(Type::Arithmetic) || self == Type::String,
            Type::ArithmeticOrBoolean => self.is_type(Type::Arithmetic) || self == Type::Boolean,
            Type::Ordered => {
                self.is_type(Type::Arithmetic) || matches!(self, Type::String | Type::Boolean)
            }
            concrete => self == concrete,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        self.is_type(Type::Arithmetic)
    }

    pub fn is_callable(self) -> bool {
        matches!(self, Type::Procedure | Type::Function)
    }

    /// The diagnostic `actual` earns when checked against `expected`
    ///
    /// Category tests are tried before the exact-type test, so each failed
    /// check maps to exactly one code. `Unknown` never violates anything.
    pub fn violation(actual: Type, expected: Type) -> Option<ErrorCode> {
        if actual == Type::Unknown || actual.is_type(expected) {
            return None;
        }
        let code = match expected {
            Type::Ordered => ErrorCode::OrderedExpected,
            Type::Arithmetic => ErrorCode::ArithmeticExpected,
            Type::ArithmeticOrBoolean => ErrorCode::ArithmeticOrBooleanExpected,
            Type::ArithmeticOrString => ErrorCode::ArithmeticOrStringExpected,
            Type::Integer => ErrorCode::IntegerExpected,
            Type::Real => ErrorCode::RealExpected,
            Type::String => ErrorCode::StringExpected,
            Type::Boolean => ErrorCode::BooleanExpected,
            Type::Procedure => ErrorCode::ProcedureExpected,
            Type::Function => ErrorCode::FunctionExpected,
            Type::Program => ErrorCode::ProgramExpected,
            Type::Unknown => return None,
        };
        Some(code)
    }
}

/// Result type of combining two operands
///
/// Equal types combine to themselves, `Unknown` absorbs everything, and
/// mixing `Integer` with `Real` widens to `Real`. Any other pair has no
/// defined combination and yields `Unknown`.
pub fn compatible_type(a: Type, b: Type) -> Type {
    match (a, b) {
        _ if a == b => a,
        (Type::Unknown, _) | (_, Type::Unknown) => Type::Unknown,
        (Type::Integer, Type::Real) | (Type::Real, Type::Integer) => Type::Real,
        _ => Type::Unknown,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Integer => "integer",
            Type::Real => "real",
            Type::String => "string",
            Type::Boolean => "boolean",
            Type::Arithmetic => "arithmetic",
            Type::ArithmeticOrString => "arithmetic or string",
            Type::ArithmeticOrBoolean => "arithmetic or boolean",
            Type::Ordered => "ordered",
            Type::Unknown => "unknown",
            Type::Procedure => "procedure",
            Type::Function => "function",
            Type::Program => "program",
        };
        f.write_str(name)
    }
}
