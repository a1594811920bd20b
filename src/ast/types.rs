//! Type definitions for the AST.
//!
//! Two families live here:
//!
//! - `TypeNode`, the type annotation exactly as written in the source
//!   (array sizes are still expressions)
//! - `Type`, the resolved semantic type the checker writes into every node
//!
//! `Type::Unresolved` is the "not known yet" state. It is never compatible
//! with anything, so it has to be settled by inference before an operator or
//! assignment check means anything.

use std::fmt::Display;

use super::{ast::Param, expressions::Expr};

/// The built-in scalar type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleType {
    Integer,
    Float,
    Boolean,
    Char,
    String,
    Void,
}

impl Display for SimpleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SimpleType::Integer => "integer",
            SimpleType::Float => "float",
            SimpleType::Boolean => "boolean",
            SimpleType::Char => "char",
            SimpleType::String => "string",
            SimpleType::Void => "void",
        };

        write!(f, "{}", name)
    }
}

/// The signature part of `function R ( params )`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub return_type: Box<TypeNode>,
    pub params: Vec<Param>,
    pub line: u32,
}

/// A type annotation as written.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Simple {
        name: SimpleType,
        line: u32,
    },
    /// `array [size] base`; the size is absent for `array [] T` parameters.
    Array {
        base: Box<TypeNode>,
        size: Option<Box<Expr>>,
        line: u32,
    },
    Function(FuncType),
}

/// A resolved semantic type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Type {
    #[default]
    Unresolved,
    Integer,
    Float,
    Boolean,
    Char,
    String,
    Void,
    Array {
        element: Box<Type>,
        /// Known only when the declared size is a constant.
        size: Option<i64>,
    },
    Function {
        return_type: Box<Type>,
        params: Vec<Type>,
    },
}

impl From<SimpleType> for Type {
    fn from(simple: SimpleType) -> Self {
        match simple {
            SimpleType::Integer => Type::Integer,
            SimpleType::Float => Type::Float,
            SimpleType::Boolean => Type::Boolean,
            SimpleType::Char => Type::Char,
            SimpleType::String => Type::String,
            SimpleType::Void => Type::Void,
        }
    }
}

impl Type {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Type::Unresolved)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Float)
    }

    /// Structural type identity.
    ///
    /// Array sizes are ignored, so `array [5] integer` and `array [] integer`
    /// are the same type for parameter passing and assignment.
    pub fn is_compatible_with(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Unresolved, _) | (_, Type::Unresolved) => false,
            (Type::Array { element: a, .. }, Type::Array { element: b, .. }) => {
                a.is_compatible_with(b)
            }
            (
                Type::Function {
                    return_type: ret_a,
                    params: params_a,
                },
                Type::Function {
                    return_type: ret_b,
                    params: params_b,
                },
            ) => {
                ret_a.is_compatible_with(ret_b)
                    && params_a.len() == params_b.len()
                    && params_a
                        .iter()
                        .zip(params_b)
                        .all(|(a, b)| a.is_compatible_with(b))
            }
            (a, b) => a == b,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Unresolved => write!(f, "<unresolved>"),
            Type::Integer => write!(f, "integer"),
            Type::Float => write!(f, "float"),
            Type::Boolean => write!(f, "boolean"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Array {
                element,
                size: Some(size),
            } => write!(f, "array [{}] {}", size, element),
            Type::Array {
                element,
                size: None,
            } => write!(f, "array [] {}", element),
            Type::Function {
                return_type,
                params,
            } => {
                let params = params
                    .iter()
                    .map(Type::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "function {} ({})", return_type, params)
            }
        }
    }
}
