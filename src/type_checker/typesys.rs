//! Operator typing rules.
//!
//! Pure functions: given an operator and operand types they return the
//! result type, or `None` when the combination is illegal. An unresolved
//! operand is never legal.

use crate::ast::{
    expressions::{BinaryOperator, UnaryOperator},
    types::Type,
};

/// Types that equality and ordering operators accept.
fn is_scalar(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Integer | Type::Float | Type::Boolean | Type::Char | Type::String
    )
}

pub fn check_binop(op: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    if !left.is_resolved() || !right.is_resolved() || left != right {
        return None;
    }

    if op.is_arithmetic() {
        return left.is_numeric().then(|| left.clone());
    }

    if op.is_relational() {
        return is_scalar(left).then_some(Type::Boolean);
    }

    if op.is_logical() {
        return (*left == Type::Boolean).then_some(Type::Boolean);
    }

    None
}

pub fn check_unaryop(op: UnaryOperator, operand: &Type) -> Option<Type> {
    match op {
        UnaryOperator::Negate | UnaryOperator::Plus => {
            operand.is_numeric().then(|| operand.clone())
        }
        UnaryOperator::Not => (*operand == Type::Boolean).then_some(Type::Boolean),
    }
}

/// Whether an argument of type `arg` can be passed for `param`.
///
/// An array parameter with an unresolved element type takes any array; the
/// builtins use it for "array of anything".
pub fn accepts_argument(param: &Type, arg: &Type) -> bool {
    match (param, arg) {
        (Type::Array { element, .. }, Type::Array { .. }) if !element.is_resolved() => true,
        _ => param.is_compatible_with(arg),
    }
}

/// Whether a value of this type can be printed.
pub fn is_printable(ty: &Type) -> bool {
    is_scalar(ty)
}
