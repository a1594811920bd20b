use std::fmt::Display;

use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
                | BinaryOperator::Power
        )
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::Less
                | BinaryOperator::LessEquals
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEquals
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::Or | BinaryOperator::And)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
        };

        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Plus,
    Not,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Not => write!(f, "!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOperator {
    Increment,
    Decrement,
}

impl Display for IncDecOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncDecOperator::Increment => write!(f, "++"),
            IncDecOperator::Decrement => write!(f, "--"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Char(char),
    String(String),

    VarLoc {
        name: String,
        mutable: bool,
    },
    ArrayLoc {
        array: Box<Expr>,
        index: Box<Expr>,
        mutable: bool,
    },

    BinOper {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOper {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    FuncCall {
        name: String,
        args: Vec<Expr>,
    },
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    IncDec {
        op: IncDecOperator,
        target: Box<Expr>,
        postfix: bool,
    },
}

/// An expression node.
///
/// `ty` starts out `Unresolved` and is written by the checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
    pub ty: Type,
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Expr {
            kind,
            line,
            ty: Type::Unresolved,
        }
    }

    pub fn is_location(&self) -> bool {
        matches!(self.kind, ExprKind::VarLoc { .. } | ExprKind::ArrayLoc { .. })
    }

    /// The mutability flag of a location; `false` for anything else.
    pub fn is_mutable(&self) -> bool {
        match self.kind {
            ExprKind::VarLoc { mutable, .. } | ExprKind::ArrayLoc { mutable, .. } => mutable,
            _ => false,
        }
    }

    /// The value of an integer literal, optionally negated.
    pub fn constant_integer(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::Integer(value) => Some(*value),
            ExprKind::UnaryOper {
                op: UnaryOperator::Negate,
                operand,
            } => operand.constant_integer().map(|value| -value),
            ExprKind::UnaryOper {
                op: UnaryOperator::Plus,
                operand,
            } => operand.constant_integer(),
            _ => None,
        }
    }

    /// A short name for the location, used in diagnostics.
    pub fn location_name(&self) -> String {
        match &self.kind {
            ExprKind::VarLoc { name, .. } => name.clone(),
            ExprKind::ArrayLoc { array, .. } => format!("{}[...]", array.location_name()),
            _ => String::from("<expression>"),
        }
    }
}
