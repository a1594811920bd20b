use super::{ast::Decl, expressions::Expr};

/// `location = value ;` written as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub target: Expr,
    pub value: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub args: Vec<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Expr>,
    pub condition: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl(Decl),
    Assignment(AssignmentStmt),
    Print(PrintStmt),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Return(ReturnStmt),
    Break { line: u32 },
    Continue { line: u32 },
    Block(BlockStmt),
    /// Any other expression used as a statement, usually `x++;` or a call.
    Expr(Expr),
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Decl(decl) => decl.line(),
            Stmt::Assignment(stmt) => stmt.line,
            Stmt::Print(stmt) => stmt.line,
            Stmt::If(stmt) => stmt.line,
            Stmt::For(stmt) => stmt.line,
            Stmt::While(stmt) => stmt.line,
            Stmt::DoWhile(stmt) => stmt.line,
            Stmt::Return(stmt) => stmt.line,
            Stmt::Break { line } | Stmt::Continue { line } => *line,
            Stmt::Block(stmt) => stmt.line,
            Stmt::Expr(expr) => expr.line,
        }
    }
}
