use super::{
    expressions::Expr,
    statements::Stmt,
    types::{FuncType, Type, TypeNode},
};

/// Where a declaration lives, written by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeTag {
    Global,
    Local,
}

/// The root of the tree: top-level declarations in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Decl>,
}

/// `name : type [= value] ;` or `name : auto = value ;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    /// `None` for `auto`, the type then comes from the initializer.
    pub declared_type: Option<TypeNode>,
    pub value: Option<Expr>,
    pub line: u32,
    pub ty: Type,
    pub scope: Option<ScopeTag>,
}

/// `name : array [n] T [= { values }] ;`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDecl {
    pub name: String,
    /// Always a `TypeNode::Array`.
    pub type_node: TypeNode,
    pub values: Vec<Expr>,
    pub line: u32,
    pub ty: Type,
    pub scope: Option<ScopeTag>,
}

/// `name : function R ( params ) [= { body }]`
///
/// A declaration with no body is a prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub signature: FuncType,
    pub body: Option<Vec<Stmt>>,
    pub line: u32,
    pub ty: Type,
    pub scope: Option<ScopeTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_node: TypeNode,
    pub line: u32,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Array(ArrayDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Var(decl) => &decl.name,
            Decl::Array(decl) => &decl.name,
            Decl::Func(decl) => &decl.name,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Decl::Var(decl) => decl.line,
            Decl::Array(decl) => decl.line,
            Decl::Func(decl) => decl.line,
        }
    }

    /// The resolved type, `Unresolved` until the checker has run.
    pub fn ty(&self) -> &Type {
        match self {
            Decl::Var(decl) => &decl.ty,
            Decl::Array(decl) => &decl.ty,
            Decl::Func(decl) => &decl.ty,
        }
    }

    pub fn scope(&self) -> Option<ScopeTag> {
        match self {
            Decl::Var(decl) => decl.scope,
            Decl::Array(decl) => decl.scope,
            Decl::Func(decl) => decl.scope,
        }
    }
}
