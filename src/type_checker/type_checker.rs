//! The semantic checker.
//!
//! One depth-first walk over the `Program`. Declarations are registered
//! before their bodies are visited, so a function can call itself, and
//! every expression gets its resolved type written into `Expr::ty` on the
//! way back up.
//!
//! Nothing here aborts. A failed check records a diagnostic and leaves the
//! node `Unresolved`; an unresolved operand later adopts whatever type its
//! context expects, which keeps one mistake from producing a cascade.

use log::{debug, trace};

use crate::{
    ast::{
        ast::{ArrayDecl, Decl, FuncDecl, Program, ScopeTag, VarDecl},
        expressions::{BinaryOperator, Expr, ExprKind, IncDecOperator, UnaryOperator},
        statements::{ReturnStmt, Stmt},
        types::{FuncType, Type, TypeNode},
    },
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
};

use super::{
    scope::{FunctionContext, Scope, ScopeError, Symbol, SymbolKind},
    typesys::{accepts_argument, check_binop, check_unaryop, is_printable},
};

/// Checks a parsed program, annotating it in place.
///
/// Returns the populated global scope together with every semantic
/// diagnostic. Running this on two independently parsed copies of the same
/// source gives identical results.
pub fn type_check(program: &mut Program) -> (Scope<'static>, Diagnostics) {
    let mut checker = TypeChecker::new();
    let mut global = Scope::new("global");
    register_builtins(&mut global);

    debug!("checking {} declarations", program.body.len());
    for decl in program.body.iter_mut() {
        checker.check_decl(decl, &mut global);
    }

    debug!(
        "checked {} declarations, {} symbols, {} errors",
        program.body.len(),
        global.len(),
        checker.diagnostics.len()
    );

    (global, checker.diagnostics)
}

fn register_builtins(scope: &mut Scope<'_>) {
    scope.define_builtin(
        "array_length",
        Type::Function {
            return_type: Box::new(Type::Integer),
            params: vec![Type::Array {
                element: Box::new(Type::Unresolved),
                size: None,
            }],
        },
    );
}

fn scope_tag(scope: &Scope<'_>) -> ScopeTag {
    match scope.current_function() {
        Some(_) => ScopeTag::Local,
        None => ScopeTag::Global,
    }
}

/// The compile-time value of an array size.
///
/// Besides integer literals this follows a variable to the constant its
/// declaration was initialized with.
fn constant_size(expr: &Expr, scope: &Scope<'_>) -> Option<i64> {
    match &expr.kind {
        ExprKind::VarLoc { name, .. } => scope.get(name).and_then(|symbol| symbol.constant),
        _ => expr.constant_integer(),
    }
}

/// The element type at the bottom of nested array types.
fn innermost(ty: &Type) -> &Type {
    match ty {
        Type::Array { element, .. } => innermost(element),
        other => other,
    }
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    diagnostics: Diagnostics,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            diagnostics: Diagnostics::new(),
        }
    }

    fn report(&mut self, error: ErrorImpl, line: u32) {
        self.diagnostics.report(error, line);
    }

    fn declare(&mut self, scope: &mut Scope<'_>, symbol: Symbol, what: &str) {
        let line = symbol.line;

        if let Err(error) = scope.add(symbol) {
            let error = match error {
                ScopeError::Conflict { name, .. } => ErrorImpl::RedefinitionConflict {
                    what: what.to_string(),
                    name,
                },
                ScopeError::Duplicate { name, .. } => ErrorImpl::Redefinition {
                    what: what.to_string(),
                    name,
                },
            };
            self.report(error, line);
        }
    }

    /// Checks `expr` against an expected type.
    ///
    /// An unresolved expression takes the expected type instead of being
    /// reported; its own error has already been recorded.
    fn expect_type(&mut self, expr: &mut Expr, expected: &Type, context: String) {
        if !expected.is_resolved() {
            return;
        }

        if !expr.ty.is_resolved() {
            expr.ty = expected.clone();
        } else if !expr.ty.is_compatible_with(expected) {
            self.report(
                ErrorImpl::TypeMismatch {
                    context,
                    expected: expected.to_string(),
                    received: expr.ty.to_string(),
                },
                expr.line,
            );
        }
    }

    pub fn check_decl(&mut self, decl: &mut Decl, scope: &mut Scope<'_>) {
        match decl {
            Decl::Var(decl) => self.check_var_decl(decl, scope),
            Decl::Array(decl) => self.check_array_decl(decl, scope),
            Decl::Func(decl) => self.check_func_decl(decl, scope),
        }
    }

    fn check_var_decl(&mut self, decl: &mut VarDecl, scope: &mut Scope<'_>) {
        let declared = match decl.declared_type.as_mut() {
            Some(type_node) => Some(self.resolve_type(type_node, &decl.name, scope)),
            None => None,
        };

        let ty = match (declared, decl.value.as_mut()) {
            (Some(expected), Some(value)) => {
                self.check_expr(value, scope);
                if expected != Type::Void {
                    let context = format!("initial value of {:?}", decl.name);
                    self.expect_type(value, &expected, context);
                }
                expected
            }
            (Some(expected), None) => expected,
            (None, Some(value)) => {
                self.check_expr(value, scope);
                value.ty.clone()
            }
            // `auto` without an initializer never leaves the parser
            (None, None) => Type::Unresolved,
        };

        if ty == Type::Void {
            self.report(
                ErrorImpl::VoidDeclaration {
                    what: String::from("variable"),
                    name: decl.name.clone(),
                },
                decl.line,
            );
        }

        let constant = match (&ty, decl.value.as_ref()) {
            (Type::Integer, Some(value)) => constant_size(value, scope),
            _ => None,
        };

        decl.ty = ty.clone();
        decl.scope = Some(scope_tag(scope));

        let symbol = Symbol {
            name: decl.name.clone(),
            kind: SymbolKind::Variable,
            ty,
            line: decl.line,
            constant,
        };
        self.declare(scope, symbol, "variable");
    }

    fn check_array_decl(&mut self, decl: &mut ArrayDecl, scope: &mut Scope<'_>) {
        let ty = self.resolve_type(&mut decl.type_node, &decl.name, scope);
        let (element, size) = match &ty {
            Type::Array { element, size } => ((**element).clone(), *size),
            _ => (Type::Unresolved, None),
        };

        let is_void = *innermost(&element) == Type::Void;
        if is_void {
            self.report(
                ErrorImpl::VoidDeclaration {
                    what: String::from("array"),
                    name: decl.name.clone(),
                },
                decl.line,
            );
        }

        for (position, value) in decl.values.iter_mut().enumerate() {
            self.check_expr(value, scope);
            if !is_void {
                let context = format!("element {} of array {:?}", position + 1, decl.name);
                self.expect_type(value, &element, context);
            }
        }

        if let Some(size) = size {
            if !decl.values.is_empty() && size != decl.values.len() as i64 {
                self.report(
                    ErrorImpl::ArrayInitializerLength {
                        name: decl.name.clone(),
                        expected: size,
                        received: decl.values.len(),
                    },
                    decl.line,
                );
            }
        }

        decl.ty = ty.clone();
        decl.scope = Some(scope_tag(scope));

        let symbol = Symbol {
            name: decl.name.clone(),
            kind: SymbolKind::Array,
            ty,
            line: decl.line,
            constant: None,
        };
        self.declare(scope, symbol, "array");
    }

    fn check_func_decl(&mut self, decl: &mut FuncDecl, scope: &mut Scope<'_>) {
        let ty = self.resolve_signature(&mut decl.signature, scope);
        let return_type = match &ty {
            Type::Function { return_type, .. } => (**return_type).clone(),
            _ => Type::Unresolved,
        };

        for param in decl.signature.params.iter() {
            if param.ty == Type::Void {
                self.report(
                    ErrorImpl::VoidDeclaration {
                        what: String::from("parameter"),
                        name: param.name.clone(),
                    },
                    param.line,
                );
            }
        }

        decl.ty = ty.clone();
        decl.scope = Some(scope_tag(scope));

        // Registered before the body so recursive calls resolve
        let symbol = Symbol {
            name: decl.name.clone(),
            kind: SymbolKind::Function {
                defined: decl.body.is_some(),
            },
            ty,
            line: decl.line,
            constant: None,
        };
        self.declare(scope, symbol, "function");

        let Some(body) = decl.body.as_mut() else {
            return;
        };

        debug!("entering function {}", decl.name);
        let context = FunctionContext {
            name: decl.name.clone(),
            return_type,
        };
        let mut local = Scope::function(scope, context);

        for param in decl.signature.params.iter() {
            let symbol = Symbol {
                name: param.name.clone(),
                kind: SymbolKind::Param,
                ty: param.ty.clone(),
                line: param.line,
                constant: None,
            };
            self.declare(&mut local, symbol, "parameter");
        }

        for stmt in body.iter_mut() {
            self.check_stmt(stmt, &mut local);
        }
        debug!("leaving function {} ({} locals)", decl.name, local.len());
    }

    /// Turns a written type into a semantic one, checking array sizes.
    fn resolve_type(&mut self, type_node: &mut TypeNode, owner: &str, scope: &Scope<'_>) -> Type {
        match type_node {
            TypeNode::Simple { name, .. } => Type::from(*name),
            TypeNode::Array { base, size, .. } => {
                let element = self.resolve_type(base, owner, scope);
                let size = match size {
                    Some(size) => self.check_array_size(size, owner, scope),
                    None => None,
                };

                Type::Array {
                    element: Box::new(element),
                    size,
                }
            }
            TypeNode::Function(signature) => self.resolve_signature(signature, scope),
        }
    }

    fn resolve_signature(&mut self, signature: &mut FuncType, scope: &Scope<'_>) -> Type {
        let return_type = self.resolve_type(&mut signature.return_type, "return value", scope);

        let mut params = vec![];
        for param in signature.params.iter_mut() {
            param.ty = self.resolve_type(&mut param.type_node, &param.name, scope);
            params.push(param.ty.clone());
        }

        Type::Function {
            return_type: Box::new(return_type),
            params,
        }
    }

    /// The constant size of an array, if it has one.
    fn check_array_size(&mut self, size: &mut Expr, owner: &str, scope: &Scope<'_>) -> Option<i64> {
        self.check_expr(size, scope);

        if size.ty.is_resolved() && size.ty != Type::Integer {
            self.report(
                ErrorImpl::InvalidArraySize {
                    name: owner.to_string(),
                    problem: format!("must be an integer, received {}", size.ty),
                },
                size.line,
            );
            return None;
        }

        match constant_size(size, scope) {
            Some(value) if value < 0 => {
                self.report(
                    ErrorImpl::InvalidArraySize {
                        name: owner.to_string(),
                        problem: format!("must not be negative, received {}", value),
                    },
                    size.line,
                );
                None
            }
            constant => constant,
        }
    }

    pub fn check_stmt(&mut self, stmt: &mut Stmt, scope: &mut Scope<'_>) {
        trace!("checking statement at line {}", stmt.line());

        match stmt {
            Stmt::Decl(decl) => self.check_decl(decl, scope),
            Stmt::Assignment(assignment) => {
                self.check_assignment(&mut assignment.target, &mut assignment.value, scope);
            }
            Stmt::Print(print) => {
                for arg in print.args.iter_mut() {
                    self.check_expr(arg, scope);
                    if arg.ty.is_resolved() && !is_printable(&arg.ty) {
                        self.report(
                            ErrorImpl::InvalidPrintArgument {
                                received: arg.ty.to_string(),
                            },
                            arg.line,
                        );
                    }
                }
            }
            Stmt::If(if_stmt) => {
                self.check_condition(&mut if_stmt.condition, "if", scope);
                self.check_nested(&mut if_stmt.then_branch, scope);
                if let Some(else_branch) = if_stmt.else_branch.as_mut() {
                    self.check_nested(else_branch, scope);
                }
            }
            Stmt::For(for_stmt) => {
                if let Some(init) = for_stmt.init.as_mut() {
                    self.check_expr(init, scope);
                }
                if let Some(condition) = for_stmt.condition.as_mut() {
                    self.check_condition(condition, "for", scope);
                }
                if let Some(update) = for_stmt.update.as_mut() {
                    self.check_expr(update, scope);
                }

                let mut body = Scope::looping(scope);
                self.check_stmt(&mut for_stmt.body, &mut body);
            }
            Stmt::While(while_stmt) => {
                self.check_condition(&mut while_stmt.condition, "while", scope);

                let mut body = Scope::looping(scope);
                self.check_stmt(&mut while_stmt.body, &mut body);
            }
            Stmt::DoWhile(do_while) => {
                {
                    let mut body = Scope::looping(scope);
                    self.check_stmt(&mut do_while.body, &mut body);
                }
                self.check_condition(&mut do_while.condition, "do-while", scope);
            }
            Stmt::Return(return_stmt) => self.check_return(return_stmt, scope),
            Stmt::Break { line } => {
                if !scope.in_loop() {
                    self.report(ErrorImpl::BreakOutsideLoop, *line);
                }
            }
            Stmt::Continue { line } => {
                if !scope.in_loop() {
                    self.report(ErrorImpl::ContinueOutsideLoop, *line);
                }
            }
            Stmt::Block(block) => {
                let mut inner = Scope::child(scope);
                for stmt in block.body.iter_mut() {
                    self.check_stmt(stmt, &mut inner);
                }
            }
            Stmt::Expr(expr) => self.check_expr(expr, scope),
        }
    }

    /// Visits a branch in its own scope so its declarations do not leak.
    fn check_nested(&mut self, stmt: &mut Stmt, scope: &Scope<'_>) {
        let mut inner = Scope::child(scope);
        self.check_stmt(stmt, &mut inner);
    }

    fn check_condition(&mut self, condition: &mut Expr, statement: &str, scope: &Scope<'_>) {
        self.check_expr(condition, scope);

        if !condition.ty.is_resolved() {
            condition.ty = Type::Boolean;
        } else if condition.ty != Type::Boolean {
            self.report(
                ErrorImpl::NonBooleanCondition {
                    statement: statement.to_string(),
                    received: condition.ty.to_string(),
                },
                condition.line,
            );
        }
    }

    fn check_return(&mut self, stmt: &mut ReturnStmt, scope: &Scope<'_>) {
        let Some(context) = scope.current_function().cloned() else {
            if let Some(value) = stmt.value.as_mut() {
                self.check_expr(value, scope);
            }
            self.report(ErrorImpl::ReturnOutsideFunction, stmt.line);
            return;
        };

        match stmt.value.as_mut() {
            Some(value) => {
                self.check_expr(value, scope);
                if context.return_type != Type::Void {
                    let expected = format!("return value of {:?}", context.name);
                    self.expect_type(value, &context.return_type, expected);
                }
            }
            None if context.return_type.is_resolved() && context.return_type != Type::Void => {
                self.report(
                    ErrorImpl::MissingReturnValue {
                        function: context.name,
                        expected: context.return_type.to_string(),
                    },
                    stmt.line,
                );
            }
            None => {}
        }
    }

    /// Resolves the type of an expression and everything below it.
    pub fn check_expr(&mut self, expr: &mut Expr, scope: &Scope<'_>) {
        let line = expr.line;

        let ty = match &mut expr.kind {
            ExprKind::Integer(_) => Type::Integer,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Boolean(_) => Type::Boolean,
            ExprKind::Char(_) => Type::Char,
            ExprKind::String(_) => Type::String,
            ExprKind::VarLoc { name, mutable } => {
                self.check_var_loc(name, mutable, line, scope, false)
            }
            ExprKind::ArrayLoc {
                array,
                index,
                mutable,
            } => self.check_array_loc(array, index, mutable, line, scope),
            ExprKind::BinOper { op, left, right } => {
                self.check_binary(*op, left, right, line, scope)
            }
            ExprKind::UnaryOper { op, operand } => self.check_unary(*op, operand, line, scope),
            ExprKind::FuncCall { name, args } => self.check_call(name, args, line, scope),
            ExprKind::Assignment { target, value } => self.check_assignment(target, value, scope),
            ExprKind::IncDec { op, target, .. } => self.check_inc_dec(*op, target, line, scope),
        };

        expr.ty = ty;
    }

    /// Checks the left side of an assignment or increment.
    ///
    /// A bare function name is allowed through here so the caller can
    /// report it as immutable instead of as a misused value.
    fn check_target(&mut self, target: &mut Expr, scope: &Scope<'_>) {
        let line = target.line;

        if let ExprKind::VarLoc { name, mutable } = &mut target.kind {
            let ty = self.check_var_loc(name, mutable, line, scope, true);
            target.ty = ty;
        } else {
            self.check_expr(target, scope);
        }
    }

    fn check_var_loc(
        &mut self,
        name: &str,
        mutable: &mut bool,
        line: u32,
        scope: &Scope<'_>,
        as_target: bool,
    ) -> Type {
        let Some(symbol) = scope.get(name) else {
            *mutable = false;
            self.report(
                ErrorImpl::UndeclaredName {
                    name: name.to_string(),
                },
                line,
            );
            return Type::Unresolved;
        };

        *mutable = !symbol.is_function();

        if symbol.is_function() && !as_target {
            self.report(
                ErrorImpl::FunctionUsedAsValue {
                    name: name.to_string(),
                },
                line,
            );
            return Type::Unresolved;
        }

        symbol.ty.clone()
    }

    fn check_array_loc(
        &mut self,
        array: &mut Expr,
        index: &mut Expr,
        mutable: &mut bool,
        line: u32,
        scope: &Scope<'_>,
    ) -> Type {
        self.check_expr(array, scope);
        self.check_expr(index, scope);

        if !index.ty.is_resolved() {
            index.ty = Type::Integer;
        } else if index.ty != Type::Integer {
            self.report(
                ErrorImpl::NonIntegerIndex {
                    received: index.ty.to_string(),
                },
                index.line,
            );
        }

        match &array.ty {
            Type::Array { element, size } => {
                *mutable = true;

                if let (Some(size), Some(position)) = (*size, index.constant_integer()) {
                    if position < 0 || position >= size {
                        self.report(
                            ErrorImpl::IndexOutOfBounds {
                                name: array.location_name(),
                                index: position,
                                size,
                            },
                            line,
                        );
                    }
                }

                (**element).clone()
            }
            // Strings can be read by index but not written
            Type::String => {
                *mutable = false;
                Type::Char
            }
            Type::Unresolved => {
                *mutable = false;
                Type::Unresolved
            }
            _ => {
                *mutable = false;
                self.report(
                    ErrorImpl::NotAnArray {
                        name: array.location_name(),
                    },
                    line,
                );
                Type::Unresolved
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinaryOperator,
        left: &mut Expr,
        right: &mut Expr,
        line: u32,
        scope: &Scope<'_>,
    ) -> Type {
        self.check_expr(left, scope);
        self.check_expr(right, scope);

        match (left.ty.is_resolved(), right.ty.is_resolved()) {
            (false, false) => return Type::Unresolved,
            (false, true) => left.ty = right.ty.clone(),
            (true, false) => right.ty = left.ty.clone(),
            (true, true) => {}
        }

        match check_binop(op, &left.ty, &right.ty) {
            Some(ty) => ty,
            None => {
                self.report(
                    ErrorImpl::BinaryOperatorMismatch {
                        operator: op.to_string(),
                        left: left.ty.to_string(),
                        right: right.ty.to_string(),
                    },
                    line,
                );
                Type::Unresolved
            }
        }
    }

    fn check_unary(
        &mut self,
        op: UnaryOperator,
        operand: &mut Expr,
        line: u32,
        scope: &Scope<'_>,
    ) -> Type {
        self.check_expr(operand, scope);

        if !operand.ty.is_resolved() {
            return Type::Unresolved;
        }

        match check_unaryop(op, &operand.ty) {
            Some(ty) => ty,
            None => {
                self.report(
                    ErrorImpl::UnaryOperatorMismatch {
                        operator: op.to_string(),
                        operand: operand.ty.to_string(),
                    },
                    line,
                );
                Type::Unresolved
            }
        }
    }

    fn check_call(&mut self, name: &str, args: &mut [Expr], line: u32, scope: &Scope<'_>) -> Type {
        let callee = scope.get(name).map(|symbol| symbol.ty.clone());

        let (return_type, params) = match callee {
            Some(Type::Function {
                return_type,
                params,
            }) => (*return_type, params),
            Some(_) => {
                self.report(
                    ErrorImpl::NotCallable {
                        name: name.to_string(),
                    },
                    line,
                );
                (Type::Unresolved, vec![])
            }
            None => {
                self.report(
                    ErrorImpl::UndefinedFunction {
                        name: name.to_string(),
                    },
                    line,
                );
                (Type::Unresolved, vec![])
            }
        };

        let known = return_type.is_resolved();
        if known && args.len() != params.len() {
            self.report(
                ErrorImpl::ArityMismatch {
                    name: name.to_string(),
                    expected: params.len(),
                    received: args.len(),
                },
                line,
            );
        }

        for (position, arg) in args.iter_mut().enumerate() {
            self.check_expr(arg, scope);

            let Some(param) = params.get(position) else {
                continue;
            };

            if !arg.ty.is_resolved() {
                arg.ty = param.clone();
            } else if !accepts_argument(param, &arg.ty) {
                self.report(
                    ErrorImpl::TypeMismatch {
                        context: format!("argument {} of {:?}", position + 1, name),
                        expected: param.to_string(),
                        received: arg.ty.to_string(),
                    },
                    arg.line,
                );
            }
        }

        return_type
    }

    fn check_assignment(&mut self, target: &mut Expr, value: &mut Expr, scope: &Scope<'_>) -> Type {
        self.check_target(target, scope);
        self.check_expr(value, scope);

        // Undeclared, already reported
        if !target.ty.is_resolved() {
            target.ty = value.ty.clone();
            return target.ty.clone();
        }

        if !target.is_mutable() {
            self.report(
                ErrorImpl::ImmutableAssignment {
                    name: target.location_name(),
                },
                target.line,
            );
            return target.ty.clone();
        }

        let expected = target.ty.clone();
        let context = format!("assignment to {:?}", target.location_name());
        self.expect_type(value, &expected, context);

        expected
    }

    fn check_inc_dec(
        &mut self,
        op: IncDecOperator,
        target: &mut Expr,
        line: u32,
        scope: &Scope<'_>,
    ) -> Type {
        self.check_target(target, scope);

        if !target.is_location() {
            self.report(
                ErrorImpl::InvalidIncrement {
                    operator: op.to_string(),
                    problem: String::from("needs a variable or array element"),
                },
                line,
            );
        } else if !target.ty.is_resolved() {
            target.ty = Type::Integer;
        } else if !target.is_mutable() {
            self.report(
                ErrorImpl::ImmutableAssignment {
                    name: target.location_name(),
                },
                line,
            );
        } else if target.ty != Type::Integer {
            self.report(
                ErrorImpl::InvalidIncrement {
                    operator: op.to_string(),
                    problem: format!("needs an integer, received {}", target.ty),
                },
                line,
            );
        }

        Type::Integer
    }
}
