//! Lexical scopes.
//!
//! A `Scope` maps names to symbols for one level of nesting and borrows its
//! parent for as long as it lives, so a child can never outlive the scope it
//! was opened in. The enclosing function and the loop depth are plain
//! fields copied down when a child is opened.

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable,
    Array,
    /// `defined` is false for a prototype that has no body yet.
    Function { defined: bool },
    Param,
    Builtin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    pub line: u32,
    /// Value of an integer variable whose initializer is a constant.
    pub constant: Option<i64>,
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. } | SymbolKind::Builtin)
    }
}

/// The function whose body is being checked.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("{name:?} is already declared with type {existing}")]
    Conflict { name: String, existing: Type },
    #[error("{name:?} is already declared")]
    Duplicate { name: String, existing: Type },
}

#[derive(Debug)]
pub struct Scope<'p> {
    pub name: String,
    symbols: HashMap<String, Symbol>,
    parent: Option<&'p Scope<'p>>,
    function: Option<FunctionContext>,
    loop_depth: usize,
}

impl Scope<'static> {
    /// A root scope with no parent.
    pub fn new(name: &str) -> Self {
        Scope {
            name: name.to_string(),
            symbols: HashMap::new(),
            parent: None,
            function: None,
            loop_depth: 0,
        }
    }
}

impl<'p> Scope<'p> {
    /// A nested scope that inherits the parent's context.
    pub fn child(parent: &'p Scope<'p>) -> Scope<'p> {
        Scope {
            name: parent.name.clone(),
            symbols: HashMap::new(),
            parent: Some(parent),
            function: parent.function.clone(),
            loop_depth: parent.loop_depth,
        }
    }

    /// The scope of a function body. Loops outside the function do not count.
    pub fn function(parent: &'p Scope<'p>, context: FunctionContext) -> Scope<'p> {
        Scope {
            name: context.name.clone(),
            symbols: HashMap::new(),
            parent: Some(parent),
            function: Some(context),
            loop_depth: 0,
        }
    }

    /// The scope of a loop body.
    pub fn looping(parent: &'p Scope<'p>) -> Scope<'p> {
        let mut scope = Scope::child(parent);
        scope.loop_depth += 1;
        scope
    }

    /// Declares a symbol in this scope.
    ///
    /// A name that is already declared here yields `Conflict` when the types
    /// differ and `Duplicate` when they match or either one is unresolved. The one exception is a
    /// function prototype, which a definition with a compatible signature
    /// replaces.
    pub fn add(&mut self, symbol: Symbol) -> Result<(), ScopeError> {
        if let Some(existing) = self.symbols.get(&symbol.name) {
            // An unresolved side has no type to conflict with
            let compatible = !existing.ty.is_resolved()
                || !symbol.ty.is_resolved()
                || existing.ty.is_compatible_with(&symbol.ty);
            let completes_prototype = existing.kind == SymbolKind::Function { defined: false }
                && symbol.kind == SymbolKind::Function { defined: true };

            if !compatible {
                return Err(ScopeError::Conflict {
                    name: symbol.name,
                    existing: existing.ty.clone(),
                });
            }

            if !completes_prototype {
                return Err(ScopeError::Duplicate {
                    name: symbol.name,
                    existing: existing.ty.clone(),
                });
            }
        }

        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Installs a builtin function, replacing any symbol of the same name.
    pub fn define_builtin(&mut self, name: &str, ty: Type) {
        let symbol = Symbol {
            name: name.to_string(),
            kind: SymbolKind::Builtin,
            ty,
            line: 0,
            constant: None,
        };
        self.symbols.insert(symbol.name.clone(), symbol);
    }

    /// Looks a name up here, then in each ancestor.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        match self.symbols.get(name) {
            Some(symbol) => Some(symbol),
            None => self.parent.and_then(|parent| parent.get(name)),
        }
    }

    /// Whether the name is declared in this scope, ignoring ancestors.
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn current_function(&self) -> Option<&FunctionContext> {
        self.function.as_ref()
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}
