/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: the program root and declarations
/// - expressions: expression nodes and operators
/// - statements: statement nodes
/// - types: written type annotations and resolved semantic types
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
