//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Declarations (variables, arrays, functions and prototypes)
//! - Statements, split into open and closed shapes to settle the dangling `else`
//! - Expressions (binary, unary, postfix, calls, indexing, assignment)
//! - Type annotations
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
