//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics produced by every phase of the
//! front end. It includes:
//!
//! - Error structures with source line information
//! - Specific error variants for lexical, syntactic and semantic failures
//! - The `Diagnostics` accumulator, the only failure channel of a run
//! - Helpful error messages and suggestions

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
