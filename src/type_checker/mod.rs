//! Type checking and semantic analysis module.
//!
//! This module walks the parsed `Program` once and annotates it in place:
//!
//! - Every expression gets its resolved type
//! - Every location gets its mutability flag
//! - Every declaration gets its type and a global/local tag
//!
//! Names live in nested `Scope`s that borrow their parent. Operator rules
//! are kept apart in `typesys` as plain functions over `Type`.

pub mod scope;
pub mod type_checker;
pub mod typesys;
