//! The diagnostics accumulator.
//!
//! Every phase owns one `Diagnostics` per run and hands it back to the
//! caller. Nothing here is global: two compilations never share an
//! accumulator.

use std::slice::Iter;

use super::errors::{Error, ErrorImpl, ErrorKind, Phase};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn push(&mut self, error: Error) {
        log::trace!("diagnostic recorded: {}", error);
        self.errors.push(error);
    }

    /// Records an error at the given source line.
    pub fn report(&mut self, error_impl: ErrorImpl, line: u32) {
        self.push(Error::new(error_impl, line));
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|error| error.kind() == kind)
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|error| error.kind() == kind).count()
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        self.errors.iter().any(|error| error.kind().phase() == phase)
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(Error::kind).collect()
    }

    pub fn iter(&self) -> Iter<'_, Error> {
        self.errors.iter()
    }

    /// Appends another phase's diagnostics, keeping their order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
