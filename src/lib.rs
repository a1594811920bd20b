//! A front end for the B-Minor language.
//!
//! Three phases, each returning its own `Diagnostics`:
//!
//! - `lexer::lexer::tokenize` turns source text into tokens
//! - `parser::parser::parse` builds a `Program`
//! - `type_checker::type_checker::type_check` annotates it in place
//!
//! `analyze` runs them in order and `render_diagnostic` formats an error
//! against the source it came from.

#![allow(clippy::module_inception)]

use crate::{
    ast::ast::Program,
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorTip},
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// Lexes, parses and checks `source`.
///
/// Stops after the first phase that reports anything, so a syntax error is
/// never followed by semantic noise about the half-built tree. The program
/// is empty when lexing failed.
pub fn analyze(source: &str, file: Option<String>) -> (Program, Diagnostics) {
    let (tokens, diagnostics) = tokenize(source.to_string(), file);
    if !diagnostics.is_empty() {
        return (Program::default(), diagnostics);
    }

    let (mut program, diagnostics) = parse(tokens);
    if !diagnostics.is_empty() {
        return (program, diagnostics);
    }

    let (_, diagnostics) = type_check(&mut program);
    (program, diagnostics)
}

pub fn render_diagnostic(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: TypeMismatch
        -> test.bminor
          |
        1 | x: integer = 3.4;
          = initial value of "x": expected integer, received float
    */

    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    rendered.push_str(&format!("-> {}\n", file));

    let Some(line) = error.get_line() else {
        rendered.push_str(&format!("   = {}", error.message()));
        return rendered;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    let line_text = source
        .lines()
        .nth((line as usize).saturating_sub(1))
        .unwrap_or_default();

    rendered.push_str(&format!("{:>padding$}\n", "|"));
    rendered.push_str(&format!("{} | {}\n", line_string, line_text.trim()));
    rendered.push_str(&format!("{:>padding$} {}", "=", error.message()));

    rendered
}

#[cfg(test)]
mod tests {
    use crate::errors::errors::{Error, ErrorImpl};

    use super::render_diagnostic;

    #[test]
    fn test_render_diagnostic() {
        let error = Error::new(
            ErrorImpl::UndeclaredName {
                name: "y".to_string(),
            },
            2,
        );
        let rendered = render_diagnostic(&error, "x: integer;\n    y = 1;\n", "test.bminor");

        assert_eq!(
            rendered,
            "Error: UndeclaredName\n-> test.bminor\n  |\n2 | y = 1;\n  = \"y\" is not declared"
        );
    }

    #[test]
    fn test_render_diagnostic_with_tip() {
        let error = Error::new(
            ErrorImpl::FunctionUsedAsValue {
                name: "f".to_string(),
            },
            1,
        );
        let rendered = render_diagnostic(&error, "x: integer = f;", "test.bminor");

        assert!(rendered.starts_with("Error: FunctionUsedAsValue (did you mean to call `f(...)`?)\n"));
        assert!(rendered.contains("1 | x: integer = f;"));
    }

    #[test]
    fn test_render_diagnostic_outside_source() {
        let error = Error::new(ErrorImpl::BreakOutsideLoop, 99);
        let rendered = render_diagnostic(&error, "x: integer;", "test.bminor");

        assert!(rendered.contains("99 | \n"));
        assert!(rendered.ends_with("break statement outside of a loop"));
    }

    #[test]
    fn test_render_diagnostic_without_line() {
        let error = Error::without_line(ErrorImpl::UnexpectedEof);
        let rendered = render_diagnostic(&error, "", "shell");

        assert_eq!(
            rendered,
            "Error: UnexpectedEof\n-> shell\n   = unexpected end of file, expected close expression or statement"
        );
    }
}
