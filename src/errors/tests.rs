//! Unit tests for error handling.
//!
//! This module contains tests for error kinds, messages, tips and the
//! diagnostics accumulator.

use crate::errors::{
    diagnostics::Diagnostics,
    errors::{Error, ErrorImpl, ErrorKind, ErrorTip, Phase},
};

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        10,
    );

    assert_eq!(error.get_error_name(), "IllegalCharacter");
    assert_eq!(error.get_line(), Some(10));
    assert_eq!(error.kind().phase(), Phase::Lexical);
}

#[test]
fn test_error_display() {
    let error = Error::new(
        ErrorImpl::UndeclaredName {
            name: "count".to_string(),
        },
        3,
    );

    assert_eq!(error.to_string(), "line 3: \"count\" is not declared");
    assert_eq!(error.message(), "\"count\" is not declared");

    let error = Error::without_line(ErrorImpl::UnexpectedEof);
    assert_eq!(error.get_line(), None);
    assert!(error.to_string().starts_with("unexpected end of file"));
}

#[test]
fn test_operator_mismatches_are_type_mismatches() {
    let binary = Error::new(
        ErrorImpl::BinaryOperatorMismatch {
            operator: "+".to_string(),
            left: "integer".to_string(),
            right: "float".to_string(),
        },
        1,
    );
    let unary = Error::new(
        ErrorImpl::UnaryOperatorMismatch {
            operator: "!".to_string(),
            operand: "integer".to_string(),
        },
        1,
    );

    assert_eq!(binary.kind(), ErrorKind::TypeMismatch);
    assert_eq!(unary.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        binary.message(),
        "unsupported operand types for +: integer + float"
    );
}

#[test]
fn test_redefinition_kinds_are_distinct() {
    let conflict = ErrorImpl::RedefinitionConflict {
        what: "variable".to_string(),
        name: "x".to_string(),
    };
    let duplicate = ErrorImpl::Redefinition {
        what: "variable".to_string(),
        name: "x".to_string(),
    };

    assert_eq!(conflict.kind(), ErrorKind::RedefinitionConflict);
    assert_eq!(duplicate.kind(), ErrorKind::Redefinition);
    assert_eq!(
        conflict.to_string(),
        "variable \"x\" is already defined with a different type"
    );
}

#[test]
fn test_phases() {
    assert_eq!(ErrorKind::UnterminatedString.phase(), Phase::Lexical);
    assert_eq!(ErrorKind::MalformedString.phase(), Phase::Lexical);
    assert_eq!(ErrorKind::InvalidIdentifier.phase(), Phase::Lexical);
    assert_eq!(ErrorKind::UnsupportedOperator.phase(), Phase::Syntactic);
    assert_eq!(ErrorKind::MalformedLiteral.phase(), Phase::Syntactic);
    assert_eq!(ErrorKind::ArityMismatch.phase(), Phase::Semantic);
    assert_eq!(ErrorKind::InvalidIncrement.phase(), Phase::Semantic);
}

#[test]
fn test_error_tips() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "else".to_string(),
        },
        4,
    );
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("matching `if`")),
        ErrorTip::None => panic!("expected a tip for a stray else"),
    }

    let error = Error::new(
        ErrorImpl::ArityMismatch {
            name: "f".to_string(),
            expected: 2,
            received: 1,
        },
        1,
    );
    assert_eq!(error.get_tip().to_string(), "Expected 2 arguments, received 1");

    let error = Error::new(ErrorImpl::BreakOutsideLoop, 1);
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_diagnostics_accumulate_in_order() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());

    diagnostics.report(ErrorImpl::BreakOutsideLoop, 2);
    diagnostics.report(
        ErrorImpl::UndeclaredName {
            name: "x".to_string(),
        },
        1,
    );
    diagnostics.push(Error::without_line(ErrorImpl::UnexpectedEof));

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(
        diagnostics.kinds(),
        vec![
            ErrorKind::BreakOutsideLoop,
            ErrorKind::UndeclaredName,
            ErrorKind::UnexpectedEof
        ]
    );
    assert!(diagnostics.has_error(ErrorKind::UndeclaredName));
    assert!(!diagnostics.has_error(ErrorKind::TypeMismatch));
    assert!(diagnostics.has_phase(Phase::Syntactic));
    assert!(!diagnostics.has_phase(Phase::Lexical));

    let lines = diagnostics
        .iter()
        .map(Error::get_line)
        .collect::<Vec<_>>();
    assert_eq!(lines, vec![Some(2), Some(1), None]);

    diagnostics.clear();
    assert!(diagnostics.is_empty());
}

#[test]
fn test_diagnostics_extend_and_count() {
    let mut first = Diagnostics::new();
    first.report(
        ErrorImpl::TypeMismatch {
            context: "initial value of \"x\"".to_string(),
            expected: "integer".to_string(),
            received: "float".to_string(),
        },
        1,
    );

    let mut second = Diagnostics::new();
    second.report(
        ErrorImpl::UnaryOperatorMismatch {
            operator: "-".to_string(),
            operand: "boolean".to_string(),
        },
        2,
    );
    second.report(ErrorImpl::ContinueOutsideLoop, 3);

    first.extend(second);

    assert_eq!(first.len(), 3);
    assert_eq!(first.count(ErrorKind::TypeMismatch), 2);
    assert_eq!(first.into_vec().len(), 3);
}
