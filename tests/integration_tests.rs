//! Integration tests for the whole front end.
//!
//! These tests drive source text through tokenization, parsing and type
//! checking using only the public API.

use bminor::{
    analyze,
    ast::{ast::Decl, statements::Stmt, types::Type},
    errors::errors::{ErrorKind, Phase},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_diagnostic,
    type_checker::type_checker::type_check,
};

const PROGRAM: &str = "
/* Sums the first n squares. */
squares: array [5] integer = {1, 4, 9, 16, 25};
limit: integer = 5;

sum: function integer (values: array [] integer, count: integer);

main: function integer () = {
    total: integer = sum(squares, limit);
    ratio: float = 0.5;
    done: boolean = false;

    if (total > 50) print \"big\", total, '\\n';
    else print \"small\";

    while (!done) {
        ratio = ratio * 2.0;
        if (ratio >= 4.0) done = true;
    }

    return total;
}

sum: function integer (values: array [] integer, count: integer) = {
    i: integer;
    result: integer = 0;
    for (i = 0; i < count; i++) {
        result = result + values[i];
    }
    return result;
}
";

#[test]
fn test_clean_program() {
    let (program, diagnostics) = analyze(PROGRAM, Some("squares.bminor".to_string()));

    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    assert_eq!(program.body.len(), 5);

    let names = program
        .body
        .iter()
        .map(|decl| decl.name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["squares", "limit", "sum", "main", "sum"]);

    assert_eq!(
        program.body[3].ty(),
        &Type::Function {
            return_type: Box::new(Type::Integer),
            params: vec![],
        }
    );
}

#[test]
fn test_phases_run_separately() {
    let (tokens, lex_diagnostics) = tokenize(PROGRAM.to_string(), None);
    assert!(lex_diagnostics.is_empty());

    let (mut program, parse_diagnostics) = parse(tokens);
    assert!(parse_diagnostics.is_empty());

    let (scope, check_diagnostics) = type_check(&mut program);
    assert!(check_diagnostics.is_empty());

    for name in ["squares", "limit", "sum", "main", "array_length"] {
        assert!(scope.get(name).is_some(), "{} should be declared", name);
    }
    assert!(scope.get("total").is_none());
}

#[test]
fn test_every_expression_is_annotated() {
    let (program, diagnostics) = analyze(PROGRAM, None);
    assert!(diagnostics.is_empty());

    let main = match &program.body[3] {
        Decl::Func(func) => func,
        other => panic!("expected main, got {:?}", other),
    };

    for stmt in main.body.iter().flatten() {
        match stmt {
            Stmt::Decl(Decl::Var(decl)) => {
                let value = decl.value.as_ref().expect("every local here is initialized");
                assert!(value.ty.is_resolved(), "{} is unresolved", decl.name);
                assert_eq!(value.ty, decl.ty);
            }
            Stmt::Return(stmt) => {
                assert_eq!(stmt.value.as_ref().map(|value| &value.ty), Some(&Type::Integer));
            }
            _ => {}
        }
    }
}

#[test]
fn test_lexical_errors_stop_the_pipeline() {
    let (program, diagnostics) = analyze("x: string = \"open;\ny: char = 'ab';", None);

    assert!(program.body.is_empty());
    assert_eq!(
        diagnostics.kinds(),
        vec![ErrorKind::UnterminatedString, ErrorKind::MalformedChar]
    );
    assert!(diagnostics.iter().all(|error| error.kind().phase() == Phase::Lexical));
}

#[test]
fn test_rejected_literals_are_skipped() {
    let (tokens, lex_diagnostics) = tokenize("x: char = '\\xff';\ny: integer = 2;".to_string(), None);
    assert_eq!(lex_diagnostics.kinds(), vec![ErrorKind::MalformedChar]);

    // The parser only sees the gap the bad literal left behind
    let (program, parse_diagnostics) = parse(tokens);
    assert_eq!(parse_diagnostics.kinds(), vec![ErrorKind::MissingExpression]);
    assert_eq!(program.body.len(), 1);
    assert_eq!(program.body[0].name(), "y");
}

#[test]
fn test_syntax_errors_are_all_reported() {
    let source = "x: integer = 1 & 2;
y: integer = ;
main: function void () = {
    if (x) print 1; else print 2; else print 3;
}";
    let (_, diagnostics) = analyze(source, None);

    assert_eq!(
        diagnostics.kinds(),
        vec![
            ErrorKind::UnsupportedOperator,
            ErrorKind::MissingExpression,
            ErrorKind::UnexpectedToken
        ]
    );
    assert!(!diagnostics.has_phase(Phase::Semantic));
}

#[test]
fn test_semantic_errors_are_all_reported() {
    let source = "x: integer = 3.4;
x: float;
f: function integer (a: integer) = { return a; }
main: function void () = {
    f = 2;
    y: integer = f(true, 1);
    z: integer = q;
    while (y) break;
}";
    let (_, diagnostics) = analyze(source, Some("errors.bminor".to_string()));

    assert_eq!(
        diagnostics.kinds(),
        vec![
            ErrorKind::TypeMismatch,
            ErrorKind::RedefinitionConflict,
            ErrorKind::ImmutableAssignment,
            ErrorKind::ArityMismatch,
            ErrorKind::TypeMismatch,
            ErrorKind::UndeclaredName,
            ErrorKind::NonBooleanCondition
        ]
    );

    let lines = diagnostics
        .iter()
        .map(|error| error.get_line())
        .collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![Some(1), Some(2), Some(5), Some(6), Some(6), Some(7), Some(8)]
    );
}

#[test]
fn test_dangling_else_through_the_pipeline() {
    let source = "main: function void () = {
    a: boolean = true;
    b: boolean = false;
    x: integer;
    y: integer;
    if (a) if (b) x = 1; else y = 2;
}";
    let (program, diagnostics) = analyze(source, None);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let body = match &program.body[0] {
        Decl::Func(func) => func.body.clone().unwrap_or_default(),
        other => panic!("expected main, got {:?}", other),
    };

    match &body[4] {
        Stmt::If(outer) => {
            assert!(outer.else_branch.is_none());
            match outer.then_branch.as_ref() {
                Stmt::If(inner) => assert!(inner.else_branch.is_some()),
                other => panic!("expected the inner if, got {:?}", other),
            }
        }
        other => panic!("expected an if statement, got {:?}", other),
    }
}

#[test]
fn test_independent_runs_agree() {
    let source = "x: integer = 3.4;\nmain: function void () = { y = x; }";

    let (first_program, first) = analyze(source, None);
    let (second_program, second) = analyze(source, None);

    assert_eq!(first, second);
    assert_eq!(first_program, second_program);
}

#[test]
fn test_rendered_diagnostics() {
    let source = "x: integer = 3.4;";
    let (_, diagnostics) = analyze(source, Some("render.bminor".to_string()));

    let rendered = diagnostics
        .iter()
        .map(|error| render_diagnostic(error, source, "render.bminor"))
        .collect::<Vec<_>>();

    assert_eq!(
        rendered,
        vec![
            "Error: TypeMismatch\n-> render.bminor\n  |\n1 | x: integer = 3.4;\n  = initial value of \"x\": expected integer, received float"
        ]
    );
}
