//! Unit tests for the parser module.
//!
//! Covers declarations, operator precedence, the dangling `else`,
//! statements, error classification and recovery.

use crate::{
    ast::{
        ast::{Decl, Program},
        expressions::{Expr, ExprKind},
        statements::Stmt,
        types::{SimpleType, TypeNode},
    },
    errors::{diagnostics::Diagnostics, errors::ErrorKind},
    lexer::lexer::tokenize,
};

use super::parser::parse;

fn setup_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse_source(source: &str) -> (Program, Diagnostics) {
    setup_logger();
    let (tokens, lex_diagnostics) = tokenize(source.to_string(), Some("test.bminor".to_string()));
    assert!(lex_diagnostics.is_empty(), "unexpected lexical errors: {:?}", lex_diagnostics);
    parse(tokens)
}

/// Parses `source` as the body of a function and returns its statements.
fn parse_body(source: &str) -> (Vec<Stmt>, Diagnostics) {
    let (program, diagnostics) = parse_source(&format!("main: function void () = {{ {} }}", source));

    match program.body.into_iter().next() {
        Some(Decl::Func(func)) => (func.body.unwrap_or_default(), diagnostics),
        _ => (vec![], diagnostics),
    }
}

/// Renders an expression as prefix notation, `+(1, *(2, 3))`.
fn shape(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Integer(value) => value.to_string(),
        ExprKind::Float(value) => value.to_string(),
        ExprKind::Boolean(value) => value.to_string(),
        ExprKind::Char(value) => format!("'{}'", value),
        ExprKind::String(value) => format!("{:?}", value),
        ExprKind::VarLoc { name, .. } => name.clone(),
        ExprKind::ArrayLoc { array, index, .. } => format!("{}[{}]", shape(array), shape(index)),
        ExprKind::BinOper { op, left, right } => {
            format!("{}({}, {})", op, shape(left), shape(right))
        }
        ExprKind::UnaryOper { op, operand } => format!("{}({})", op, shape(operand)),
        ExprKind::FuncCall { name, args } => format!(
            "{}({})",
            name,
            args.iter().map(shape).collect::<Vec<_>>().join(", ")
        ),
        ExprKind::Assignment { target, value } => {
            format!("=({}, {})", shape(target), shape(value))
        }
        ExprKind::IncDec {
            op,
            target,
            postfix: true,
        } => format!("({}){}", shape(target), op),
        ExprKind::IncDec {
            op,
            target,
            postfix: false,
        } => format!("{}({})", op, shape(target)),
    }
}

fn initializer_shape(source: &str) -> String {
    let (program, diagnostics) = parse_source(source);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    match &program.body[0] {
        Decl::Var(decl) => decl.value.as_ref().map(shape).unwrap_or_default(),
        other => panic!("expected a variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let (program, diagnostics) = parse_source("x: integer = 42;");

    assert!(diagnostics.is_empty());
    assert_eq!(program.body.len(), 1);

    let Decl::Var(decl) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.name, "x");
    assert!(matches!(
        decl.declared_type,
        Some(TypeNode::Simple {
            name: SimpleType::Integer,
            ..
        })
    ));
    assert_eq!(decl.value.as_ref().map(|v| v.kind.clone()), Some(ExprKind::Integer(42)));
}

#[test]
fn test_parse_variable_declaration_without_value() {
    let (program, diagnostics) = parse_source("x: integer;");

    assert!(diagnostics.is_empty());
    let Decl::Var(decl) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.name, "x");
    assert!(matches!(
        decl.declared_type,
        Some(TypeNode::Simple {
            name: SimpleType::Integer,
            ..
        })
    ));
    assert!(decl.value.is_none());
}

#[test]
fn test_parse_auto_declaration() {
    let (program, diagnostics) = parse_source("x: auto = 1.5;");

    assert!(diagnostics.is_empty());
    let Decl::Var(decl) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert!(decl.declared_type.is_none());
    assert!(decl.value.is_some());
}

#[test]
fn test_auto_requires_initializer() {
    let (program, diagnostics) = parse_source("x: auto;");

    assert!(program.body.is_empty());
    assert!(diagnostics.has_error(ErrorKind::UnexpectedToken));
}

#[test]
fn test_parse_array_declaration() {
    let (program, diagnostics) = parse_source("a: array [3] integer = {1, 2, 3};");

    assert!(diagnostics.is_empty());
    let Decl::Array(decl) = &program.body[0] else {
        panic!("expected an array declaration");
    };
    assert_eq!(decl.name, "a");
    assert_eq!(decl.values.len(), 3);

    let TypeNode::Array { base, size, .. } = &decl.type_node else {
        panic!("expected an array type");
    };
    assert!(matches!(
        **base,
        TypeNode::Simple {
            name: SimpleType::Integer,
            ..
        }
    ));
    assert_eq!(size.as_ref().map(|s| s.kind.clone()), Some(ExprKind::Integer(3)));
}

#[test]
fn test_parse_multi_dimensional_array() {
    let (program, diagnostics) = parse_source("m: array [2] array [3] float;");

    assert!(diagnostics.is_empty());
    let Decl::Array(decl) = &program.body[0] else {
        panic!("expected an array declaration");
    };
    let TypeNode::Array { base, .. } = &decl.type_node else {
        panic!("expected an array type");
    };
    assert!(matches!(**base, TypeNode::Array { .. }));
}

#[test]
fn test_nested_initializer_is_a_syntax_error() {
    let (program, diagnostics) =
        parse_source("m: array [2] array [2] integer = {{1, 2}, {3, 4}};\nx: integer;");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_error(ErrorKind::UnexpectedToken));

    // The declaration after the broken one is still parsed
    assert_eq!(program.body.len(), 1);
    assert_eq!(program.body[0].name(), "x");
}

#[test]
fn test_parse_function_declaration() {
    let (program, diagnostics) =
        parse_source("add: function integer (a: integer, b: integer) = { return a + b; }");

    assert!(diagnostics.is_empty());
    let Decl::Func(func) = &program.body[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(func.name, "add");
    assert_eq!(func.signature.params.len(), 2);
    assert_eq!(func.signature.params[1].name, "b");
    assert_eq!(func.body.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_parse_prototype() {
    let (program, diagnostics) =
        parse_source("sum: function integer (values: array [] integer, n: integer);");

    assert!(diagnostics.is_empty());
    let Decl::Func(func) = &program.body[0] else {
        panic!("expected a function declaration");
    };
    assert!(func.body.is_none());
    assert!(matches!(
        func.signature.params[0].type_node,
        TypeNode::Array { size: None, .. }
    ));
}

#[test]
fn test_precedence_multiplication_over_addition() {
    assert_eq!(initializer_shape("x: integer = 1+2*3;"), "+(1, *(2, 3))");
    assert_eq!(initializer_shape("x: integer = 1*2+3;"), "+(*(1, 2), 3)");
}

#[test]
fn test_exponent_is_left_nested() {
    assert_eq!(initializer_shape("x: integer = 2^3^2;"), "^(^(2, 3), 2)");
    assert_eq!(initializer_shape("x: integer = 2*3^2;"), "*(2, ^(3, 2))");
}

#[test]
fn test_binary_tiers_are_left_associative() {
    assert_eq!(initializer_shape("x: integer = 1-2-3;"), "-(-(1, 2), 3)");
    assert_eq!(initializer_shape("x: integer = 8/4/2;"), "/(/(8, 4), 2)");
}

#[test]
fn test_logical_and_relational_tiers() {
    assert_eq!(
        initializer_shape("b: boolean = a || b && c == d < e;"),
        "||(a, &&(b, <(==(c, d), e)))"
    );
    assert_eq!(
        initializer_shape("b: boolean = a + 1 < b * 2;"),
        "<(+(a, 1), *(b, 2))"
    );
}

#[test]
fn test_unary_and_postfix() {
    assert_eq!(initializer_shape("x: integer = -a^2;"), "^(-(a), 2)");
    assert_eq!(initializer_shape("b: boolean = !a && b;"), "&&(!(a), b)");
    assert_eq!(initializer_shape("x: integer = -a++;"), "-((a)++)");
    assert_eq!(initializer_shape("x: integer = +a;"), "+(a)");
}

#[test]
fn test_grouping_calls_and_indexing() {
    assert_eq!(initializer_shape("x: integer = (1+2)*3;"), "*(+(1, 2), 3)");
    assert_eq!(initializer_shape("x: integer = f(1, g(2)) + a[i][j];"), "+(f(1, g(2)), a[i][j])");
}

#[test]
fn test_assignment_is_right_associative() {
    let (body, diagnostics) = parse_body("a = b = 3;");

    assert!(diagnostics.is_empty());
    let Stmt::Assignment(stmt) = &body[0] else {
        panic!("expected an assignment statement");
    };
    assert_eq!(shape(&stmt.target), "a");
    assert_eq!(shape(&stmt.value), "=(b, 3)");
}

#[test]
fn test_assignment_to_non_location() {
    let (_, diagnostics) = parse_body("1 + a = 3;");

    assert_eq!(diagnostics.kinds(), vec![ErrorKind::InvalidAssignment]);
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let (body, diagnostics) = parse_body("if (a) if (b) x=1; else y=2;");

    assert!(diagnostics.is_empty());
    assert_eq!(body.len(), 1);

    let Stmt::If(outer) = &body[0] else {
        panic!("expected an if statement");
    };
    assert!(outer.else_branch.is_none());

    let Stmt::If(inner) = outer.then_branch.as_ref() else {
        panic!("expected a nested if statement");
    };
    assert!(inner.else_branch.is_some());
}

#[test]
fn test_else_binds_through_closed_loop() {
    let (body, diagnostics) =
        parse_body("if (a) while (b) if (c) x=1; else y=2; else z=3;");

    assert!(diagnostics.is_empty());
    let Stmt::If(outer) = &body[0] else {
        panic!("expected an if statement");
    };
    assert!(outer.else_branch.is_some());

    let Stmt::While(inner_loop) = outer.then_branch.as_ref() else {
        panic!("expected a while statement");
    };
    assert!(matches!(inner_loop.body.as_ref(), Stmt::If(inner) if inner.else_branch.is_some()));
}

#[test]
fn test_stray_else_is_unexpected() {
    let (_, diagnostics) = parse_body("if (a) while (b) if (c) x=1; else y=2; else z=3; else w=4;");

    assert_eq!(diagnostics.kinds(), vec![ErrorKind::UnexpectedToken]);
}

#[test]
fn test_if_else_with_blocks() {
    let (body, diagnostics) = parse_body("if (a) { x = 1; } else { x = 2; }");

    assert!(diagnostics.is_empty());
    let Stmt::If(stmt) = &body[0] else {
        panic!("expected an if statement");
    };
    assert!(matches!(stmt.then_branch.as_ref(), Stmt::Block(_)));
    assert!(matches!(stmt.else_branch.as_deref(), Some(Stmt::Block(_))));
}

#[test]
fn test_parse_loops() {
    let (body, diagnostics) = parse_body(
        "for (i = 0; i < 10; i++) print i; for (;;) break; while (x > 0) x--; do { x++; } while (x < 5);",
    );

    assert!(diagnostics.is_empty());
    assert_eq!(body.len(), 4);

    let Stmt::For(full) = &body[0] else {
        panic!("expected a for statement");
    };
    assert!(full.init.is_some() && full.condition.is_some() && full.update.is_some());

    let Stmt::For(empty) = &body[1] else {
        panic!("expected a for statement");
    };
    assert!(empty.init.is_none() && empty.condition.is_none() && empty.update.is_none());
    assert!(matches!(empty.body.as_ref(), Stmt::Break { .. }));

    assert!(matches!(body[2], Stmt::While(_)));
    assert!(matches!(body[3], Stmt::DoWhile(_)));
}

#[test]
fn test_do_without_while() {
    let (_, diagnostics) = parse_body("do x++; y = 1;");

    assert!(diagnostics.has_error(ErrorKind::InvalidStatement));
}

#[test]
fn test_do_body_must_be_closed() {
    let (_, diagnostics) = parse_body("do if (a) x++; while (b);");

    assert!(diagnostics.has_error(ErrorKind::InvalidStatement));
}

#[test]
fn test_print_and_return() {
    let (body, diagnostics) = parse_body("print a, \"b\", 'c'; return; return 1;");

    assert!(diagnostics.is_empty());
    let Stmt::Print(print) = &body[0] else {
        panic!("expected a print statement");
    };
    assert_eq!(print.args.len(), 3);
    assert!(matches!(&body[1], Stmt::Return(ret) if ret.value.is_none()));
    assert!(matches!(&body[2], Stmt::Return(ret) if ret.value.is_some()));
}

#[test]
fn test_local_declarations_are_statements() {
    let (body, diagnostics) = parse_body("x: integer = 1; a: array [2] char;");

    assert!(diagnostics.is_empty());
    assert!(matches!(body[0], Stmt::Decl(Decl::Var(_))));
    assert!(matches!(body[1], Stmt::Decl(Decl::Array(_))));
}

#[test]
fn test_nested_function_is_rejected() {
    let (_, diagnostics) = parse_body("f: function void () = { }");

    assert!(diagnostics.has_error(ErrorKind::InvalidStatement));
}

#[test]
fn test_missing_expression() {
    let (_, diagnostics) = parse_body("x = ;");

    assert_eq!(diagnostics.kinds(), vec![ErrorKind::MissingExpression]);
}

#[test]
fn test_missing_operand_after_operator() {
    let (_, diagnostics) = parse_source("x: integer = 1 + * 2;");

    assert_eq!(diagnostics.kinds(), vec![ErrorKind::MissingExpression]);
}

#[test]
fn test_bitwise_operators_are_unsupported() {
    let (_, diagnostics) = parse_source("x: integer = a & b;\ny: integer = a | b;\nz: integer = ~a;");

    assert_eq!(diagnostics.count(ErrorKind::UnsupportedOperator), 3);
}

#[test]
fn test_invalid_array_syntax() {
    let (_, diagnostics) = parse_body("a[] = 1; b[1; c] = 3;");

    assert_eq!(diagnostics.count(ErrorKind::InvalidArraySyntax), 3);
}

#[test]
fn test_invalid_inc_dec() {
    let (_, diagnostics) = parse_body("x = ++;");

    assert_eq!(diagnostics.kinds(), vec![ErrorKind::InvalidIncDec]);
}

#[test]
fn test_literal_increment_is_parser_legal() {
    let (body, diagnostics) = parse_body("5++;");

    assert!(diagnostics.is_empty());
    assert!(matches!(&body[0], Stmt::Expr(expr) if shape(expr) == "(5)++"));
}

#[test]
fn test_unexpected_eof() {
    let (program, diagnostics) = parse_source("main: function void () = { x = 1;");

    assert!(program.body.is_empty());
    assert_eq!(diagnostics.kinds(), vec![ErrorKind::UnexpectedEof]);
}

#[test]
fn test_top_level_statement_is_rejected() {
    let (_, diagnostics) = parse_source("print 1;\nx: integer;");

    assert_eq!(diagnostics.kinds(), vec![ErrorKind::UnexpectedToken]);
}

#[test]
fn test_recovery_reports_every_error() {
    let source = "
        a: integer = ;
        b: integer = 1 +;
        main: function void () = {
            x = ;
            y: integer = 2;
            print y
        }
        c: integer = 3;
    ";
    let (program, diagnostics) = parse_source(source);

    assert_eq!(
        diagnostics.kinds(),
        vec![
            ErrorKind::MissingExpression,
            ErrorKind::MissingExpression,
            ErrorKind::MissingExpression,
            ErrorKind::UnexpectedToken,
        ]
    );
    assert_eq!(
        diagnostics.iter().map(|e| e.get_line()).collect::<Vec<_>>(),
        vec![Some(2), Some(3), Some(5), Some(8)]
    );

    let names = program.body.iter().map(Decl::name).collect::<Vec<_>>();
    assert_eq!(names, vec!["main", "c"]);

    let Decl::Func(main) = &program.body[0] else {
        panic!("expected main");
    };
    assert_eq!(main.body.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_empty_token_stream() {
    let (program, diagnostics) = parse(vec![]);

    assert!(program.body.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_node_lines() {
    let (program, _) = parse_source("\n\nx: integer =\n 1 +\n 2;");

    let Decl::Var(decl) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.line, 3);
    assert_eq!(decl.value.as_ref().map(|v| v.line), Some(4));
}
