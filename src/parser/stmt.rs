//! Statement and declaration parsing.
//!
//! Statements come in two shapes. A *closed* statement can safely be
//! followed by `else`; an *open* one is an `if` without `else` (or a loop or
//! `if`/`else` whose trailing statement is open). `parse_stmt` reports the
//! shape of what it parsed and `parse_closed_stmt` insists on a closed one.
//! An `if` only takes an `else` when its consequent came back closed, which
//! is exactly what makes every `else` bind to the nearest unmatched `if`.

use log::trace;

use crate::{
    ast::{
        ast::{ArrayDecl, Decl, FuncDecl, VarDecl},
        expressions::{Expr, ExprKind},
        statements::{
            AssignmentStmt, BlockStmt, DoWhileStmt, ForStmt, IfStmt, PrintStmt, ReturnStmt, Stmt,
            WhileStmt,
        },
        types::{Type, TypeNode},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr,
    lookups::{BindingPower, StmtShape},
    parser::Parser,
    types::parse_type,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    trace!(
        "parsing statement at line {} ({})",
        parser.line(),
        parser.current_token_kind()
    );

    if parser.at_declaration() {
        return parse_decl_stmt(parser);
    }

    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok((expression_stmt(expr), StmtShape::Closed))
}

/// Parses a statement that must be closed, such as the body of `do`.
pub fn parse_closed_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.line();
    let (stmt, shape) = parse_stmt(parser)?;

    if shape == StmtShape::Open {
        return Err(Error::new(
            ErrorImpl::InvalidStatement {
                message: String::from("expected a closed statement, wrap the `if` in braces"),
            },
            line,
        ));
    }

    Ok(stmt)
}

/// An assignment at the top of an expression statement becomes an
/// assignment statement.
fn expression_stmt(expr: Expr) -> Stmt {
    let line = expr.line;

    match expr.kind {
        ExprKind::Assignment { target, value } => Stmt::Assignment(AssignmentStmt {
            target: *target,
            value: *value,
            line,
        }),
        kind => Stmt::Expr(Expr {
            kind,
            line,
            ty: expr.ty,
        }),
    }
}

fn parse_decl_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.line();
    let decl = parse_decl(parser)?;

    if let Decl::Func(func) = &decl {
        return Err(Error::new(
            ErrorImpl::InvalidStatement {
                message: format!("function {:?} must be declared at the top level", func.name),
            },
            line,
        ));
    }

    Ok((Stmt::Decl(decl), StmtShape::Closed))
}

/// Parses `( expr )` as used by `if`, `while` and `do ... while`.
fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    let condition = parse_condition(parser)?;

    let (then_branch, then_shape) = parse_stmt(parser)?;

    // An open consequent already gave any following `else` to an inner `if`
    if then_shape == StmtShape::Closed && parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        let (else_branch, else_shape) = parse_stmt(parser)?;

        let stmt = Stmt::If(IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
            line,
        });
        return Ok((stmt, else_shape));
    }

    let stmt = Stmt::If(IfStmt {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: None,
        line,
    });
    Ok((stmt, StmtShape::Open))
}

fn parse_optional_expr(parser: &mut Parser, terminator: TokenKind) -> Result<Option<Expr>, Error> {
    let expr = if parser.current_token_kind() == terminator {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.expect(terminator)?;
    Ok(expr)
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;

    parser.expect(TokenKind::OpenParen)?;
    let init = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let condition = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let update = parse_optional_expr(parser, TokenKind::CloseParen)?;

    let (body, shape) = parse_stmt(parser)?;

    let stmt = Stmt::For(ForStmt {
        init,
        condition,
        update,
        body: Box::new(body),
        line,
    });
    Ok((stmt, shape))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    let condition = parse_condition(parser)?;
    let (body, shape) = parse_stmt(parser)?;

    let stmt = Stmt::While(WhileStmt {
        condition,
        body: Box::new(body),
        line,
    });
    Ok((stmt, shape))
}

pub fn parse_do_while_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    let body = parse_closed_stmt(parser)?;

    if parser.current_token_kind() != TokenKind::While {
        let error = if parser.has_tokens() {
            Error::new(
                ErrorImpl::InvalidStatement {
                    message: String::from("`do` without a matching `while`"),
                },
                parser.line(),
            )
        } else {
            parser.unexpected()
        };
        return Err(error);
    }

    parser.advance();
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    let stmt = Stmt::DoWhile(DoWhileStmt {
        body: Box::new(body),
        condition,
        line,
    });
    Ok((stmt, StmtShape::Closed))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    let mut args = vec![];

    if parser.current_token_kind() != TokenKind::Semicolon {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok((Stmt::Print(PrintStmt { args, line }), StmtShape::Closed))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    let value = parse_optional_expr(parser, TokenKind::Semicolon)?;

    Ok((Stmt::Return(ReturnStmt { value, line }), StmtShape::Closed))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    parser.expect(TokenKind::Semicolon)?;

    Ok((Stmt::Break { line }, StmtShape::Closed))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.advance().line;
    parser.expect(TokenKind::Semicolon)?;

    Ok((Stmt::Continue { line }, StmtShape::Closed))
}

/// Parses `{ stmts }`. Broken statements inside the braces are reported
/// and skipped without failing the whole block.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected());
        }

        match parse_stmt(parser) {
            Ok((stmt, _)) => statements.push(stmt),
            Err(error) => {
                parser.report(error);
                parser.synchronize_statement();
            }
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(statements)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<(Stmt, StmtShape), Error> {
    let line = parser.line();
    let body = parse_block(parser)?;

    Ok((Stmt::Block(BlockStmt { body, line }), StmtShape::Closed))
}

/// `{ e, e, ... }` after an array declaration. Only flat lists are allowed.
fn parse_initializer_list(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut values = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseCurly {
        loop {
            if parser.current_token_kind() == TokenKind::OpenCurly {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: String::from("{"),
                        message: String::from("nested initializer lists are not supported"),
                    },
                    parser.line(),
                ));
            }

            values.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(values)
}

/// Parses `name : type ...`, dispatching on the declared type to a
/// variable, array or function declaration.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = name_token.value;
    let line = name_token.line;

    parser.expect(TokenKind::Colon)?;

    if parser.current_token_kind() == TokenKind::Auto {
        parser.advance();

        let needs_value = ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("`auto` declarations need an initial value"),
        };
        parser.expect_error(TokenKind::Assignment, Some(needs_value))?;
        let value = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;

        return Ok(Decl::Var(VarDecl {
            name,
            declared_type: None,
            value: Some(value),
            line,
            ty: Type::Unresolved,
            scope: None,
        }));
    }

    let type_node = parse_type(parser)?;

    match type_node {
        TypeNode::Function(signature) => {
            let body = if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                Some(parse_block(parser)?)
            } else {
                parser.expect(TokenKind::Semicolon)?;
                None
            };

            Ok(Decl::Func(FuncDecl {
                name,
                signature,
                body,
                line,
                ty: Type::Unresolved,
                scope: None,
            }))
        }
        TypeNode::Array { size: None, .. } => Err(Error::new(
            ErrorImpl::InvalidArraySyntax {
                token: String::from("[]"),
            },
            line,
        )),
        array @ TypeNode::Array { .. } => {
            let values = if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                parse_initializer_list(parser)?
            } else {
                vec![]
            };
            parser.expect(TokenKind::Semicolon)?;

            Ok(Decl::Array(ArrayDecl {
                name,
                type_node: array,
                values,
                line,
                ty: Type::Unresolved,
                scope: None,
            }))
        }
        simple => {
            let value = if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                Some(parse_expr(parser, BindingPower::Default)?)
            } else {
                None
            };
            parser.expect(TokenKind::Semicolon)?;

            Ok(Decl::Var(VarDecl {
                name,
                declared_type: Some(simple),
                value,
                line,
                ty: Type::Unresolved,
                scope: None,
            }))
        }
    }
}
