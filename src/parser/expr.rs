use crate::{
    ast::expressions::{BinaryOperator, Expr, ExprKind, IncDecOperator, UnaryOperator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.missing_expression());
    };

    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than the caller, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    let line = token.line;

    let kind = match token.kind {
        TokenKind::Integer => match token.value.parse::<i64>() {
            Ok(value) => ExprKind::Integer(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    line,
                ))
            }
        },
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => ExprKind::Float(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::MalformedLiteral {
                        literal: token.value,
                    },
                    line,
                ))
            }
        },
        TokenKind::Char => {
            let mut chars = token.value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => ExprKind::Char(ch),
                _ => {
                    return Err(Error::new(
                        ErrorImpl::MalformedLiteral {
                            literal: format!("'{}'", token.value),
                        },
                        line,
                    ))
                }
            }
        }
        TokenKind::String => ExprKind::String(token.value),
        TokenKind::True => ExprKind::Boolean(true),
        TokenKind::False => ExprKind::Boolean(false),
        _ => {
            return Err(Error::new(
                ErrorImpl::MalformedLiteral {
                    literal: token.value,
                },
                line,
            ))
        }
    };

    Ok(Expr::new(kind, line))
}

/// An identifier: a plain location, or a call when followed by `(`.
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::new(
            ExprKind::VarLoc {
                name: token.value,
                mutable: false,
            },
            token.line,
        ));
    }

    parser.advance();
    let mut args = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(
        ExprKind::FuncCall {
            name: token.value,
            args,
        },
        token.line,
    ))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();

    let op = match operator_token.kind {
        TokenKind::Or => BinaryOperator::Or,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Equals => BinaryOperator::Equals,
        TokenKind::NotEquals => BinaryOperator::NotEquals,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEquals => BinaryOperator::LessEquals,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEquals => BinaryOperator::GreaterEquals,
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Percent => BinaryOperator::Modulo,
        TokenKind::Caret => BinaryOperator::Power,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnsupportedOperator {
                    operator: operator_token.value,
                },
                operator_token.line,
            ))
        }
    };

    // Same binding power on the right keeps every tier left-associative
    let right = parse_expr(parser, bp)?;

    Ok(Expr::new(
        ExprKind::BinOper {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        operator_token.line,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();

    let op = match operator_token.kind {
        TokenKind::Dash => UnaryOperator::Negate,
        TokenKind::Plus => UnaryOperator::Plus,
        _ => UnaryOperator::Not,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::new(
        ExprKind::UnaryOper {
            op,
            operand: Box::new(operand),
        },
        operator_token.line,
    ))
}

fn inc_dec_operator(kind: TokenKind) -> IncDecOperator {
    if kind == TokenKind::PlusPlus {
        IncDecOperator::Increment
    } else {
        IncDecOperator::Decrement
    }
}

pub fn parse_prefix_inc_dec_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();

    if !parser
        .get_nud_lookup()
        .contains_key(&parser.current_token_kind())
    {
        return Err(Error::new(
            ErrorImpl::InvalidIncDec {
                token: operator_token.value,
            },
            operator_token.line,
        ));
    }

    let target = parse_expr(parser, BindingPower::Postfix)?;

    Ok(Expr::new(
        ExprKind::IncDec {
            op: inc_dec_operator(operator_token.kind),
            target: Box::new(target),
            postfix: false,
        },
        operator_token.line,
    ))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let line = left.line;

    Ok(Expr::new(
        ExprKind::IncDec {
            op: inc_dec_operator(operator_token.kind),
            target: Box::new(left),
            postfix: true,
        },
        line,
    ))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let open = parser.advance();

    if !left.is_location() {
        return Err(Error::new(
            ErrorImpl::InvalidArraySyntax { token: open.value },
            open.line,
        ));
    }

    if parser.current_token_kind() == TokenKind::CloseBracket {
        let close = parser.advance();
        return Err(Error::new(
            ErrorImpl::InvalidArraySyntax {
                token: String::from("[]"),
            },
            close.line,
        ));
    }

    let index = parse_expr(parser, BindingPower::Default)?;

    let unbalanced = ErrorImpl::InvalidArraySyntax {
        token: parser.current_token().value.clone(),
    };
    parser.expect_error(TokenKind::CloseBracket, Some(unbalanced))?;

    let line = left.line;
    Ok(Expr::new(
        ExprKind::ArrayLoc {
            array: Box::new(left),
            index: Box::new(index),
            mutable: false,
        },
        line,
    ))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();

    if !left.is_location() {
        return Err(Error::new(ErrorImpl::InvalidAssignment, operator_token.line));
    }

    // Default binding power on the right makes `a = b = c` right-associative
    let value = parse_expr(parser, BindingPower::Default)?;
    let line = left.line;

    Ok(Expr::new(
        ExprKind::Assignment {
            target: Box::new(left),
            value: Box::new(value),
        },
        line,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}
