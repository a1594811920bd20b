//! Parsing of type annotations.
//!
//! Every B-Minor type starts with a keyword, so a single table of prefix
//! handlers is enough: simple type names, `array [size] T` and
//! `function R ( params )`.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::Param,
        types::{FuncType, SimpleType, TypeNode},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeNode, Error>;
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::IntegerType, parse_simple_type);
    parser.type_nud(TokenKind::FloatType, parse_simple_type);
    parser.type_nud(TokenKind::BooleanType, parse_simple_type);
    parser.type_nud(TokenKind::CharType, parse_simple_type);
    parser.type_nud(TokenKind::StringType, parse_simple_type);
    parser.type_nud(TokenKind::Void, parse_simple_type);
    parser.type_nud(TokenKind::Array, parse_array_type);
    parser.type_nud(TokenKind::Function, parse_function_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token_kind = parser.current_token_kind();

    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(type_fn) => type_fn(parser),
        None if token_kind == TokenKind::EOF => Err(parser.unexpected()),
        None => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a type"),
            },
            parser.line(),
        )),
    }
}

/// A type that may not be a function, as required for array elements and
/// parameters.
fn parse_value_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token = parser.current_token().clone();
    let type_node = parse_type(parser)?;

    if let TypeNode::Function(_) = type_node {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value,
                message: String::from("function types can only be declared by name"),
            },
            token.line,
        ));
    }

    Ok(type_node)
}

pub fn parse_simple_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token = parser.advance();

    let name = match token.kind {
        TokenKind::IntegerType => SimpleType::Integer,
        TokenKind::FloatType => SimpleType::Float,
        TokenKind::BooleanType => SimpleType::Boolean,
        TokenKind::CharType => SimpleType::Char,
        TokenKind::StringType => SimpleType::String,
        _ => SimpleType::Void,
    };

    Ok(TypeNode::Simple {
        name,
        line: token.line,
    })
}

/// `array [size] T`, where the size may be left out as in `array [] T`.
pub fn parse_array_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let line = parser.advance().line;

    let missing_bracket = ErrorImpl::InvalidArraySyntax {
        token: parser.current_token().value.clone(),
    };
    parser.expect_error(TokenKind::OpenBracket, Some(missing_bracket))?;

    let size = if parser.current_token_kind() == TokenKind::CloseBracket {
        None
    } else {
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    };

    let unbalanced = ErrorImpl::InvalidArraySyntax {
        token: parser.current_token().value.clone(),
    };
    parser.expect_error(TokenKind::CloseBracket, Some(unbalanced))?;

    let base = parse_value_type(parser)?;

    Ok(TypeNode::Array {
        base: Box::new(base),
        size,
        line,
    })
}

/// `function R ( name: T, ... )`
pub fn parse_function_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let line = parser.advance().line;
    let return_type = parse_value_type(parser)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            params.push(parse_param(parser)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(TypeNode::Function(FuncType {
        return_type: Box::new(return_type),
        params,
        line,
    }))
}

fn parse_param(parser: &mut Parser) -> Result<Param, Error> {
    let missing_name = ErrorImpl::UnexpectedTokenDetailed {
        token: parser.current_token().value.clone(),
        message: String::from("expected a parameter name"),
    };
    let name = parser.expect_error(TokenKind::Identifier, Some(missing_name))?;
    parser.expect(TokenKind::Colon)?;
    let type_node = parse_value_type(parser)?;

    Ok(Param {
        name: name.value,
        type_node,
        line: name.line,
        ty: Default::default(),
    })
}
