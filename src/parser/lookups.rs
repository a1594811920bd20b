use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Relational,
    Additive,
    Multiplicative,
    Exponent,
    Unary,
    Postfix,
    Primary,
}

/// Whether a statement may be directly followed by an `else`.
///
/// An `if` without `else`, or whose trailing branch is itself open, is
/// `Open`. Everything else is `Closed`.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StmtShape {
    Open,
    Closed,
}

pub type StmtHandler = fn(&mut Parser) -> Result<(Stmt, StmtShape), Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Equality and relational share one tier
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);

    // Additive, multiplicative, exponent
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Caret, BindingPower::Exponent, parse_binary_expr);

    // Postfix
    parser.led(TokenKind::PlusPlus, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::MinusMinus, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Primary, parse_index_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::Char, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_symbol_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Prefix
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::PlusPlus, parse_prefix_inc_dec_expr);
    parser.nud(TokenKind::MinusMinus, parse_prefix_inc_dec_expr);

    // Statements
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Do, parse_do_while_stmt);
    parser.stmt(TokenKind::Print, parse_print_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
