//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Expressions are parsed Pratt-style through NUD/LED lookup tables,
//! statements through a statement lookup table (see `stmt.rs` for the
//! open/closed statement split that settles the dangling `else`).
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence
//! - Type annotation handlers
//!
//! Syntax errors never abort the parse. Each one is recorded in the
//! parser's `Diagnostics`, the tokens of the broken construct are skipped,
//! and parsing resumes at the next statement or declaration.

use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    ast::ast::{Decl, Program},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_decl,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The tokens to parse, always terminated by an `EOF` token
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Syntax errors recorded so far
    diagnostics: Diagnostics,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    /// Creates a parser with every lookup table registered.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                line,
            });
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        };

        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    pub fn line(&self) -> u32 {
        self.current_token().line
    }

    /// Advances to the next token and returns the previous one.
    /// The final `EOF` token is never stepped over.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<ErrorImpl>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) if self.current_token_kind() != TokenKind::EOF => {
                Err(Error::new(error, self.line()))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Expects a token of the specified kind with the default error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Whether the next tokens start a declaration (`name :`).
    pub fn at_declaration(&self) -> bool {
        self.current_token_kind() == TokenKind::Identifier && self.peek_kind(1) == TokenKind::Colon
    }

    /// Builds the error for a token that cannot continue the current
    /// construct, classified by what the token is.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();

        let error = match token.kind {
            TokenKind::EOF => ErrorImpl::UnexpectedEof,
            TokenKind::BitAnd | TokenKind::BitOr | TokenKind::Tilde => {
                ErrorImpl::UnsupportedOperator {
                    operator: token.value.clone(),
                }
            }
            TokenKind::OpenBracket | TokenKind::CloseBracket => ErrorImpl::InvalidArraySyntax {
                token: token.value.clone(),
            },
            _ => ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
        };

        Error::new(error, token.line)
    }

    /// Builds the error for a token found where an operand was required.
    pub fn missing_expression(&self) -> Error {
        let token = self.current_token();

        match token.kind {
            TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::CloseParen
            | TokenKind::CloseCurly
            | TokenKind::Assignment
            | TokenKind::Or
            | TokenKind::And
            | TokenKind::Equals
            | TokenKind::NotEquals
            | TokenKind::Less
            | TokenKind::LessEquals
            | TokenKind::Greater
            | TokenKind::GreaterEquals
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Caret => Error::new(
                ErrorImpl::MissingExpression {
                    token: token.value.clone(),
                },
                token.line,
            ),
            _ => self.unexpected(),
        }
    }

    pub fn report(&mut self, error: Error) {
        trace!("syntax error: {}", error);
        self.diagnostics.push(error);
    }

    /// Skips the rest of a broken top-level declaration.
    ///
    /// Stops after a `;` outside braces, or after a `}` that closes the
    /// outermost brace when a new declaration (or the end) follows.
    pub fn synchronize_declaration(&mut self) {
        let mut depth: i32 = 0;

        while self.has_tokens() {
            let token = self.advance();

            match token.kind {
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly => {
                    depth = (depth - 1).max(0);
                    if depth == 0 && (self.at_declaration() || !self.has_tokens()) {
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Skips the rest of a broken statement inside a block.
    ///
    /// Stops after a `;` outside nested braces, after a nested block closes,
    /// or in front of the `}` that closes the enclosing block.
    pub fn synchronize_statement(&mut self) {
        let mut depth: i32 = 0;

        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::CloseCurly if depth == 0 => return,
                TokenKind::CloseCurly => {
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::OpenCurly => {
                    self.advance();
                    depth += 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Unlike `led`, this leaves the binding power table alone: `-` and
    /// `++` are both prefix and infix/postfix tokens.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type annotation handler for a token.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

/// Parses a stream of tokens into a `Program`.
///
/// Always returns a program. Declarations that fail to parse are left out
/// of it and described in the returned diagnostics instead.
pub fn parse(tokens: Vec<Token>) -> (Program, Diagnostics) {
    let mut parser = Parser::new(tokens);
    let mut body: Vec<Decl> = vec![];

    while parser.has_tokens() {
        if !parser.at_declaration() {
            let token = parser.current_token();
            let error = match token.kind {
                TokenKind::Identifier | TokenKind::Print | TokenKind::If | TokenKind::For
                | TokenKind::While | TokenKind::Do | TokenKind::Return | TokenKind::OpenCurly => {
                    Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: token.value.clone(),
                            message: String::from("only declarations are allowed at the top level"),
                        },
                        token.line,
                    )
                }
                _ => parser.unexpected(),
            };

            parser.report(error);
            parser.synchronize_declaration();
            continue;
        }

        match parse_decl(&mut parser) {
            Ok(decl) => {
                trace!("parsed declaration {} at line {}", decl.name(), decl.line());
                body.push(decl);
            }
            Err(error) => {
                parser.report(error);
                parser.synchronize_declaration();
            }
        }
    }

    let diagnostics = parser.into_diagnostics();
    debug!(
        "parsed {} declarations, {} syntax errors",
        body.len(),
        diagnostics.len()
    );

    (Program { body }, diagnostics)
}
