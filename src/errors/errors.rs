use std::fmt::Display;

use thiserror::Error;

/// The compiler phase that detected an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexical,
    Syntactic,
    Semantic,
}

/// Field-less tag for every diagnostic the front end can emit.
///
/// Several `ErrorImpl` variants can share one kind (every flavour of type
/// mismatch is `TypeMismatch`), so tests and tooling match on this instead of
/// on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Lexical
    IllegalCharacter,
    MalformedNumber,
    MalformedFloat,
    MalformedChar,
    UnterminatedString,
    MalformedString,
    InvalidIdentifier,

    // Syntactic
    UnexpectedToken,
    UnexpectedEof,
    MissingExpression,
    InvalidStatement,
    InvalidArraySyntax,
    InvalidIncDec,
    UnsupportedOperator,
    InvalidAssignment,
    MalformedLiteral,

    // Semantic
    UndeclaredName,
    RedefinitionConflict,
    Redefinition,
    TypeMismatch,
    ImmutableAssignment,
    NonBooleanCondition,
    UndefinedFunction,
    NotCallable,
    ArityMismatch,
    ReturnOutsideFunction,
    FunctionUsedAsValue,
    VoidDeclaration,
    InvalidArraySize,
    ArrayInitializerLength,
    NonIntegerIndex,
    IndexOutOfBounds,
    NotAnArray,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    MissingReturnValue,
    InvalidPrintArgument,
    InvalidIncrement,
}

impl ErrorKind {
    pub fn phase(&self) -> Phase {
        match self {
            ErrorKind::IllegalCharacter
            | ErrorKind::MalformedNumber
            | ErrorKind::MalformedFloat
            | ErrorKind::MalformedChar
            | ErrorKind::UnterminatedString
            | ErrorKind::MalformedString
            | ErrorKind::InvalidIdentifier => Phase::Lexical,

            ErrorKind::UnexpectedToken
            | ErrorKind::UnexpectedEof
            | ErrorKind::MissingExpression
            | ErrorKind::InvalidStatement
            | ErrorKind::InvalidArraySyntax
            | ErrorKind::InvalidIncDec
            | ErrorKind::UnsupportedOperator
            | ErrorKind::InvalidAssignment
            | ErrorKind::MalformedLiteral => Phase::Syntactic,

            _ => Phase::Semantic,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    line: Option<u32>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, line: u32) -> Self {
        Error {
            internal_error: error_impl,
            line: Some(line),
        }
    }

    /// An error with no meaningful source line, such as running out of input.
    pub fn without_line(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            line: None,
        }
    }

    pub fn get_line(&self) -> Option<u32> {
        self.line
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> String {
        self.kind().to_string()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token } if token == "else" => ErrorTip::Suggestion(
                String::from("`else` must follow the statement of a matching `if`"),
            ),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnsupportedOperator { .. } => ErrorTip::Suggestion(String::from(
                "bitwise operators are not part of the language, use `&&` or `||`",
            )),
            ErrorImpl::InvalidAssignment => ErrorTip::Suggestion(String::from(
                "only variables and array elements can be assigned to",
            )),
            ErrorImpl::MissingReturnValue { expected, .. } => {
                ErrorTip::Suggestion(format!("return a value of type `{}`", expected))
            }
            ErrorImpl::FunctionUsedAsValue { name } => {
                ErrorTip::Suggestion(format!("did you mean to call `{}(...)`?", name))
            }
            ErrorImpl::Redefinition { name, .. } => {
                ErrorTip::Suggestion(format!("remove the second declaration of `{}`", name))
            }
            ErrorImpl::ArityMismatch {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.internal_error),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("illegal character {token:?}")]
    UnrecognisedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("malformed real number {literal:?}")]
    MalformedFloat { literal: String },
    #[error("malformed character literal {literal}")]
    MalformedChar { literal: String },
    #[error("unterminated string {literal}")]
    UnterminatedString { literal: String },
    #[error("string literal of {length} characters exceeds the limit of {limit}")]
    StringTooLong { length: usize, limit: usize },
    #[error("identifier of {length} characters exceeds the limit of {limit}")]
    IdentifierTooLong { length: usize, limit: usize },

    // Syntactic
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("unexpected end of file, expected close expression or statement")]
    UnexpectedEof,
    #[error("missing expression near {token:?}")]
    MissingExpression { token: String },
    #[error("invalid statement: {message}")]
    InvalidStatement { message: String },
    #[error("invalid array access syntax near {token:?}")]
    InvalidArraySyntax { token: String },
    #[error("invalid increment/decrement usage near {token:?}")]
    InvalidIncDec { token: String },
    #[error("unsupported operator {operator:?}")]
    UnsupportedOperator { operator: String },
    #[error("invalid assignment, left side is not a location")]
    InvalidAssignment,
    #[error("malformed literal {literal}")]
    MalformedLiteral { literal: String },

    // Semantic
    #[error("{name:?} is not declared")]
    UndeclaredName { name: String },
    #[error("{what} {name:?} is already defined with a different type")]
    RedefinitionConflict { what: String, name: String },
    #[error("{what} {name:?} is already defined")]
    Redefinition { what: String, name: String },
    #[error("{context}: expected {expected}, received {received}")]
    TypeMismatch {
        context: String,
        expected: String,
        received: String,
    },
    #[error("unsupported operand types for {operator}: {left} {operator} {right}")]
    BinaryOperatorMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("unsupported operand type for {operator}: {operator}{operand}")]
    UnaryOperatorMismatch { operator: String, operand: String },
    #[error("cannot assign to immutable location {name:?}")]
    ImmutableAssignment { name: String },
    #[error("condition of {statement} must be boolean, received {received}")]
    NonBooleanCondition { statement: String, received: String },
    #[error("function {name:?} is not defined")]
    UndefinedFunction { name: String },
    #[error("{name:?} is not a function")]
    NotCallable { name: String },
    #[error("function {name:?} expects {expected} arguments, received {received}")]
    ArityMismatch {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("function {name:?} used as a value without being called")]
    FunctionUsedAsValue { name: String },
    #[error("{what} {name:?} cannot have type void")]
    VoidDeclaration { what: String, name: String },
    #[error("size of array {name:?} {problem}")]
    InvalidArraySize { name: String, problem: String },
    #[error("array {name:?} has size {expected} but {received} initial values")]
    ArrayInitializerLength {
        name: String,
        expected: i64,
        received: usize,
    },
    #[error("array index must be integer, received {received}")]
    NonIntegerIndex { received: String },
    #[error("index {index} out of bounds for {name:?} of size {size}")]
    IndexOutOfBounds { name: String, index: i64, size: i64 },
    #[error("{name:?} is not an array")]
    NotAnArray { name: String },
    #[error("break statement outside of a loop")]
    BreakOutsideLoop,
    #[error("continue statement outside of a loop")]
    ContinueOutsideLoop,
    #[error("function {function:?} must return a value of type {expected}")]
    MissingReturnValue { function: String, expected: String },
    #[error("cannot print a value of type {received}")]
    InvalidPrintArgument { received: String },
    #[error("{operator} {problem}")]
    InvalidIncrement { operator: String, problem: String },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. } => ErrorKind::IllegalCharacter,
            ErrorImpl::NumberParseError { .. } => ErrorKind::MalformedNumber,
            ErrorImpl::MalformedFloat { .. } => ErrorKind::MalformedFloat,
            ErrorImpl::MalformedChar { .. } => ErrorKind::MalformedChar,
            ErrorImpl::UnterminatedString { .. } => ErrorKind::UnterminatedString,
            ErrorImpl::StringTooLong { .. } => ErrorKind::MalformedString,
            ErrorImpl::IdentifierTooLong { .. } => ErrorKind::InvalidIdentifier,
            ErrorImpl::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ErrorImpl::UnexpectedTokenDetailed { .. } => ErrorKind::UnexpectedToken,
            ErrorImpl::UnexpectedEof => ErrorKind::UnexpectedEof,
            ErrorImpl::MissingExpression { .. } => ErrorKind::MissingExpression,
            ErrorImpl::InvalidStatement { .. } => ErrorKind::InvalidStatement,
            ErrorImpl::InvalidArraySyntax { .. } => ErrorKind::InvalidArraySyntax,
            ErrorImpl::InvalidIncDec { .. } => ErrorKind::InvalidIncDec,
            ErrorImpl::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            ErrorImpl::InvalidAssignment => ErrorKind::InvalidAssignment,
            ErrorImpl::MalformedLiteral { .. } => ErrorKind::MalformedLiteral,
            ErrorImpl::UndeclaredName { .. } => ErrorKind::UndeclaredName,
            ErrorImpl::RedefinitionConflict { .. } => ErrorKind::RedefinitionConflict,
            ErrorImpl::Redefinition { .. } => ErrorKind::Redefinition,
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::BinaryOperatorMismatch { .. }
            | ErrorImpl::UnaryOperatorMismatch { .. } => ErrorKind::TypeMismatch,
            ErrorImpl::ImmutableAssignment { .. } => ErrorKind::ImmutableAssignment,
            ErrorImpl::NonBooleanCondition { .. } => ErrorKind::NonBooleanCondition,
            ErrorImpl::UndefinedFunction { .. } => ErrorKind::UndefinedFunction,
            ErrorImpl::NotCallable { .. } => ErrorKind::NotCallable,
            ErrorImpl::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            ErrorImpl::ReturnOutsideFunction => ErrorKind::ReturnOutsideFunction,
            ErrorImpl::FunctionUsedAsValue { .. } => ErrorKind::FunctionUsedAsValue,
            ErrorImpl::VoidDeclaration { .. } => ErrorKind::VoidDeclaration,
            ErrorImpl::InvalidArraySize { .. } => ErrorKind::InvalidArraySize,
            ErrorImpl::ArrayInitializerLength { .. } => ErrorKind::ArrayInitializerLength,
            ErrorImpl::NonIntegerIndex { .. } => ErrorKind::NonIntegerIndex,
            ErrorImpl::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            ErrorImpl::NotAnArray { .. } => ErrorKind::NotAnArray,
            ErrorImpl::BreakOutsideLoop => ErrorKind::BreakOutsideLoop,
            ErrorImpl::ContinueOutsideLoop => ErrorKind::ContinueOutsideLoop,
            ErrorImpl::MissingReturnValue { .. } => ErrorKind::MissingReturnValue,
            ErrorImpl::InvalidPrintArgument { .. } => ErrorKind::InvalidPrintArgument,
            ErrorImpl::InvalidIncrement { .. } => ErrorKind::InvalidIncrement,
        }
    }
}
