use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("array", TokenKind::Array);
        map.insert("auto", TokenKind::Auto);
        map.insert("boolean", TokenKind::BooleanType);
        map.insert("break", TokenKind::Break);
        map.insert("char", TokenKind::CharType);
        map.insert("continue", TokenKind::Continue);
        map.insert("do", TokenKind::Do);
        map.insert("else", TokenKind::Else);
        map.insert("false", TokenKind::False);
        map.insert("float", TokenKind::FloatType);
        map.insert("for", TokenKind::For);
        map.insert("function", TokenKind::Function);
        map.insert("if", TokenKind::If);
        map.insert("integer", TokenKind::IntegerType);
        map.insert("print", TokenKind::Print);
        map.insert("return", TokenKind::Return);
        map.insert("string", TokenKind::StringType);
        map.insert("true", TokenKind::True);
        map.insert("void", TokenKind::Void);
        map.insert("while", TokenKind::While);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,

    // Literals
    Integer,
    Float,
    Char,
    String,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    // Bitwise, lexed only so the parser can reject them by name
    BitAnd,
    BitOr,
    Tilde,

    Semicolon,
    Colon,
    Comma,

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,

    // Reserved
    Array,
    Auto,
    BooleanType,
    Break,
    CharType,
    Continue,
    Do,
    Else,
    False,
    FloatType,
    For,
    Function,
    If,
    IntegerType,
    Print,
    Return,
    StringType,
    True,
    Void,
    While,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}) at line {}", self.kind, self.value, self.line)
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Whether this token names one of the built-in simple types.
    pub fn is_simple_type(&self) -> bool {
        self.is_one_of_many(&[
            TokenKind::IntegerType,
            TokenKind::FloatType,
            TokenKind::BooleanType,
            TokenKind::CharType,
            TokenKind::StringType,
            TokenKind::Void,
        ])
    }
}
