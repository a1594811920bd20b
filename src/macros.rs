//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler for fixed-text tokens

/// Creates a Token instance.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), 1);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $line:expr) => {
        Token {
            kind: $kind,
            value: $value,
            line: $line,
        }
    };
}

/// Creates a handler for a pattern that always matches the same text.
///
/// The handler pushes a token of the given kind on the current line and
/// advances the lexer past the literal.
///
/// ```ignore
/// RegexPattern::new("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _matched: &str| {
            let line = lexer.line();
            lexer.push(MK_TOKEN!($kind, String::from($value), line));
            lexer.advance_n($value.len());
        }
    };
}
