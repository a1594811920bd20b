use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::{
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str);

/// Longest identifier or string body the language allows.
pub const MAX_LENGTH: usize = 255;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(pattern).expect("lexer patterns are valid regular expressions"),
            handler,
        }
    }
}

lazy_static! {
    // Every pattern is anchored; the first one that matches wins, so longer
    // and malformed forms come before the shapes they extend.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("^\n", newline_handler),
        RegexPattern::new("^[ \t\r\x0C]+", skip_handler),
        RegexPattern::new("^//[^\n]*", skip_handler),
        RegexPattern::new("^/\\*(?s:.)*?\\*/", skip_handler),
        RegexPattern::new("^([0-9]+\\.[0-9]*|\\.[0-9]+)\\.[0-9.]*", malformed_float_handler),
        RegexPattern::new("^([0-9]+\\.[0-9]*|\\.[0-9]+|[0-9]+)([eE][+-]?[0-9]*)?", number_handler),
        RegexPattern::new("^'(\\\\x[0-9a-fA-F]{2}|\\\\[^\n]|[^'\\\\\n])'", char_handler),
        RegexPattern::new("^'([^'\\\\\n]|\\\\[^\n])*'?", malformed_char_handler),
        RegexPattern::new("^\"(\\\\[^\n]|[^\"\\\\\n])*\"", string_handler),
        RegexPattern::new("^\"(\\\\[^\n]|[^\"\\\\\n])*", unterminated_string_handler),
        RegexPattern::new("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new("^\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        RegexPattern::new("^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        RegexPattern::new("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        RegexPattern::new("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        RegexPattern::new("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        RegexPattern::new("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        RegexPattern::new("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        RegexPattern::new("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        RegexPattern::new("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        RegexPattern::new("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        RegexPattern::new("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        RegexPattern::new("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        RegexPattern::new("^&", MK_DEFAULT_HANDLER!(TokenKind::BitAnd, "&")),
        RegexPattern::new("^\\|", MK_DEFAULT_HANDLER!(TokenKind::BitOr, "|")),
        RegexPattern::new("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        RegexPattern::new("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        RegexPattern::new("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        RegexPattern::new("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        RegexPattern::new("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        RegexPattern::new("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        RegexPattern::new("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        RegexPattern::new("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        RegexPattern::new("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        RegexPattern::new("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        RegexPattern::new("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        RegexPattern::new("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        RegexPattern::new("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        RegexPattern::new("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        RegexPattern::new("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        RegexPattern::new("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    diagnostics: Diagnostics,
}

impl Lexer {
    pub fn new(source: String) -> Lexer {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        trace!("token {}", token);
        self.tokens.push(token);
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Records a lexical error and skips the offending text.
    fn reject(&mut self, error: ErrorImpl, matched: &str) {
        let line = self.line;
        self.diagnostics.report(error, line);
        self.advance_n(matched.len());
        self.line += matched.matches('\n').count() as u32;
    }
}

fn newline_handler(lexer: &mut Lexer, matched: &str) {
    lexer.line += 1;
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: &str) {
    lexer.line += matched.matches('\n').count() as u32;
    lexer.advance_n(matched.len());
}

fn number_handler(lexer: &mut Lexer, matched: &str) {
    let line = lexer.line;
    let is_float = matched.contains(['.', 'e', 'E']);

    if !is_float {
        if matched.parse::<i64>().is_err() {
            lexer.reject(ErrorImpl::NumberParseError { token: matched.to_string() }, matched);
            return;
        }

        lexer.push(MK_TOKEN!(TokenKind::Integer, matched.to_string(), line));
        lexer.advance_n(matched.len());
        return;
    }

    // An exponent marker with no digits after it, as in `1e` or `2.5e+`.
    if matched.ends_with(['e', 'E', '+', '-']) || matched.parse::<f64>().is_err() {
        lexer.reject(ErrorImpl::MalformedFloat { literal: matched.to_string() }, matched);
        return;
    }

    lexer.push(MK_TOKEN!(TokenKind::Float, matched.to_string(), line));
    lexer.advance_n(matched.len());
}

fn malformed_float_handler(lexer: &mut Lexer, matched: &str) {
    lexer.reject(ErrorImpl::MalformedFloat { literal: matched.to_string() }, matched);
}

fn is_printable_ascii(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

fn char_handler(lexer: &mut Lexer, matched: &str) {
    let line = lexer.line;
    let body = &matched[1..matched.len() - 1];
    let value = decode_escapes(body);

    // Plain characters and `\xHH` escapes are limited to printable ASCII
    let printable = match body.strip_prefix('\\') {
        Some(escape) if escape.starts_with('x') => value.chars().all(is_printable_ascii),
        Some(_) => true,
        None => body.chars().all(is_printable_ascii),
    };
    if !printable {
        lexer.reject(ErrorImpl::MalformedChar { literal: matched.to_string() }, matched);
        return;
    }

    lexer.push(MK_TOKEN!(TokenKind::Char, value, line));
    lexer.advance_n(matched.len());
}

fn malformed_char_handler(lexer: &mut Lexer, matched: &str) {
    lexer.reject(ErrorImpl::MalformedChar { literal: matched.to_string() }, matched);
}

fn string_handler(lexer: &mut Lexer, matched: &str) {
    let line = lexer.line;
    let body = &matched[1..matched.len() - 1];

    if body.chars().count() > MAX_LENGTH {
        let error = ErrorImpl::StringTooLong {
            length: body.chars().count(),
            limit: MAX_LENGTH,
        };
        lexer.reject(error, matched);
        return;
    }

    let value = decode_escapes(body);

    lexer.push(MK_TOKEN!(TokenKind::String, value, line));
    lexer.advance_n(matched.len());
}

fn unterminated_string_handler(lexer: &mut Lexer, matched: &str) {
    lexer.reject(ErrorImpl::UnterminatedString { literal: matched.to_string() }, matched);
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) {
    let line = lexer.line;

    if let Some(kind) = RESERVED_LOOKUP.get(matched) {
        lexer.push(MK_TOKEN!(*kind, matched.to_string(), line));
    } else if matched.len() > MAX_LENGTH {
        let error = ErrorImpl::IdentifierTooLong {
            length: matched.len(),
            limit: MAX_LENGTH,
        };
        lexer.reject(error, matched);
        return;
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, matched.to_string(), line));
    }

    lexer.advance_n(matched.len());
}

/// Decodes the backslash escapes of a char or string literal body.
pub fn decode_escapes(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(next_ch) = chars.next() else {
            // Lone trailing backslash
            result.push(ch);
            break;
        };

        match next_ch {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            'a' => result.push('\x07'),
            'b' => result.push('\x08'),
            'e' => result.push('\x1B'),
            'f' => result.push('\x0C'),
            'v' => result.push('\x0B'),
            '0' => result.push('\0'),
            'x' => {
                let mut hex = String::new();

                while hex.len() < 2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => result.push('x'),
                }
            }
            // \\ \' \" and anything unknown stand for themselves
            other => result.push(other),
        }
    }

    result
}

/// Converts source text into tokens, ending with a single `EOF` token.
///
/// Lexical errors never stop the scan: they are recorded in the returned
/// diagnostics and scanning resumes right after the offending text.
pub fn tokenize(source: String, file: Option<String>) -> (Vec<Token>, Diagnostics) {
    let file_name = file.unwrap_or_else(|| String::from("shell"));
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|m| (pattern.handler, m.as_str().to_owned()))
        });

        match found {
            Some((handler, matched)) if !matched.is_empty() => handler(&mut lex, &matched),
            _ => {
                let Some(ch) = lex.remainder().chars().next() else {
                    break;
                };
                let line = lex.line;

                lex.diagnostics
                    .report(ErrorImpl::UnrecognisedToken { token: ch.to_string() }, line);
                lex.advance_n(ch.len_utf8());
            }
        }
    }

    let line = lex.line;
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), line));

    debug!(
        "tokenized {}: {} tokens, {} lexical errors",
        file_name,
        lex.tokens.len(),
        lex.diagnostics.len()
    );

    (lex.tokens, lex.diagnostics)
}
