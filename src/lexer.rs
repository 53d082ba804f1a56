use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::token::{LinePosition, Literal, Token, TokenKind};

/// Ordinary language keywords recognized at scan time.
const KEYWORDS: &[&str] = &["uniform", "varying", "const", "for", "if", "else"];

/// Compile-time directive keywords allowed after a `#`.
const COMPILE_KEYWORDS: &[&str] = &["shader_type", "include"];

/// Cooperative cancellation flag, observed once per source line.
///
/// Cloning yields a handle to the same flag, so a producer can cancel a
/// scan running elsewhere. A cancelled scan fails with
/// [`ScanErrorKind::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Classifies a scanner error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// String literal without a closing quote on the same line.
    UnterminatedString,
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
    /// `#` not followed by a scannable directive name.
    MalformedCompileDirective,
    /// `#` followed by something other than `shader_type`/`include`.
    UnknownCompileKeyword(String),
    /// Digit run that does not decode to a number.
    MalformedNumber(String),
    /// The cancellation token was triggered.
    Cancelled,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character '{ch}'")
            }
            Self::MalformedCompileDirective => {
                write!(f, "malformed compile-time directive, expected a keyword after '#'")
            }
            Self::UnknownCompileKeyword(name) => {
                write!(f, "unrecognized compile-time keyword '{name}'")
            }
            Self::MalformedNumber(text) => {
                write!(f, "malformed number literal '{text}'")
            }
            Self::Cancelled => {
                write!(f, "scanning was cancelled")
            }
        }
    }
}

/// Error produced during scanning.
///
/// `lexeme` holds the residual line text starting at the offending column,
/// suitable for direct display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {position} in '{lexeme}'")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub position: LinePosition,
    pub lexeme: String,
}

/// Tokenize a complete shader source string.
///
/// # Errors
///
/// Returns `ScanError` on unterminated strings, unknown characters,
/// or malformed compile-time directives.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ScanError> {
    tokenize_lines(input.lines(), &CancelToken::new())
}

/// Tokenize a pull-based supplier of source lines.
///
/// The supplier may be backed by anything line-oriented (a file reader,
/// a decompression stream, an in-memory split); this function never does
/// I/O itself. `cancel` is checked once per line.
///
/// # Errors
///
/// Returns `ScanError` on any lexical error or on cancellation.
pub fn tokenize_lines<I, S>(lines: I, cancel: &CancelToken) -> Result<Vec<Token>, ScanError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let number = index + 1;

        if cancel.is_cancelled() {
            return Err(ScanError {
                kind: ScanErrorKind::Cancelled,
                position: LinePosition { line: number, column: 1 },
                lexeme: String::new(),
            });
        }

        scan_line(number, line.as_ref(), &mut tokens)?;
    }

    Ok(tokens)
}

/// Scan one line left to right, producing at most one token per window.
fn scan_line(line: usize, text: &str, tokens: &mut Vec<Token>) -> Result<(), ScanError> {
    let offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    let mut column = 0;

    while column < offsets.len() {
        let position = LinePosition { line, column: column + 1 };
        let rest = &text[offsets[column]..];

        // whitespace yields no token and advances a single column;
        // everything else skips past all characters it consumed
        column += scan_token(position, rest)?.map_or(1, |token| {
            let consumed = token.lexeme.chars().count().max(1);
            tokens.push(token);
            consumed
        });
    }

    Ok(())
}

/// Scan a single token from the window starting at `position`.
///
/// `rest` is the residual line text; `Ok(None)` means whitespace.
fn scan_token(position: LinePosition, rest: &str) -> Result<Option<Token>, ScanError> {
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return Ok(None);
    };
    let next = chars.next();

    let token = match first {
        '(' => single(TokenKind::LeftParen, position, first),
        ')' => single(TokenKind::RightParen, position, first),
        '{' => single(TokenKind::LeftBrace, position, first),
        '}' => single(TokenKind::RightBrace, position, first),
        ',' => single(TokenKind::Comma, position, first),
        '.' => single(TokenKind::Dot, position, first),
        '-' => single(TokenKind::Minus, position, first),
        '+' => single(TokenKind::Plus, position, first),
        '*' => single(TokenKind::Star, position, first),
        ':' => single(TokenKind::Colon, position, first),
        ';' => single(TokenKind::Semicolon, position, first),

        '!' => operator(position, first, next, TokenKind::Bang, TokenKind::BangEqual),
        '=' => operator(position, first, next, TokenKind::Equal, TokenKind::EqualEqual),
        '<' => operator(position, first, next, TokenKind::Less, TokenKind::LessEqual),
        '>' => operator(position, first, next, TokenKind::Greater, TokenKind::GreaterEqual),

        '/' if next == Some('/') => scan_comment(position, rest),
        '/' => single(TokenKind::Slash, position, first),

        '"' => scan_string(position, rest)?,

        '#' if next != Some('#') => scan_compile_keyword(position, rest)?,

        c if c.is_whitespace() => return Ok(None),
        c if c.is_ascii_digit() => scan_number(position, rest)?,
        c if c.is_alphabetic() || c == '_' => scan_identifier(position, rest),

        c => {
            return Err(ScanError {
                kind: ScanErrorKind::UnexpectedCharacter(c),
                position,
                lexeme: rest.to_string(),
            });
        }
    };

    Ok(Some(token))
}

fn single(kind: TokenKind, position: LinePosition, character: char) -> Token {
    Token {
        kind,
        position,
        lexeme: character.to_string(),
        literal: None,
    }
}

/// One- or two-character operator: take the long form when the second
/// character is `=`, otherwise fall back to the short form.
fn operator(
    position: LinePosition,
    first: char,
    next: Option<char>,
    short: TokenKind,
    long: TokenKind,
) -> Token {
    if next == Some('=') {
        Token {
            kind: long,
            position,
            lexeme: format!("{first}="),
            literal: None,
        }
    } else {
        single(short, position, first)
    }
}

/// Line comment: consumes the rest of the line; the decoded literal is
/// the trimmed comment body.
fn scan_comment(position: LinePosition, rest: &str) -> Token {
    let body = rest.strip_prefix("//").unwrap_or(rest).trim().to_string();

    Token {
        kind: TokenKind::Comment,
        position,
        lexeme: rest.to_string(),
        literal: Some(Literal::Text(body)),
    }
}

fn scan_string(position: LinePosition, rest: &str) -> Result<Token, ScanError> {
    let Some(length) = rest[1..].find('"') else {
        return Err(ScanError {
            kind: ScanErrorKind::UnterminatedString,
            position,
            lexeme: rest.to_string(),
        });
    };

    Ok(Token {
        kind: TokenKind::String,
        position,
        lexeme: rest[..length + 2].to_string(),
        literal: Some(Literal::Text(rest[1..=length].to_string())),
    })
}

/// Preprocessor directive: recursively scan the inner token after `#`
/// (depth of exactly one) and validate it against the compile keywords.
fn scan_compile_keyword(position: LinePosition, rest: &str) -> Result<Token, ScanError> {
    let inner_position = LinePosition {
        line: position.line,
        column: position.column + 1,
    };

    let Some(inner) = scan_token(inner_position, &rest[1..])? else {
        return Err(ScanError {
            kind: ScanErrorKind::MalformedCompileDirective,
            position,
            lexeme: rest.to_string(),
        });
    };

    let Some(Literal::Text(name)) = inner.literal else {
        return Err(ScanError {
            kind: ScanErrorKind::MalformedCompileDirective,
            position,
            lexeme: rest.to_string(),
        });
    };

    if !COMPILE_KEYWORDS.contains(&name.as_str()) {
        return Err(ScanError {
            kind: ScanErrorKind::UnknownCompileKeyword(name),
            position,
            lexeme: rest.to_string(),
        });
    }

    // the outer span covers '#' plus the inner token's span
    let mut lexeme = String::from("#");
    lexeme.push_str(&inner.lexeme);

    Ok(Token {
        kind: TokenKind::CompileKeyword,
        position,
        lexeme,
        literal: Some(Literal::Text(name)),
    })
}

/// Digit run with an optional fractional part.
fn scan_number(position: LinePosition, rest: &str) -> Result<Token, ScanError> {
    let bytes = rest.as_bytes();
    let mut end = 0;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' && bytes.get(end + 1).is_some_and(u8::is_ascii_digit)
    {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let lexeme = rest[..end].to_string();
    let value: f64 = lexeme.parse().map_err(|_| ScanError {
        kind: ScanErrorKind::MalformedNumber(lexeme.clone()),
        position,
        lexeme: rest.to_string(),
    })?;

    Ok(Token {
        kind: TokenKind::Number,
        position,
        lexeme,
        literal: Some(Literal::Number(value)),
    })
}

/// Letter/digit/underscore run, classified as keyword or identifier.
///
/// Stage names (`vertex` etc.) and compile keywords are deliberately not
/// distinguished here; the parser disambiguates them by text.
fn scan_identifier(position: LinePosition, rest: &str) -> Token {
    let end = rest
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(rest.len(), |(offset, _)| offset);

    let lexeme = rest[..end].to_string();
    let kind = if KEYWORDS.contains(&lexeme.as_str()) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    };

    Token {
        kind,
        position,
        lexeme: lexeme.clone(),
        literal: Some(Literal::Text(lexeme)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation() {
        let tokens = tokenize("(){},.-+*:;").expect("should tokenize");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Star,
                TokenKind::Colon,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn operator_lookahead() {
        let tokens = tokenize("! != = == < <= > >=").expect("should tokenize");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ]
        );
    }

    #[test]
    fn bang_equal_is_one_token() {
        let tokens = tokenize("a!=b").expect("should tokenize");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::BangEqual);
        assert_eq!(tokens[1].lexeme, "!=");
        assert_eq!(tokens[2].position.column, 4);
    }

    #[test]
    fn slash_alone_is_not_a_comment() {
        let tokens = tokenize("a / b").expect("should tokenize");
        assert_eq!(tokens[1].kind, TokenKind::Slash);
    }

    #[test]
    fn comment_consumes_rest_of_line() {
        let tokens = tokenize("vec2 // uv coordinates").expect("should tokenize");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].lexeme, "// uv coordinates");
        assert_eq!(tokens[1].text(), Some("uv coordinates"));
    }

    #[test]
    fn string_literal() {
        let tokens = tokenize(r#"#include "common.glsl""#).expect("should tokenize");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, r#""common.glsl""#);
        assert_eq!(tokens[1].text(), Some("common.glsl"));
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("uniform \"oops").expect_err("should fail");
        assert_eq!(err.kind, ScanErrorKind::UnterminatedString);
        assert_eq!(err.position, LinePosition { line: 1, column: 9 });
    }

    #[test]
    fn preprocessor_is_one_token() {
        let tokens = tokenize("#include").expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::CompileKeyword);
        assert_eq!(tokens[0].lexeme, "#include");
        assert_eq!(tokens[0].text(), Some("include"));
    }

    #[test]
    fn preprocessor_unknown_keyword() {
        let err = tokenize("#bogus").expect_err("should fail");
        assert_eq!(
            err.kind,
            ScanErrorKind::UnknownCompileKeyword("bogus".to_string())
        );
    }

    #[test]
    fn preprocessor_missing_name() {
        let err = tokenize("# shader_type").expect_err("should fail");
        assert_eq!(err.kind, ScanErrorKind::MalformedCompileDirective);
    }

    #[test]
    fn numbers() {
        let tokens = tokenize("42 3.14").expect("should tokenize");
        assert_eq!(tokens[0].literal, Some(Literal::Number(42.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(3.14)));
        assert_eq!(tokens[1].lexeme, "3.14");
    }

    #[test]
    fn number_dot_without_fraction_stays_separate() {
        let tokens = tokenize("1.x").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = tokenize("uniform vertex u_time").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        // stage names are plain identifiers at scan time
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].lexeme, "u_time");
    }

    #[test]
    fn position_tracking() {
        let tokens = tokenize("void vertex\nfloat").expect("should tokenize");
        assert_eq!(tokens[0].position, LinePosition { line: 1, column: 1 });
        assert_eq!(tokens[1].position, LinePosition { line: 1, column: 6 });
        assert_eq!(tokens[2].position, LinePosition { line: 2, column: 1 });
    }

    #[test]
    fn unexpected_character() {
        let err = tokenize("float $x").expect_err("should fail");
        assert_eq!(err.kind, ScanErrorKind::UnexpectedCharacter('$'));
        assert_eq!(err.position, LinePosition { line: 1, column: 7 });
    }

    #[test]
    fn cancellation_is_checked_per_line() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = tokenize_lines(["uniform float u_time"], &cancel).expect_err("should fail");
        assert_eq!(err.kind, ScanErrorKind::Cancelled);
    }
}
