use std::fmt;

/// Source location for diagnostics, 1-based in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePosition {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LinePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Opening parenthesis `(`.
    LeftParen,
    /// Closing parenthesis `)`.
    RightParen,
    /// Opening brace `{`.
    LeftBrace,
    /// Closing brace `}`.
    RightBrace,
    /// Comma `,`.
    Comma,
    /// Dot `.`.
    Dot,
    /// Minus `-`.
    Minus,
    /// Plus `+`.
    Plus,
    /// Star `*`.
    Star,
    /// Slash `/`.
    Slash,
    /// Colon `:`.
    Colon,
    /// Semicolon `;`.
    Semicolon,
    /// Bang `!`.
    Bang,
    /// Inequality operator `!=`.
    BangEqual,
    /// Assignment `=`.
    Equal,
    /// Equality operator `==`.
    EqualEqual,
    /// Less-than `<`.
    Less,
    /// Less-or-equal `<=`.
    LessEqual,
    /// Greater-than `>`.
    Greater,
    /// Greater-or-equal `>=`.
    GreaterEqual,
    /// Double-quoted string literal.
    String,
    /// Decimal number literal.
    Number,
    /// Identifier (includes stage names such as `vertex`).
    Identifier,
    /// Ordinary language keyword (`uniform`, `varying`, ...).
    Keyword,
    /// Compile-time directive keyword (`#shader_type`, `#include`).
    CompileKeyword,
    /// Line comment (`// ...`), kept in the stream.
    Comment,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBrace => "'{'",
            Self::RightBrace => "'}'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Minus => "'-'",
            Self::Plus => "'+'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Bang => "'!'",
            Self::BangEqual => "'!='",
            Self::Equal => "'='",
            Self::EqualEqual => "'=='",
            Self::Less => "'<'",
            Self::LessEqual => "'<='",
            Self::Greater => "'>'",
            Self::GreaterEqual => "'>='",
            Self::String => "string literal",
            Self::Number => "number literal",
            Self::Identifier => "identifier",
            Self::Keyword => "keyword",
            Self::CompileKeyword => "compile-time keyword",
            Self::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Decoded payload carried by literal-bearing tokens.
///
/// Punctuation and operator tokens carry none; strings, identifiers,
/// keywords, and comment bodies decode to text, number literals to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(f64),
}

/// A single classified, positioned unit of source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: LinePosition,
    /// The exact source substring this token consumed.
    pub lexeme: String,
    pub literal: Option<Literal>,
}

impl Token {
    /// Borrow the decoded text literal, if this token carries one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Text(text)) => Some(text),
            Some(Literal::Number(_)) | None => None,
        }
    }
}
