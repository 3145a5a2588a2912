//! Token types for the search-query lexer.

/// Logical connective keywords.
///
/// These are recognized only as exact, case-sensitive matches (`OR`, `AND`,
/// `AROUND`), matching Gmail: a lowercase `or` is an ordinary search word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Or,
    And,
    Around,
}

impl Keyword {
    /// Attempts to parse a keyword from a bareword (case-sensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OR" => Some(Self::Or),
            "AND" => Some(Self::And),
            "AROUND" => Some(Self::Around),
            _ => None,
        }
    }

    /// Returns the keyword as written in a query.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Around => "AROUND",
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// : (operator separator)
    Colon,
    /// Leading - (negation)
    Minus,
    /// Leading + (require modifier, a parse-time no-op)
    Plus,

    /// Logical connective (`OR`, `AND`, `AROUND`)
    Keyword(Keyword),

    // Scalars, classified from barewords
    /// Plain search word
    Word(String),
    /// Bareword containing `@` (e.g. amy@example.com, or a bare `@domain`)
    Email(String),
    /// All-digit bareword that fits an i64
    Number(i64),
    /// `YYYY/MM/DD` or `MM/DD/YYYY`
    Date(String),
    /// `<digits><d|m|y>` (e.g. `7d`, `1y`)
    RelativeTime(String),
    /// `"…"` with escapes already resolved
    QuotedString(String),

    /// End of input
    Eof,
}

/// A token with its byte position in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Byte offset of the start of the token.
    pub position: usize,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
