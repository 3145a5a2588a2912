//! Search-query tokenizer implementation.

use super::{Keyword, Token, TokenKind};

/// A lexer that tokenizes a Gmail-style search query.
///
/// Tokenizing never fails: every input, including the empty string, yields
/// a token sequence terminated by [`TokenKind::Eof`].
pub struct Lexer<'a> {
    /// The raw query string.
    input: &'a str,
    /// The current byte position.
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given query.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace between tokens.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a `"…"` string. A backslash makes the next character literal
    /// (`\"` → `"`, `\\` → `\`; any other escaped character keeps only the
    /// character, dropping the backslash). An unterminated quote consumes
    /// the rest of the input without erroring.
    fn scan_quoted_string(&mut self, start: usize) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();

        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    self.advance();
                    break;
                }
                '\\' => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Token::new(TokenKind::QuotedString(value), start)
    }

    /// Scans a bareword and classifies it.
    ///
    /// A bareword runs until whitespace, `(`, `)`, `{`, `}`, or `:`.
    /// Hyphens are ordinary word characters here (negation is decided at
    /// token boundaries in [`Self::tokenize`]), which is what keeps
    /// `from:mary-jane` a single value token. The same backslash escapes
    /// as in quoted strings apply.
    fn scan_bareword(&mut self, start: usize) -> Option<Token> {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => break,
                '(' | ')' | '{' | '}' | ':' => break,
                '\\' => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        if value.is_empty() {
            None
        } else {
            Some(Token::new(classify(value), start))
        }
    }

    /// Tokenizes the entire query and returns all tokens, ending with EOF.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.pos;

            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, self.pos));
                break;
            };

            let token = match c {
                '(' => {
                    self.advance();
                    Some(Token::new(TokenKind::LeftParen, start))
                }
                ')' => {
                    self.advance();
                    Some(Token::new(TokenKind::RightParen, start))
                }
                '{' => {
                    self.advance();
                    Some(Token::new(TokenKind::LeftBrace, start))
                }
                '}' => {
                    self.advance();
                    Some(Token::new(TokenKind::RightBrace, start))
                }
                ':' => {
                    self.advance();
                    Some(Token::new(TokenKind::Colon, start))
                }
                '+' => {
                    self.advance();
                    Some(Token::new(TokenKind::Plus, start))
                }
                // A hyphen starts negation only when directly followed by a
                // non-whitespace character; `- x` or a trailing `-` reads as
                // an ordinary word instead.
                '-' if self.peek_next().is_some_and(|n| !n.is_whitespace()) => {
                    self.advance();
                    Some(Token::new(TokenKind::Minus, start))
                }
                '"' => Some(self.scan_quoted_string(start)),
                _ => self.scan_bareword(start),
            };

            if let Some(token) = token {
                tokens.push(token);
            }
        }

        tracing::trace!(count = tokens.len(), "tokenized query");
        tokens
    }
}

/// Classifies a finished bareword; first match wins.
pub fn classify(value: String) -> TokenKind {
    if let Some(keyword) = Keyword::from_str(&value) {
        return TokenKind::Keyword(keyword);
    }
    if value.contains('@') {
        return TokenKind::Email(value);
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        // Overlong digit runs degrade to plain words.
        if let Ok(n) = value.parse::<i64>() {
            return TokenKind::Number(n);
        }
        return TokenKind::Word(value);
    }
    if is_date(&value) {
        return TokenKind::Date(value);
    }
    if is_relative_time(&value) {
        return TokenKind::RelativeTime(value);
    }
    TokenKind::Word(value)
}

/// `YYYY/MM/DD` or `MM/DD/YYYY`.
fn is_date(value: &str) -> bool {
    fn digits(s: &str, n: usize) -> bool {
        s.len() == n && s.bytes().all(|b| b.is_ascii_digit())
    }

    let mut parts = value.splitn(3, '/');
    let (Some(a), Some(b), Some(c)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    (digits(a, 4) && digits(b, 2) && digits(c, 2))
        || (digits(a, 2) && digits(b, 2) && digits(c, 4))
}

/// `<digits><d|m|y>`, e.g. `7d`, `3m`, `1y`.
fn is_relative_time(value: &str) -> bool {
    let Some(rest) = value
        .strip_suffix('d')
        .or_else(|| value.strip_suffix('m'))
        .or_else(|| value.strip_suffix('y'))
    else {
        return false;
    };
    !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
}
