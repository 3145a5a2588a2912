//! Search-query lexer.
//!
//! A hand-written scanner that turns a raw query string into a stream of
//! typed tokens. It never fails: malformed input (unterminated quotes,
//! stray delimiters) degrades to ordinary tokens instead of erroring.

mod token;
mod tokenizer;

pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;

pub(crate) use tokenizer::classify;
