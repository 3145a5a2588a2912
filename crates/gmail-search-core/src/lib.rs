//! Parsing for Gmail-style search queries.
//!
//! This crate turns a search string such as
//! `from:amy@example.com subject:"urgent" -is:read` into a typed AST:
//!
//! ```
//! use gmail_search_core::{parse, Node, OperatorKind};
//!
//! let ast = parse("from:amy@example.com dinner")?;
//! match ast {
//!     Node::And(operands) => assert_eq!(operands.len(), 2),
//!     other => panic!("unexpected node: {other}"),
//! }
//! # Ok::<(), gmail_search_core::ParseError>(())
//! ```
//!
//! Parsing is lenient the way Gmail is lenient: unbalanced delimiters,
//! dangling keywords, and unknown words degrade to plain search terms
//! instead of failing. The only parse error is an empty query.
//!
//! SQL compilation of the AST lives in the companion `gmail-search-sql`
//! crate.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Node, OperatorKind, OperatorValue, WordValue};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};

/// Tokenizes and parses a query in one step.
///
/// # Errors
///
/// Returns [`ParseError::EmptyQuery`] if the query contains no
/// expressions.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    let tokens = Lexer::new(input).tokenize();
    Parser::new(tokens).parse()
}
