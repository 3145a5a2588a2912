//! Recursive-descent parser for tokenized search queries.
//!
//! Precedence, loosest to tightest: `OR`, implicit/explicit `AND`,
//! `AROUND`, unary `-`/`+`, primaries. Malformed fragments (stray
//! delimiters, dangling operators) are skipped rather than rejected;
//! the only hard error is an input with no expressions at all.

mod error;
#[allow(clippy::module_inception)]
mod parser;

pub use error::ParseError;
pub use parser::Parser;
