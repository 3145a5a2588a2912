//! Parser errors.

use thiserror::Error;

/// Errors that can occur while parsing a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The query contained no expressions (empty or whitespace-only
    /// input, or input that reduced to nothing after skipping).
    #[error("query cannot be empty")]
    EmptyQuery,
}
