//! Compilation errors.

use thiserror::Error;

/// Errors raised while compiling an AST to SQL.
///
/// The flag-like operators (`has:`, `in:`, `is:`) accept a closed set of
/// values; anything else has no column to compare against and is
/// rejected rather than silently matching nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown has: value: {0}")]
    UnknownHasValue(String),

    #[error("unknown in: value: {0}")]
    UnknownInValue(String),

    #[error("unknown is: value: {0}")]
    UnknownIsValue(String),
}
