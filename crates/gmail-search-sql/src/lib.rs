//! Compiles Gmail-style search queries to parameterized SQL.
//!
//! Takes the AST produced by `gmail-search-core` and emits one SELECT
//! over a `messages` table (plus joins for addresses, labels, and
//! attachments), with `?` placeholders and the bind parameters in
//! order:
//!
//! ```
//! use gmail_search_core::parse;
//! use gmail_search_sql::{compile, Param, SqliteDialect};
//!
//! let ast = parse("from:amy@example.com is:unread")?;
//! let query = compile(&ast, &SqliteDialect, None)?;
//!
//! assert!(query.sql.starts_with("SELECT DISTINCT m0.id FROM messages AS m0"));
//! assert_eq!(query.params.last(), Some(&Param::text("amy@example.com")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The same AST compiles against SQLite or PostgreSQL; the dialects
//! differ only in relative date arithmetic (see [`dialect`]).

pub mod dialect;

mod compiler;
mod error;
mod query;

pub use compiler::compile;
pub use dialect::{DateBound, Dialect, PostgresDialect, SqliteDialect};
pub use error::CompileError;
pub use query::{CompiledQuery, Param};
