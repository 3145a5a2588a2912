//! SQL dialects.
//!
//! The generated SQL is identical across databases except for relative
//! date arithmetic (`older_than:`/`newer_than:`), which has no portable
//! spelling. Each dialect supplies the comparison fragment and the
//! matching interval parameter.

mod postgres;
mod sqlite;

pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// Which side of "now" a relative date comparison selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// `older_than:` - messages before the cutoff.
    Older,
    /// `newer_than:` - messages after the cutoff.
    Newer,
}

/// Database-specific SQL generation.
pub trait Dialect {
    /// Dialect name for diagnostics.
    fn name(&self) -> &'static str;

    /// Condition fragment comparing the message date against now offset
    /// by one bound interval parameter.
    fn relative_date_condition(&self, bound: DateBound) -> &'static str;

    /// The interval parameter bound by [`Self::relative_date_condition`],
    /// for an amount and a unit word (`days`, `months`, `years`).
    fn relative_interval(&self, amount: &str, unit: &str) -> String;
}
