//! SQLite dialect.

use super::{DateBound, Dialect};

/// SQLite: relative dates go through `datetime('now', ?)` with a signed
/// modifier string such as `-7 days`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn relative_date_condition(&self, bound: DateBound) -> &'static str {
        match bound {
            DateBound::Older => "m0.internal_date < datetime('now', ?)",
            DateBound::Newer => "m0.internal_date > datetime('now', ?)",
        }
    }

    fn relative_interval(&self, amount: &str, unit: &str) -> String {
        format!("-{amount} {unit}")
    }
}
