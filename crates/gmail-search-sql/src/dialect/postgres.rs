//! PostgreSQL dialect.

use super::{DateBound, Dialect};

/// PostgreSQL: relative dates subtract a `?::interval` cast from
/// `NOW()`, so the interval parameter is unsigned (`7 days`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn relative_date_condition(&self, bound: DateBound) -> &'static str {
        match bound {
            DateBound::Older => "m0.internal_date < (NOW() - ?::interval)",
            DateBound::Newer => "m0.internal_date > (NOW() - ?::interval)",
        }
    }

    fn relative_interval(&self, amount: &str, unit: &str) -> String {
        format!("{amount} {unit}")
    }
}
