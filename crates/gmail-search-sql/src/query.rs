//! Query assembly: bind parameters, join/condition accumulation, and
//! table alias allocation.

use std::fmt;

/// A bind parameter for the generated SQL.
///
/// Sizes and byte counts stay integers so the database compares them
/// numerically; everything else binds as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

impl Param {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// A compiled query: one SQL string plus its bind parameters in
/// positional (`?`) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

/// Allocates table aliases that are unique across the whole statement.
///
/// The alias is the first letter of each underscore-separated word of
/// the table name followed by a counter: `message_addresses` becomes
/// `ma1`, then `ma2`, and so on. The root `messages` table is always
/// aliased `m0`; the counter starts at 1 so generated aliases never
/// collide with it.
#[derive(Debug)]
pub struct AliasCounter {
    next: u32,
}

/// Alias of the root `messages` table.
pub const ROOT_ALIAS: &str = "m0";

impl Default for AliasCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasCounter {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alias(&mut self, table_name: &str) -> String {
        let initials: String = table_name
            .split('_')
            .filter_map(|word| word.chars().next())
            .collect();
        let alias = format!("{initials}{}", self.next);
        self.next += 1;
        alias
    }
}

/// Accumulates the pieces of a (sub-)query during compilation.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    pub conditions: Vec<String>,
    pub joins: Vec<String>,
    pub params: Vec<Param>,
}

impl QueryBuilder {
    pub fn add_condition(&mut self, sql_fragment: impl Into<String>) {
        self.conditions.push(sql_fragment.into());
    }

    pub fn add_join(&mut self, join_sql: impl Into<String>) {
        self.joins.push(join_sql.into());
    }

    pub fn add_param(&mut self, value: Param) {
        self.params.push(value);
    }

    /// Merges a sub-query's joins and params into this one. Conditions
    /// are combined separately by the caller.
    pub fn absorb(&mut self, sub: Self) {
        self.joins.extend(sub.joins);
        self.params.extend(sub.params);
    }

    /// Collapses the accumulated conditions into a single fragment. An
    /// empty set (for example a lone `in:anywhere`) is the neutral
    /// `1 = 1`.
    pub fn combined_condition(&self) -> String {
        match self.conditions.as_slice() {
            [] => String::from("1 = 1"),
            [single] => single.clone(),
            many => format!("({})", many.join(" ")),
        }
    }

    pub fn into_compiled(self) -> CompiledQuery {
        let where_clause = if self.conditions.is_empty() {
            String::from("1 = 1")
        } else {
            self.conditions.join(" ")
        };

        let mut sql = format!("SELECT DISTINCT {ROOT_ALIAS}.id FROM messages AS {ROOT_ALIAS}");
        if !self.joins.is_empty() {
            sql.push(' ');
            sql.push_str(&self.joins.join(" "));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&where_clause);

        CompiledQuery {
            sql,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_counter_builds_initials() {
        let mut counter = AliasCounter::new();
        assert_eq!(counter.alias("message_addresses"), "ma1");
        assert_eq!(counter.alias("message_labels"), "ml2");
        assert_eq!(counter.alias("labels"), "l3");
        assert_eq!(counter.alias("attachments"), "a4");
    }

    #[test]
    fn test_empty_query_compiles_to_tautology() {
        let query = QueryBuilder::default().into_compiled();
        assert_eq!(query.sql, "SELECT DISTINCT m0.id FROM messages AS m0 WHERE 1 = 1");
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_joins_sit_between_from_and_where() {
        let mut builder = QueryBuilder::default();
        builder.add_join("INNER JOIN attachments AS a1 ON m0.id = a1.message_id");
        builder.add_condition("a1.filename = ?");
        builder.add_param(Param::text("report.pdf"));

        let query = builder.into_compiled();
        assert_eq!(
            query.sql,
            "SELECT DISTINCT m0.id FROM messages AS m0 \
             INNER JOIN attachments AS a1 ON m0.id = a1.message_id \
             WHERE a1.filename = ?"
        );
        assert_eq!(query.params, vec![Param::text("report.pdf")]);
    }

    #[test]
    fn test_combined_condition() {
        let mut builder = QueryBuilder::default();
        assert_eq!(builder.combined_condition(), "1 = 1");

        builder.add_condition("m0.is_read = 1");
        assert_eq!(builder.combined_condition(), "m0.is_read = 1");

        builder.add_condition("m0.is_starred = 1");
        assert_eq!(
            builder.combined_condition(),
            "(m0.is_read = 1 m0.is_starred = 1)"
        );
    }
}
