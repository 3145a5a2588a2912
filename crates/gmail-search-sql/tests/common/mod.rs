#![allow(dead_code)]

use gmail_search_core::parse;
use gmail_search_sql::{compile, CompiledQuery, Dialect, Param, PostgresDialect, SqliteDialect};

pub fn compile_with<D: Dialect>(
    query: &str,
    dialect: &D,
    current_user_email: Option<&str>,
) -> CompiledQuery {
    let ast = parse(query).unwrap_or_else(|e| panic!("Failed to parse: {query}\nError: {e:?}"));
    compile(&ast, dialect, current_user_email)
        .unwrap_or_else(|e| panic!("Failed to compile: {query}\nError: {e:?}"))
}

pub fn compile_sqlite(query: &str) -> CompiledQuery {
    compile_with(query, &SqliteDialect, None)
}

pub fn compile_sqlite_as(query: &str, current_user_email: &str) -> CompiledQuery {
    compile_with(query, &SqliteDialect, Some(current_user_email))
}

pub fn compile_postgres(query: &str) -> CompiledQuery {
    compile_with(query, &PostgresDialect, None)
}

/// Text params from string literals, in bind order.
pub fn texts(values: &[&str]) -> Vec<Param> {
    values.iter().map(|v| Param::text(*v)).collect()
}
