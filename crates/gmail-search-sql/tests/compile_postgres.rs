//! PostgreSQL compilation tests. Only relative date handling differs
//! from SQLite; everything else must compile identically.

mod common;
use common::*;

#[test]
fn older_than_uses_interval_cast() {
    let query = compile_postgres("older_than:1y");

    assert!(query.sql.contains("m0.internal_date < (NOW() - ?::interval)"));
    assert_eq!(query.params, texts(&["1 years"]));
}

#[test]
fn newer_than_uses_interval_cast() {
    let query = compile_postgres("newer_than:2d");

    assert!(query.sql.contains("m0.internal_date > (NOW() - ?::interval)"));
    assert_eq!(query.params, texts(&["2 days"]));
}

#[test]
fn interval_units() {
    assert_eq!(compile_postgres("older_than:7d").params, texts(&["7 days"]));
    assert_eq!(compile_postgres("newer_than:3m").params, texts(&["3 months"]));
    assert_eq!(compile_postgres("older_than:2y").params, texts(&["2 years"]));
}

#[test]
fn unrecognized_interval_passes_through() {
    let query = compile_postgres("older_than:fortnight");

    assert_eq!(query.params, texts(&["fortnight"]));
}

#[test]
fn from_operator_matches_sqlite() {
    let postgres = compile_postgres("from:alice@example.com");
    let sqlite = compile_sqlite("from:alice@example.com");

    assert_eq!(postgres, sqlite);
}

#[test]
fn non_date_queries_are_dialect_independent() {
    for query in [
        "from:amy subject:meeting has:attachment",
        "label:work -is:read",
        "{from:a@ from:b@} \"exact phrase\"",
        "filename:pdf larger:10M",
    ] {
        assert_eq!(compile_postgres(query), compile_sqlite(query), "query: {query}");
    }
}

#[test]
fn combined_relative_date_and_address() {
    let query = compile_postgres("from:alice@example.com newer_than:7d");

    assert!(query.sql.contains("ma1.email_address = ?"));
    assert!(query.sql.contains("m0.internal_date > (NOW() - ?::interval)"));
    assert_eq!(
        query.params,
        texts(&["from", "cc", "bcc", "alice@example.com", "7 days"])
    );
}
