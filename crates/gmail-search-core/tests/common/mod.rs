#![allow(dead_code)]

use gmail_search_core::{Node, OperatorKind, OperatorValue, WordValue};

pub fn parse(query: &str) -> Node {
    gmail_search_core::parse(query)
        .unwrap_or_else(|e| panic!("Failed to parse: {query}\nError: {e:?}"))
}

pub fn op(kind: OperatorKind, value: &str) -> Node {
    Node::operator(kind, OperatorValue::Text(String::from(value)))
}

pub fn op_expr(kind: OperatorKind, value: Node) -> Node {
    Node::operator(kind, OperatorValue::Expr(Box::new(value)))
}

pub fn word(value: &str) -> Node {
    Node::loose_word(value)
}

pub fn number(value: i64) -> Node {
    Node::LooseWord(WordValue::Number(value))
}

pub fn exact(value: &str) -> Node {
    Node::exact_word(value)
}

pub fn not(child: Node) -> Node {
    Node::Not(Box::new(child))
}
