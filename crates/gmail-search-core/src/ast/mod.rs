//! Abstract syntax tree for parsed search queries.
//!
//! The tree is a closed set of node shapes; consumers match exhaustively,
//! so adding a node variant is a compile-checked change everywhere.

mod node;

pub use node::{Node, OperatorKind, OperatorValue, WordValue};
