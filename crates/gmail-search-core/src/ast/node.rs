//! AST node definitions.

use std::fmt;

/// The search operators the parser recognizes.
///
/// Recognition happens on the lowercased word before a `:`, so `FROM:amy`
/// and `from:amy` parse the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    From,
    To,
    Cc,
    Bcc,
    Subject,
    After,
    Before,
    Older,
    Newer,
    OlderThan,
    NewerThan,
    Label,
    Category,
    Has,
    List,
    Filename,
    In,
    Is,
    DeliveredTo,
    Size,
    Larger,
    Smaller,
    Rfc822MsgId,
}

impl OperatorKind {
    /// Looks up an operator by its (already lowercased) query name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            "cc" => Some(Self::Cc),
            "bcc" => Some(Self::Bcc),
            "subject" => Some(Self::Subject),
            "after" => Some(Self::After),
            "before" => Some(Self::Before),
            "older" => Some(Self::Older),
            "newer" => Some(Self::Newer),
            "older_than" => Some(Self::OlderThan),
            "newer_than" => Some(Self::NewerThan),
            "label" => Some(Self::Label),
            "category" => Some(Self::Category),
            "has" => Some(Self::Has),
            "list" => Some(Self::List),
            "filename" => Some(Self::Filename),
            "in" => Some(Self::In),
            "is" => Some(Self::Is),
            "deliveredto" => Some(Self::DeliveredTo),
            "size" => Some(Self::Size),
            "larger" => Some(Self::Larger),
            "smaller" => Some(Self::Smaller),
            "rfc822msgid" => Some(Self::Rfc822MsgId),
            _ => None,
        }
    }

    /// Returns the operator name as written in a query.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::From => "from",
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
            Self::Subject => "subject",
            Self::After => "after",
            Self::Before => "before",
            Self::Older => "older",
            Self::Newer => "newer",
            Self::OlderThan => "older_than",
            Self::NewerThan => "newer_than",
            Self::Label => "label",
            Self::Category => "category",
            Self::Has => "has",
            Self::List => "list",
            Self::Filename => "filename",
            Self::In => "in",
            Self::Is => "is",
            Self::DeliveredTo => "deliveredto",
            Self::Size => "size",
            Self::Larger => "larger",
            Self::Smaller => "smaller",
            Self::Rfc822MsgId => "rfc822msgid",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value attached to an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorValue {
    /// A plain textual value (`from:amy`, `after:2024/01/15`).
    Text(String),
    /// An all-digit value (`size:1000000`).
    Number(i64),
    /// A nested expression (`subject:(dinner movie)`, `from:{amy bob}`).
    Expr(Box<Node>),
}

impl fmt::Display for OperatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Expr(node) => write!(f, "{node}"),
        }
    }
}

/// The value of a loose (non-quoted) search word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for WordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An `operator:value` pair.
    Operator {
        kind: OperatorKind,
        value: OperatorValue,
    },
    /// A bare search word, matched loosely against subject and body.
    LooseWord(WordValue),
    /// A quoted phrase, matched as a contiguous substring.
    ExactWord(String),
    /// Conjunction, explicit (`AND`) or implicit (adjacency).
    And(Vec<Node>),
    /// Disjunction (`OR` or `{…}`).
    Or(Vec<Node>),
    /// Negation (`-term`).
    Not(Box<Node>),
    /// A parenthesized group of two or more expressions.
    Group(Vec<Node>),
    /// Proximity search (`holiday AROUND 10 vacation`).
    Around {
        left: Box<Node>,
        distance: i64,
        right: Box<Node>,
    },
}

impl Node {
    /// Convenience constructor for an operator node.
    #[must_use]
    pub const fn operator(kind: OperatorKind, value: OperatorValue) -> Self {
        Self::Operator { kind, value }
    }

    /// Convenience constructor for a textual loose word.
    #[must_use]
    pub fn loose_word(value: impl Into<String>) -> Self {
        Self::LooseWord(WordValue::Text(value.into()))
    }

    /// Convenience constructor for an exact (quoted) phrase.
    #[must_use]
    pub fn exact_word(value: impl Into<String>) -> Self {
        Self::ExactWord(value.into())
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[Node], sep: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Renders the node back into query-like syntax. The rendering is for
/// diagnostics and is not guaranteed to re-tokenize identically (quoting
/// and escapes are not reinstated beyond the `"…"` around exact phrases).
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator { kind, value } => match value {
                OperatorValue::Expr(_) => write!(f, "{kind}:({value})"),
                _ => write!(f, "{kind}:{value}"),
            },
            Self::LooseWord(value) => write!(f, "{value}"),
            Self::ExactWord(value) => write!(f, "\"{value}\""),
            Self::And(operands) => {
                f.write_str("(")?;
                write_joined(f, operands, " AND ")?;
                f.write_str(")")
            }
            Self::Or(operands) => {
                f.write_str("(")?;
                write_joined(f, operands, " OR ")?;
                f.write_str(")")
            }
            Self::Not(child) => write!(f, "-{child}"),
            Self::Group(children) => {
                f.write_str("(")?;
                write_joined(f, children, " ")?;
                f.write_str(")")
            }
            Self::Around {
                left,
                distance,
                right,
            } => write!(f, "({left} AROUND {distance} {right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_kind_round_trips_names() {
        for kind in [
            OperatorKind::From,
            OperatorKind::OlderThan,
            OperatorKind::DeliveredTo,
            OperatorKind::Rfc822MsgId,
        ] {
            assert_eq!(OperatorKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(OperatorKind::from_name("recipient"), None);
    }

    #[test]
    fn test_display_operator() {
        let node = Node::operator(
            OperatorKind::From,
            OperatorValue::Text(String::from("amy@example.com")),
        );
        assert_eq!(node.to_string(), "from:amy@example.com");
    }

    #[test]
    fn test_display_nested() {
        let node = Node::And(vec![
            Node::loose_word("dinner"),
            Node::Not(Box::new(Node::loose_word("movie"))),
        ]);
        assert_eq!(node.to_string(), "(dinner AND -movie)");
    }

    #[test]
    fn test_display_around() {
        let node = Node::Around {
            left: Box::new(Node::loose_word("holiday")),
            distance: 10,
            right: Box::new(Node::loose_word("vacation")),
        };
        assert_eq!(node.to_string(), "(holiday AROUND 10 vacation)");
    }

    #[test]
    fn test_display_exact_word() {
        assert_eq!(Node::exact_word("team lunch").to_string(), "\"team lunch\"");
    }
}
