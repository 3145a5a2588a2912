//! AST-to-SQL compilation.

use std::sync::LazyLock;

use gmail_search_core::{Node, OperatorKind, OperatorValue, WordValue};
use regex::Regex;

use crate::dialect::{DateBound, Dialect};
use crate::error::CompileError;
use crate::query::{AliasCounter, CompiledQuery, Param, QueryBuilder};

static RELATIVE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([dmy])$").expect("valid regex"));

static SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(\d+)([kmg])$").expect("valid regex"));

/// `has:` values backed by a `has_<value>` flag column.
const HAS_FLAGS: &[&str] = &[
    "attachment",
    "youtube",
    "drive",
    "document",
    "spreadsheet",
    "presentation",
];

/// `has:` superstar values; hyphens map to underscores in the column.
const HAS_COLOR_FLAGS: &[&str] = &[
    "yellow-star",
    "orange-star",
    "red-star",
    "purple-star",
    "blue-star",
    "green-star",
    "red-bang",
    "orange-guillemet",
    "yellow-bang",
    "green-check",
    "blue-info",
    "purple-question",
];

/// Compiles a parsed query into parameterized SQL for the given dialect.
///
/// `current_user_email` substitutes for the special address value `me`
/// (`from:me`, `to:me`); when absent, `me` is matched literally.
///
/// # Errors
///
/// Returns a [`CompileError`] when a flag operator (`has:`, `in:`,
/// `is:`) carries a value outside its known set.
pub fn compile<D: Dialect>(
    node: &Node,
    dialect: &D,
    current_user_email: Option<&str>,
) -> Result<CompiledQuery, CompileError> {
    let mut aliases = AliasCounter::new();
    let mut compiler = Compiler {
        dialect,
        current_user_email,
        context: MatchContext::FullText,
        query: QueryBuilder::default(),
    };
    compiler.visit(node, &mut aliases)?;

    tracing::debug!(
        dialect = dialect.name(),
        params = compiler.query.params.len(),
        joins = compiler.query.joins.len(),
        "compiled query"
    );
    Ok(compiler.query.into_compiled())
}

/// What a bare word matches in the current position. Top-level words
/// search subject and body; words nested inside an address operator
/// match the joined email column; words nested inside `subject:` match
/// the subject only.
#[derive(Debug, Clone)]
enum MatchContext {
    FullText,
    /// Alias of the `message_addresses` join the word compares against.
    Email(String),
    Subject,
}

struct Compiler<'a, D: Dialect> {
    dialect: &'a D,
    current_user_email: Option<&'a str>,
    context: MatchContext,
    query: QueryBuilder,
}

impl<D: Dialect> Compiler<'_, D> {
    fn visit(&mut self, node: &Node, aliases: &mut AliasCounter) -> Result<(), CompileError> {
        match node {
            Node::Operator { kind, value } => self.visit_operator(*kind, value, aliases),
            Node::LooseWord(value) => {
                self.visit_loose_word(value);
                Ok(())
            }
            Node::ExactWord(value) => {
                self.visit_exact_word(value);
                Ok(())
            }
            Node::And(operands) => self.visit_connective(operands, " AND ", aliases),
            Node::Or(operands) => self.visit_connective(operands, " OR ", aliases),
            Node::Not(child) => self.visit_not(child, aliases),
            Node::Group(children) => self.visit_group(children, aliases),
            // Proximity search needs a positional index; without one it
            // matches nothing.
            Node::Around { .. } => {
                self.query.add_condition("(1 = 0)");
                Ok(())
            }
        }
    }

    /// Compiles a node into a fresh sub-query sharing the alias counter.
    fn sub_compile(
        &self,
        node: &Node,
        aliases: &mut AliasCounter,
        context: MatchContext,
    ) -> Result<QueryBuilder, CompileError> {
        let mut sub = Compiler {
            dialect: self.dialect,
            current_user_email: self.current_user_email,
            context,
            query: QueryBuilder::default(),
        };
        sub.visit(node, aliases)?;
        Ok(sub.query)
    }

    fn visit_connective(
        &mut self,
        operands: &[Node],
        separator: &str,
        aliases: &mut AliasCounter,
    ) -> Result<(), CompileError> {
        let mut parts = Vec::with_capacity(operands.len());
        for operand in operands {
            let sub = self.sub_compile(operand, aliases, self.context.clone())?;
            parts.push(sub.combined_condition());
            self.query.absorb(sub);
        }
        self.query.add_condition(format!("({})", parts.join(separator)));
        Ok(())
    }

    fn visit_not(&mut self, child: &Node, aliases: &mut AliasCounter) -> Result<(), CompileError> {
        let sub = self.sub_compile(child, aliases, self.context.clone())?;
        let condition = format!("NOT {}", sub.combined_condition());
        self.query.absorb(sub);
        self.query.add_condition(condition);
        Ok(())
    }

    fn visit_group(
        &mut self,
        children: &[Node],
        aliases: &mut AliasCounter,
    ) -> Result<(), CompileError> {
        if let [child] = children {
            return self.visit(child, aliases);
        }

        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            let sub = self.sub_compile(child, aliases, self.context.clone())?;
            parts.push(sub.combined_condition());
            self.query.absorb(sub);
        }
        self.query.add_condition(format!("({})", parts.join(" AND ")));
        Ok(())
    }

    fn visit_loose_word(&mut self, value: &WordValue) {
        match self.context.clone() {
            MatchContext::FullText => {
                let text = value.to_string();
                let raw = match value {
                    WordValue::Text(s) => Param::text(s.clone()),
                    WordValue::Number(n) => Param::Integer(*n),
                };
                // Word-boundary matching: the value as the whole field,
                // at the start, at the end, or between spaces.
                for _ in 0..2 {
                    self.query.add_param(raw.clone());
                    self.query.add_param(Param::text(format!("{text} %")));
                    self.query.add_param(Param::text(format!("% {text}")));
                    self.query.add_param(Param::text(format!("% {text} %")));
                }
                self.query.add_condition(
                    "((m0.subject = ? OR m0.subject LIKE ? OR m0.subject LIKE ? OR m0.subject LIKE ?) \
                     OR (m0.body = ? OR m0.body LIKE ? OR m0.body LIKE ? OR m0.body LIKE ?))",
                );
            }
            MatchContext::Email(alias) => {
                let resolved = self.resolve_me(value.to_string());
                let condition =
                    self.string_match_condition(&format!("{alias}.email_address"), &resolved);
                self.query.add_condition(condition);
            }
            MatchContext::Subject => {
                self.query.add_param(Param::text(format!("%{value}%")));
                self.query.add_condition("m0.subject LIKE ?");
            }
        }
    }

    fn visit_exact_word(&mut self, value: &str) {
        match self.context.clone() {
            MatchContext::FullText => {
                // Quoted phrases match as a substring anywhere.
                self.query.add_param(Param::text(format!("%{value}%")));
                self.query.add_param(Param::text(format!("%{value}%")));
                self.query
                    .add_condition("(m0.subject LIKE ? OR m0.body LIKE ?)");
            }
            MatchContext::Email(alias) => {
                let resolved = self.resolve_me(String::from(value));
                let condition =
                    self.string_match_condition(&format!("{alias}.email_address"), &resolved);
                self.query.add_condition(condition);
            }
            MatchContext::Subject => {
                self.query.add_param(Param::text(format!("%{value}%")));
                self.query.add_condition("m0.subject LIKE ?");
            }
        }
    }

    fn visit_operator(
        &mut self,
        kind: OperatorKind,
        value: &OperatorValue,
        aliases: &mut AliasCounter,
    ) -> Result<(), CompileError> {
        match kind {
            OperatorKind::From => self.visit_address(&["from", "cc", "bcc"], value, aliases),
            OperatorKind::To => self.visit_address(&["to", "cc", "bcc"], value, aliases),
            OperatorKind::Cc => self.visit_address(&["cc"], value, aliases),
            OperatorKind::Bcc => self.visit_address(&["bcc"], value, aliases),
            OperatorKind::DeliveredTo => self.visit_address(&["delivered_to"], value, aliases),
            OperatorKind::Subject => self.visit_subject(value, aliases),
            OperatorKind::After | OperatorKind::Newer => {
                self.visit_absolute_date(value, "m0.internal_date > ?");
                Ok(())
            }
            OperatorKind::Before | OperatorKind::Older => {
                self.visit_absolute_date(value, "m0.internal_date < ?");
                Ok(())
            }
            OperatorKind::OlderThan => {
                self.visit_relative_date(value, DateBound::Older);
                Ok(())
            }
            OperatorKind::NewerThan => {
                self.visit_relative_date(value, DateBound::Newer);
                Ok(())
            }
            OperatorKind::Label => {
                self.visit_label(value, aliases);
                Ok(())
            }
            OperatorKind::Category => {
                self.query.add_param(Param::text(scalar_value(value)));
                self.query.add_condition("m0.category = ?");
                Ok(())
            }
            OperatorKind::Has => self.visit_has(value, aliases),
            OperatorKind::List => {
                let condition =
                    self.string_match_condition("m0.mailing_list", &scalar_value(value));
                self.query.add_condition(condition);
                Ok(())
            }
            OperatorKind::Filename => {
                self.visit_filename(value, aliases);
                Ok(())
            }
            OperatorKind::In => self.visit_in(value),
            OperatorKind::Is => self.visit_is(value),
            OperatorKind::Size => {
                self.visit_size(value, "=");
                Ok(())
            }
            OperatorKind::Larger => {
                self.visit_size(value, ">");
                Ok(())
            }
            OperatorKind::Smaller => {
                self.visit_size(value, "<");
                Ok(())
            }
            OperatorKind::Rfc822MsgId => {
                self.query.add_param(Param::text(scalar_value(value)));
                self.query.add_condition("m0.rfc822_message_id = ?");
                Ok(())
            }
        }
    }

    /// Address operators join `message_addresses` and constrain both the
    /// address type and the email. `from:` and `to:` also search the
    /// copy fields, matching Gmail. Type parameters bind before the
    /// email value.
    fn visit_address(
        &mut self,
        address_types: &[&str],
        value: &OperatorValue,
        aliases: &mut AliasCounter,
    ) -> Result<(), CompileError> {
        let alias = aliases.alias("message_addresses");
        self.query.add_join(format!(
            "INNER JOIN message_addresses AS {alias} ON m0.id = {alias}.message_id"
        ));

        let type_conditions = address_types
            .iter()
            .map(|_| format!("{alias}.address_type = ?"))
            .collect::<Vec<_>>()
            .join(" OR ");
        for address_type in address_types {
            self.query.add_param(Param::text(*address_type));
        }

        let email_condition = if let Some(expr) = combinator_value(value) {
            let sub = self.sub_compile(expr, aliases, MatchContext::Email(alias))?;
            let condition = sub.combined_condition();
            self.query.absorb(sub);
            condition
        } else {
            let resolved = self.resolve_me(scalar_value(value));
            self.string_match_condition(&format!("{alias}.email_address"), &resolved)
        };

        self.query
            .add_condition(format!("(({type_conditions}) AND {email_condition})"));
        Ok(())
    }

    fn visit_subject(
        &mut self,
        value: &OperatorValue,
        aliases: &mut AliasCounter,
    ) -> Result<(), CompileError> {
        if let Some(expr) = combinator_value(value) {
            let sub = self.sub_compile(expr, aliases, MatchContext::Subject)?;
            let condition = sub.combined_condition();
            self.query.absorb(sub);
            self.query.add_condition(condition);
        } else {
            self.query
                .add_param(Param::text(format!("%{}%", scalar_value(value))));
            self.query.add_condition("m0.subject LIKE ?");
        }
        Ok(())
    }

    fn visit_absolute_date(&mut self, value: &OperatorValue, condition: &'static str) {
        let date = scalar_value(value).replace('/', "-");
        self.query.add_param(Param::text(date));
        self.query.add_condition(condition);
    }

    fn visit_relative_date(&mut self, value: &OperatorValue, bound: DateBound) {
        let raw = scalar_value(value);
        let interval = RELATIVE_TIME.captures(&raw).map_or_else(
            // Unrecognized values pass through for the database to reject.
            || raw.clone(),
            |caps| {
                let unit = match &caps[2] {
                    "d" => "days",
                    "m" => "months",
                    _ => "years",
                };
                self.dialect.relative_interval(&caps[1], unit)
            },
        );
        self.query.add_param(Param::Text(interval));
        self.query
            .add_condition(self.dialect.relative_date_condition(bound));
    }

    fn visit_label(&mut self, value: &OperatorValue, aliases: &mut AliasCounter) {
        let ml = aliases.alias("message_labels");
        let l = aliases.alias("labels");
        self.query.add_join(format!(
            "INNER JOIN message_labels AS {ml} ON m0.id = {ml}.message_id \
             INNER JOIN labels AS {l} ON {ml}.label_id = {l}.id"
        ));
        self.query.add_param(Param::text(scalar_value(value)));
        self.query.add_condition(format!("{l}.name = ?"));
    }

    fn visit_has(
        &mut self,
        value: &OperatorValue,
        aliases: &mut AliasCounter,
    ) -> Result<(), CompileError> {
        let value = scalar_value(value);

        if HAS_FLAGS.contains(&value.as_str()) {
            self.query.add_condition(format!("m0.has_{value} = 1"));
        } else if HAS_COLOR_FLAGS.contains(&value.as_str()) {
            let column = value.replace('-', "_");
            self.query.add_condition(format!("m0.has_{column} = 1"));
        } else if value == "userlabels" {
            let ml = aliases.alias("message_labels");
            let l = aliases.alias("labels");
            self.query.add_join(format!(
                "INNER JOIN message_labels AS {ml} ON m0.id = {ml}.message_id \
                 INNER JOIN labels AS {l} ON {ml}.label_id = {l}.id"
            ));
            self.query.add_condition(format!("{l}.is_system_label = 0"));
        } else if value == "nouserlabels" {
            self.query.add_condition(
                "NOT EXISTS (SELECT 1 FROM message_labels AS ml \
                 INNER JOIN labels AS l ON ml.label_id = l.id \
                 WHERE ml.message_id = m0.id AND l.is_system_label = 0)",
            );
        } else {
            return Err(CompileError::UnknownHasValue(value));
        }
        Ok(())
    }

    fn visit_filename(&mut self, value: &OperatorValue, aliases: &mut AliasCounter) {
        let value = scalar_value(value);
        let alias = aliases.alias("attachments");
        self.query.add_join(format!(
            "INNER JOIN attachments AS {alias} ON m0.id = {alias}.message_id"
        ));

        if value.contains('.') {
            // A dotted value is a full filename.
            self.query.add_param(Param::text(value));
            self.query.add_condition(format!("{alias}.filename = ?"));
        } else {
            // Otherwise match it as an extension or a name prefix.
            self.query.add_param(Param::text(format!("%.{value}")));
            self.query.add_param(Param::text(format!("{value}%")));
            self.query.add_condition(format!(
                "({alias}.filename LIKE ? OR {alias}.filename LIKE ?)"
            ));
        }
    }

    fn visit_in(&mut self, value: &OperatorValue) -> Result<(), CompileError> {
        let value = scalar_value(value);
        match value.as_str() {
            // Matches every location; contributes no condition.
            "anywhere" => {}
            "inbox" | "archive" | "snoozed" | "spam" | "trash" => {
                self.query.add_condition(format!("m0.in_{value} = 1"));
            }
            _ => return Err(CompileError::UnknownInValue(value)),
        }
        Ok(())
    }

    fn visit_is(&mut self, value: &OperatorValue) -> Result<(), CompileError> {
        let value = scalar_value(value);
        match value.as_str() {
            "important" | "starred" | "unread" | "read" | "muted" => {
                self.query.add_condition(format!("m0.is_{value} = 1"));
            }
            _ => return Err(CompileError::UnknownIsValue(value)),
        }
        Ok(())
    }

    fn visit_size(&mut self, value: &OperatorValue, comparison: &str) {
        self.query.add_param(Param::Integer(parse_size(value)));
        self.query
            .add_condition(format!("m0.size_bytes {comparison} ?"));
    }

    /// Exact match, or a one-sided `LIKE` when the value starts or ends
    /// with `@` (`from:@example.com`, `from:amy@`).
    fn string_match_condition(&mut self, column: &str, value: &str) -> String {
        if value.starts_with('@') {
            self.query.add_param(Param::text(format!("%{value}")));
            format!("{column} LIKE ?")
        } else if value.ends_with('@') {
            self.query.add_param(Param::text(format!("{value}%")));
            format!("{column} LIKE ?")
        } else {
            self.query.add_param(Param::text(value));
            format!("{column} = ?")
        }
    }

    fn resolve_me(&self, value: String) -> String {
        if value == "me" {
            self.current_user_email.map_or(value, String::from)
        } else {
            value
        }
    }
}

/// Returns the nested expression when the operator value needs
/// sub-compilation; single-word expressions read as scalars instead.
fn combinator_value(value: &OperatorValue) -> Option<&Node> {
    match value {
        OperatorValue::Expr(node) => match node.as_ref() {
            Node::LooseWord(_) | Node::ExactWord(_) => None,
            node => Some(node),
        },
        OperatorValue::Text(_) | OperatorValue::Number(_) => None,
    }
}

/// The operator value as plain text. Nested single words collapse to
/// their text; anything unresolvable is the empty string.
fn scalar_value(value: &OperatorValue) -> String {
    match value {
        OperatorValue::Text(s) => s.clone(),
        OperatorValue::Number(n) => n.to_string(),
        OperatorValue::Expr(node) => match node.as_ref() {
            Node::LooseWord(word) => word.to_string(),
            Node::ExactWord(s) => s.clone(),
            _ => String::new(),
        },
    }
}

/// Size in bytes: a bare number, or digits with a binary `K`/`M`/`G`
/// suffix (case-insensitive). Unparseable values become 0.
fn parse_size(value: &OperatorValue) -> i64 {
    if let OperatorValue::Number(n) = value {
        return *n;
    }

    let raw = scalar_value(value);
    SIZE_SUFFIX.captures(&raw).map_or_else(
        || raw.parse().unwrap_or(0),
        |caps| {
            let number: i64 = caps[1].parse().unwrap_or(0);
            let multiplier = match caps[2].to_ascii_lowercase().as_str() {
                "k" => 1024,
                "m" => 1024 * 1024,
                _ => 1024 * 1024 * 1024,
            };
            number.saturating_mul(multiplier)
        },
    )
}
