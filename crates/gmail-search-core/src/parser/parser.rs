//! The parser implementation.

use super::ParseError;
use crate::ast::{Node, OperatorKind, OperatorValue, WordValue};
use crate::lexer::{classify, Keyword, Token, TokenKind};

/// A recursive-descent parser over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Creates a parser for the given tokens. Loose words with embedded
    /// hyphens are split into separate word tokens up front.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: split_embedded_hyphens(tokens),
            position: 0,
        }
    }

    /// Parses the token stream into an AST.
    ///
    /// When the input holds several top-level runs separated by tokens the
    /// grammar cannot attach (for example a bare `AND` between two
    /// complete expressions), the first run wins.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyQuery`] if no expression was found.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let mut children = Vec::new();

        while !self.at_eof() {
            if let Some(node) = self.parse_expression() {
                children.push(node);
            }
        }

        tracing::debug!(top_level = children.len(), "parsed query");
        children.into_iter().next().ok_or(ParseError::EmptyQuery)
    }

    fn current_kind(&self) -> &TokenKind {
        self.tokens
            .get(self.position)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn peek_kind(&self) -> &TokenKind {
        self.tokens
            .get(self.position + 1)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn current_is(&self, keyword: Keyword) -> bool {
        matches!(self.current_kind(), TokenKind::Keyword(k) if *k == keyword)
    }

    fn parse_expression(&mut self) -> Option<Node> {
        self.parse_or_expression()
    }

    fn parse_or_expression(&mut self) -> Option<Node> {
        let mut operands = Vec::new();

        if let Some(first) = self.parse_and_expression() {
            operands.push(first);
        }

        while self.current_is(Keyword::Or) {
            self.advance();
            if let Some(operand) = self.parse_and_expression() {
                operands.push(operand);
            }
        }

        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Node::Or(operands)),
        }
    }

    fn parse_and_expression(&mut self) -> Option<Node> {
        let mut operands = Vec::new();

        if let Some(first) = self.parse_around_expression() {
            operands.push(first);
        }

        while self.current_is(Keyword::And) {
            self.advance();
            if let Some(operand) = self.parse_around_expression() {
                operands.push(operand);
            }
        }

        // Adjacency is an implicit AND; stop at anything a surrounding
        // rule claims.
        loop {
            match self.current_kind() {
                TokenKind::Eof
                | TokenKind::RightParen
                | TokenKind::RightBrace
                | TokenKind::Keyword(Keyword::Or | Keyword::And) => break,
                _ => match self.parse_around_expression() {
                    Some(operand) => operands.push(operand),
                    None => break,
                },
            }
        }

        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Node::And(operands)),
        }
    }

    fn parse_around_expression(&mut self) -> Option<Node> {
        let left = self.parse_unary_expression();

        if self.current_is(Keyword::Around) {
            self.advance();

            // The distance is optional and defaults to 5 words.
            let mut distance = 5;
            if let TokenKind::Number(n) = self.current_kind() {
                distance = *n;
                self.advance();
            }

            let right = self.parse_unary_expression();
            return match (left, right) {
                (Some(left), Some(right)) => Some(Node::Around {
                    left: Box::new(left),
                    distance,
                    right: Box::new(right),
                }),
                (Some(node), None) | (None, Some(node)) => Some(node),
                (None, None) => None,
            };
        }

        left
    }

    fn parse_unary_expression(&mut self) -> Option<Node> {
        match self.current_kind() {
            TokenKind::Minus => {
                self.advance();
                let child = self.parse_primary_expression()?;
                Some(Node::Not(Box::new(child)))
            }
            TokenKind::Plus => {
                // `+word` used to force exact matching; treated as the word.
                self.advance();
                self.parse_primary_expression()
            }
            _ => self.parse_primary_expression(),
        }
    }

    fn parse_primary_expression(&mut self) -> Option<Node> {
        match self.current_kind().clone() {
            TokenKind::Eof => None,
            TokenKind::LeftParen => self.parse_parentheses(),
            TokenKind::LeftBrace => self.parse_braces(),
            TokenKind::Word(word) => self.parse_operator_or_text(&word),
            TokenKind::QuotedString(value) => {
                self.advance();
                Some(Node::ExactWord(value))
            }
            TokenKind::Email(value) | TokenKind::Date(value) | TokenKind::RelativeTime(value) => {
                self.advance();
                Some(Node::LooseWord(WordValue::Text(value)))
            }
            TokenKind::Number(n) => {
                self.advance();
                Some(Node::LooseWord(WordValue::Number(n)))
            }
            // Stray delimiter; skip it.
            _ => {
                self.advance();
                None
            }
        }
    }

    fn parse_parentheses(&mut self) -> Option<Node> {
        self.advance(); // (

        let mut children = Vec::new();
        while !self.at_eof() && !matches!(self.current_kind(), TokenKind::RightParen) {
            if let Some(node) = self.parse_expression() {
                children.push(node);
            }
        }

        if matches!(self.current_kind(), TokenKind::RightParen) {
            self.advance();
        }

        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Node::Group(children)),
        }
    }

    fn parse_braces(&mut self) -> Option<Node> {
        self.advance(); // {

        let mut children = Vec::new();
        while !self.at_eof() && !matches!(self.current_kind(), TokenKind::RightBrace) {
            if let Some(node) = self.parse_unary_expression() {
                children.push(node);
            }
        }

        if matches!(self.current_kind(), TokenKind::RightBrace) {
            self.advance();
        }

        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Node::Or(children)),
        }
    }

    fn parse_operator_or_text(&mut self, word: &str) -> Option<Node> {
        if let Some(kind) = OperatorKind::from_name(&word.to_lowercase()) {
            if matches!(self.peek_kind(), TokenKind::Colon) {
                self.advance(); // operator name
                self.advance(); // colon
                let value = self.parse_operator_value();
                return Some(Node::Operator { kind, value });
            }
        }

        self.advance();
        Some(Node::LooseWord(WordValue::Text(String::from(word))))
    }

    /// Takes exactly one token (or one bracketed group) as the operator
    /// value. Multi-word values must be quoted: `from:"john smith"`; a bare
    /// word after the value is a separate search term. A missing value
    /// yields the empty string.
    fn parse_operator_value(&mut self) -> OperatorValue {
        match self.current_kind().clone() {
            TokenKind::LeftParen => self
                .parse_parentheses()
                .map_or_else(|| OperatorValue::Text(String::new()), |node| {
                    OperatorValue::Expr(Box::new(node))
                }),
            TokenKind::LeftBrace => self
                .parse_braces()
                .map_or_else(|| OperatorValue::Text(String::new()), |node| {
                    OperatorValue::Expr(Box::new(node))
                }),
            TokenKind::QuotedString(value)
            | TokenKind::Word(value)
            | TokenKind::Email(value)
            | TokenKind::Date(value)
            | TokenKind::RelativeTime(value) => {
                self.advance();
                OperatorValue::Text(value)
            }
            TokenKind::Number(n) => {
                self.advance();
                OperatorValue::Number(n)
            }
            // The token belongs to the surrounding expression; leave it.
            _ => OperatorValue::Text(String::new()),
        }
    }
}

/// Splits loose words with embedded hyphens into separate word tokens:
/// `some-outfit` searches for `some` and `outfit`, like Gmail. Tokens
/// directly after a colon are operator values and stay whole, so
/// `label:work-projects` keeps its hyphen.
fn split_embedded_hyphens(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let after_colon = matches!(out.last(), Some(t) if matches!(t.kind, TokenKind::Colon));
        match token.kind {
            TokenKind::Word(ref word) if !after_colon && word.contains('-') => {
                let mut offset = 0;
                for segment in word.split('-') {
                    if !segment.is_empty() {
                        out.push(Token::new(
                            classify(String::from(segment)),
                            token.position + offset,
                        ));
                    }
                    offset += segment.len() + 1;
                }
            }
            _ => out.push(token),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(input: &str) -> Node {
        match Parser::new(Lexer::new(input).tokenize()).parse() {
            Ok(node) => node,
            Err(err) => panic!("parse failed for {input:?}: {err}"),
        }
    }

    fn op(kind: OperatorKind, value: &str) -> Node {
        Node::operator(kind, OperatorValue::Text(String::from(value)))
    }

    #[test]
    fn test_empty_query_is_an_error() {
        let result = Parser::new(Lexer::new("").tokenize()).parse();
        assert_eq!(result, Err(ParseError::EmptyQuery));

        let result = Parser::new(Lexer::new("   ").tokenize()).parse();
        assert_eq!(result, Err(ParseError::EmptyQuery));
    }

    #[test]
    fn test_simple_operator() {
        assert_eq!(
            parse("from:amy@example.com"),
            op(OperatorKind::From, "amy@example.com")
        );
    }

    #[test]
    fn test_operator_name_is_case_insensitive() {
        assert_eq!(parse("FROM:amy"), op(OperatorKind::From, "amy"));
    }

    #[test]
    fn test_loose_word() {
        assert_eq!(parse("dinner"), Node::loose_word("dinner"));
    }

    #[test]
    fn test_number_word() {
        assert_eq!(parse("42"), Node::LooseWord(WordValue::Number(42)));
    }

    #[test]
    fn test_quoted_string_is_exact() {
        assert_eq!(parse("\"team lunch\""), Node::exact_word("team lunch"));
    }

    #[test]
    fn test_implicit_and() {
        assert_eq!(
            parse("dinner movie"),
            Node::And(vec![Node::loose_word("dinner"), Node::loose_word("movie")])
        );
    }

    #[test]
    fn test_explicit_and() {
        assert_eq!(
            parse("from:amy AND to:bob"),
            Node::And(vec![op(OperatorKind::From, "amy"), op(OperatorKind::To, "bob")])
        );
    }

    #[test]
    fn test_or_expression() {
        assert_eq!(
            parse("from:amy OR from:bob"),
            Node::Or(vec![op(OperatorKind::From, "amy"), op(OperatorKind::From, "bob")])
        );
    }

    #[test]
    fn test_or_binds_looser_than_and() {
        assert_eq!(
            parse("a b OR c"),
            Node::Or(vec![
                Node::And(vec![Node::loose_word("a"), Node::loose_word("b")]),
                Node::loose_word("c"),
            ])
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            parse("dinner -movie"),
            Node::And(vec![
                Node::loose_word("dinner"),
                Node::Not(Box::new(Node::loose_word("movie"))),
            ])
        );
    }

    #[test]
    fn test_negated_operator() {
        assert_eq!(
            parse("-from:amy"),
            Node::Not(Box::new(op(OperatorKind::From, "amy")))
        );
    }

    #[test]
    fn test_plus_is_ignored() {
        assert_eq!(parse("+unicorn"), Node::loose_word("unicorn"));
    }

    #[test]
    fn test_braces_are_disjunction() {
        assert_eq!(
            parse("{from:amy from:bob}"),
            Node::Or(vec![op(OperatorKind::From, "amy"), op(OperatorKind::From, "bob")])
        );
    }

    #[test]
    fn test_single_child_braces_collapse() {
        assert_eq!(parse("{dinner}"), Node::loose_word("dinner"));
    }

    #[test]
    fn test_parentheses_collapse_to_inner_and() {
        assert_eq!(
            parse("(dinner movie night)"),
            Node::And(vec![
                Node::loose_word("dinner"),
                Node::loose_word("movie"),
                Node::loose_word("night"),
            ])
        );
    }

    #[test]
    fn test_single_child_parentheses_collapse() {
        assert_eq!(parse("(dinner)"), Node::loose_word("dinner"));
    }

    #[test]
    fn test_operator_with_paren_value() {
        assert_eq!(
            parse("subject:(dinner movie)"),
            Node::Operator {
                kind: OperatorKind::Subject,
                value: OperatorValue::Expr(Box::new(Node::And(vec![
                    Node::loose_word("dinner"),
                    Node::loose_word("movie"),
                ]))),
            }
        );
    }

    #[test]
    fn test_operator_with_brace_value() {
        assert_eq!(
            parse("from:{amy bob}"),
            Node::Operator {
                kind: OperatorKind::From,
                value: OperatorValue::Expr(Box::new(Node::Or(vec![
                    Node::loose_word("amy"),
                    Node::loose_word("bob"),
                ]))),
            }
        );
    }

    #[test]
    fn test_operator_takes_a_single_value_token() {
        assert_eq!(
            parse("from:amy tax"),
            Node::And(vec![op(OperatorKind::From, "amy"), Node::loose_word("tax")])
        );
    }

    #[test]
    fn test_operator_with_number_value() {
        assert_eq!(
            parse("size:1000000"),
            Node::operator(OperatorKind::Size, OperatorValue::Number(1_000_000))
        );
    }

    #[test]
    fn test_operator_with_missing_value() {
        assert_eq!(parse("from:"), op(OperatorKind::From, ""));
    }

    #[test]
    fn test_non_operator_word_with_colon() {
        // `foo` is not an operator; the stray colon ends the first run.
        assert_eq!(parse("foo:bar"), Node::loose_word("foo"));
    }

    #[test]
    fn test_around_with_distance() {
        assert_eq!(
            parse("holiday AROUND 10 vacation"),
            Node::Around {
                left: Box::new(Node::loose_word("holiday")),
                distance: 10,
                right: Box::new(Node::loose_word("vacation")),
            }
        );
    }

    #[test]
    fn test_around_default_distance() {
        assert_eq!(
            parse("holiday AROUND vacation"),
            Node::Around {
                left: Box::new(Node::loose_word("holiday")),
                distance: 5,
                right: Box::new(Node::loose_word("vacation")),
            }
        );
    }

    #[test]
    fn test_embedded_hyphen_splits_loose_words() {
        assert_eq!(
            parse("some-outfit"),
            Node::And(vec![Node::loose_word("some"), Node::loose_word("outfit")])
        );
        assert_eq!(
            parse("a-b-c"),
            Node::And(vec![
                Node::loose_word("a"),
                Node::loose_word("b"),
                Node::loose_word("c"),
            ])
        );
    }

    #[test]
    fn test_embedded_hyphen_combined_with_negation() {
        assert_eq!(
            parse("some-outfit -dogs"),
            Node::And(vec![
                Node::loose_word("some"),
                Node::loose_word("outfit"),
                Node::Not(Box::new(Node::loose_word("dogs"))),
            ])
        );
    }

    #[test]
    fn test_operator_value_keeps_hyphens() {
        assert_eq!(parse("from:mary-jane"), op(OperatorKind::From, "mary-jane"));
        assert_eq!(
            parse("label:starter-league-thisforthat"),
            op(OperatorKind::Label, "starter-league-thisforthat")
        );
        assert_eq!(
            parse("label:every--every.to-"),
            op(OperatorKind::Label, "every--every.to-")
        );
    }

    #[test]
    fn test_quoted_string_swallows_keywords() {
        assert_eq!(
            parse("\"secret AROUND 25 birthday\""),
            Node::exact_word("secret AROUND 25 birthday")
        );
    }

    #[test]
    fn test_complex_query() {
        assert_eq!(
            parse("from:amy@example.com subject:\"urgent meeting\" -is:read"),
            Node::And(vec![
                op(OperatorKind::From, "amy@example.com"),
                op(OperatorKind::Subject, "urgent meeting"),
                Node::Not(Box::new(op(OperatorKind::Is, "read"))),
            ])
        );
    }

    #[test]
    fn test_unbalanced_parenthesis_is_tolerated() {
        assert_eq!(
            parse("(dinner movie"),
            Node::And(vec![Node::loose_word("dinner"), Node::loose_word("movie")])
        );
    }
}
