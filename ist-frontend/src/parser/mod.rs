//! The parser: turns a token sequence into a [`ParseTree`].
//!
//! Tokens are read strictly left to right through a single index. Lookahead is a peek at a
//! fixed distance past that index and the parser never rewinds.
//!
//! Productions come in two flavours, the same way for every node:
//! - `optional_*` productions look at the next token and return `None` when they do not apply,
//!   leaving the decision to the caller.
//! - `required_*` productions commit and return an error when the tokens don't fit.
pub mod ast;
mod decl;
pub mod errors;
mod expr;
pub mod number;
mod types;

use std::{sync::Arc, time::Instant};

use tracing::{debug, trace};

use crate::{Location, Position, SourceUnit, Spanned, Token, TokenKind};

use ast::ParseTree;
use errors::{Expectations, ParseError};

/// Parses every declaration of a scanned source unit, stopping at the first error.
pub fn parse(unit: &SourceUnit) -> Result<ParseTree, ParseError> {
    parse_tokens(unit.shared_name(), unit.tokens())
}

/// Parses a bare token sequence, stopping at the first error.
///
/// `name` names the source unit the tokens came from. An empty sequence is an empty tree.
pub fn parse_tokens(name: impl Into<Arc<str>>, tokens: &[Token]) -> Result<ParseTree, ParseError> {
    let mut parser = Parser::new(name.into(), tokens);
    parser.parse_tree()
}

/// Parses a token sequence, collecting up to `error_limit` errors.
///
/// A declaration that fails to parse is dropped and the parser picks up again at the next token
/// pair that can start a variable declaration. [`TokenKind::Rune`] tokens mark runs the scanner
/// already reported. They are skipped without a second error, and a declaration cut short by
/// one is dropped silently.
pub fn parse_recovering(
    name: impl Into<Arc<str>>,
    tokens: &[Token],
    error_limit: usize,
) -> (ParseTree, Vec<ParseError>) {
    let mut parser = Parser::new(name.into(), tokens);
    parser.parse_tree_recovering(error_limit.max(1))
}

pub struct Parser<'a> {
    source: Arc<str>,
    tokens: &'a [Token],
    index: usize, // Index into the `tokens` array
    last_end: Position, // span().end() of the previous token, where end of file errors point
}

impl<'a> Parser<'a> {
    pub fn new(source: Arc<str>, tokens: &'a [Token]) -> Self {
        let last_end = Position::new(source.clone(), Location::origin());

        Self {
            source,
            tokens,
            index: 0,
            last_end,
        }
    }

    fn parse_tree(&mut self) -> Result<ParseTree, ParseError> {
        let start = Instant::now();
        let mut tree = ParseTree::new(self.source.clone());

        while !self.at_end() {
            tree.push(self.required_decl()?);
        }

        debug!(
            source = %self.source,
            declarations = tree.declarations().len(),
            elapsed = ?start.elapsed(),
            "parsed source unit"
        );

        Ok(tree)
    }

    fn parse_tree_recovering(&mut self, error_limit: usize) -> (ParseTree, Vec<ParseError>) {
        let start = Instant::now();
        let mut tree = ParseTree::new(self.source.clone());
        let mut errors = Vec::new();

        while !self.at_end() {
            if self.next_is(0, TokenKind::Rune, None) {
                self.next();
                continue;
            }

            let started_at = self.index;
            match self.required_decl() {
                Ok(decl) => tree.push(decl),
                Err(ParseError::UnexpectedToken { found, .. })
                    if found.kind() == TokenKind::Rune =>
                {
                    trace!(at = %found.span(), "declaration stopped at a rune");
                    self.synchronize(started_at);
                }
                Err(error) => {
                    debug!("recovering from parse error: {error}");
                    errors.push(error);
                    if errors.len() >= error_limit {
                        debug!(limit = error_limit, "stopping at the error limit");
                        break;
                    }
                    self.synchronize(started_at);
                }
            }
        }

        debug!(
            source = %self.source,
            declarations = tree.declarations().len(),
            errors = errors.len(),
            elapsed = ?start.elapsed(),
            "parsed source unit"
        );

        (tree, errors)
    }

    /// Skips to the next place a declaration can start.
    ///
    /// Always moves past the token where the failed declaration started, so the same error can't
    /// be reported twice.
    fn synchronize(&mut self, started_at: usize) {
        if self.index == started_at {
            self.next();
        }

        while !self.at_end() && !self.at_declaration_start() {
            self.next();
        }

        trace!(index = self.index, "synchronized");
    }

    fn at_declaration_start(&self) -> bool {
        self.next_is(0, TokenKind::Identifier, None) && self.next_is(1, TokenKind::Identifier, None)
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Returns the token `ahead` places past the next one, without consuming anything
    pub(crate) fn peek(&self, ahead: usize) -> Option<&'a Token> {
        self.tokens.get(self.index + ahead)
    }

    /// Returns true if the token `ahead` places past the next one is of `kind` and, when given,
    /// has exactly `text`
    pub(crate) fn next_is(&self, ahead: usize, kind: TokenKind, text: Option<&str>) -> bool {
        self.peek(ahead).map_or(false, |token| token.is(kind, text))
    }

    /// Returns the next token and consumes it
    pub(crate) fn next(&mut self) -> Option<&'a Token> {
        let next = self.peek(0)?;
        self.index += 1;
        self.last_end = next.span().end();
        Some(next)
    }

    /// Consumes the next token if it is of the given kind
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        self.expect_matching(kind, None, Expectations::Kind(kind))
    }

    /// Consumes the next token if it is of the given kind and has exactly `text`
    pub(crate) fn expect_text(
        &mut self,
        kind: TokenKind,
        text: &'static str,
    ) -> Result<&'a Token, ParseError> {
        self.expect_matching(kind, Some(text), Expectations::Text(kind, text))
    }

    fn expect_matching(
        &mut self,
        kind: TokenKind,
        text: Option<&str>,
        expected: Expectations,
    ) -> Result<&'a Token, ParseError> {
        match self.peek(0) {
            Some(token) if token.is(kind, text) => {
                self.next();
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// The error for finding something other than `expected` as the next token
    pub(crate) fn unexpected(&self, expected: Expectations) -> ParseError {
        match self.peek(0) {
            Some(found) => ParseError::UnexpectedToken {
                found: found.clone(),
                expected,
            },
            None => ParseError::UnexpectedEof {
                eof: self.last_end.clone(),
                expected,
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use test_log::test;

    use super::*;
    use crate::{Location, Span};

    /// Builds tokens directly, one space apart on a single line.
    ///
    /// This reaches inputs the scanner refuses, such as a lone `=`.
    pub(crate) fn tokens(parts: &[(TokenKind, &str)]) -> Vec<Token> {
        let name: Arc<str> = "tokens.ist".into();
        let mut offset = 0;

        parts
            .iter()
            .map(|&(kind, text)| {
                let len = text.chars().count();
                let start = Location::new(1, offset + 1, offset);
                let end = Location::new(1, offset + len + 1, offset + text.len());
                offset += text.len() + 1;
                Token::new(kind, text, Span::from_locations(name.clone(), start, end))
            })
            .collect()
    }

    #[test]
    fn lookahead() {
        let tokens = tokens(&[
            (TokenKind::Identifier, "x"),
            (TokenKind::Operator, "="),
            (TokenKind::Number, "1"),
        ]);
        let mut parser = Parser::new("tokens.ist".into(), &tokens);

        assert!(parser.next_is(0, TokenKind::Identifier, None));
        assert!(parser.next_is(0, TokenKind::Identifier, Some("x")));
        assert!(!parser.next_is(0, TokenKind::Identifier, Some("y")));
        assert!(parser.next_is(1, TokenKind::Operator, Some("=")));
        assert!(!parser.next_is(3, TokenKind::Number, None));

        assert_eq!(parser.next(), Some(&tokens[0]));
        assert!(parser.next_is(0, TokenKind::Operator, None));
        assert_eq!(parser.expect_text(TokenKind::Operator, "="), Ok(&tokens[1]));
        assert_eq!(parser.expect(TokenKind::Number), Ok(&tokens[2]));
        assert_eq!(parser.next(), None);
    }

    #[test]
    fn expect_does_not_consume_on_mismatch() {
        let tokens = tokens(&[(TokenKind::Number, "1")]);
        let mut parser = Parser::new("tokens.ist".into(), &tokens);

        assert_eq!(
            parser.expect(TokenKind::Identifier),
            Err(ParseError::UnexpectedToken {
                found: tokens[0].clone(),
                expected: Expectations::Kind(TokenKind::Identifier),
            })
        );
        assert_eq!(parser.expect(TokenKind::Number), Ok(&tokens[0]));
    }

    #[test]
    fn end_of_file_points_after_the_last_token() {
        let tokens = tokens(&[(TokenKind::Identifier, "abc")]);
        let mut parser = Parser::new("tokens.ist".into(), &tokens);
        parser.next();

        match parser.expect(TokenKind::Identifier) {
            Err(ParseError::UnexpectedEof { eof, expected }) => {
                assert_eq!(eof.offset(), 3);
                assert_eq!(eof.column(), 4);
                assert_eq!(expected, Expectations::Kind(TokenKind::Identifier));
            }
            other => panic!("Expected an end of file error, got {other:?}"),
        }
    }

    #[test]
    fn empty_sequence_is_an_empty_tree() {
        let tree = parse_tokens("empty.ist", &[]).unwrap();

        assert_eq!(tree.source(), "empty.ist");
        assert!(tree.declarations().is_empty());
    }

    #[test]
    fn leading_operator_is_an_error() {
        let tokens = tokens(&[(TokenKind::Operator, "=="), (TokenKind::Identifier, "x")]);

        assert_eq!(
            parse_tokens("tokens.ist", &tokens),
            Err(ParseError::UnexpectedToken {
                found: tokens[0].clone(),
                expected: Expectations::Production("a declaration"),
            })
        );
    }

    #[test]
    fn recovering_keeps_later_declarations() {
        let tokens = tokens(&[
            (TokenKind::Identifier, "a"),
            (TokenKind::Operator, "=="),
            (TokenKind::Number, "1"),
            (TokenKind::Identifier, "b"),
            (TokenKind::Identifier, "Int"),
        ]);

        let (tree, errors) = parse_recovering("tokens.ist", &tokens, 10);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position().offset(), 2);
        assert_eq!(tree.declarations().len(), 1);
        let var = tree.declarations()[0].as_var().unwrap();
        assert_eq!(var.name().value(), "b");
    }

    #[test]
    fn recovering_skips_runes_silently() {
        let tokens = tokens(&[
            (TokenKind::Rune, "@"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Identifier, "Int"),
            (TokenKind::Rune, "#"),
        ]);

        let (tree, errors) = parse_recovering("tokens.ist", &tokens, 10);

        assert!(errors.is_empty());
        assert_eq!(tree.declarations().len(), 1);
    }

    #[test]
    fn recovering_drops_declarations_cut_by_a_rune() {
        let tokens = tokens(&[
            (TokenKind::Identifier, "x"),
            (TokenKind::Rune, "@"),
            (TokenKind::Identifier, "y"),
            (TokenKind::Identifier, "Int"),
        ]);

        let (tree, errors) = parse_recovering("tokens.ist", &tokens, 10);

        assert!(errors.is_empty());
        assert_eq!(tree.declarations().len(), 1);
        assert_eq!(tree.declarations()[0].as_var().unwrap().name().value(), "y");
    }

    #[test]
    fn recovering_resynchronizes_at_a_name_and_type() {
        let tokens = tokens(&[
            (TokenKind::Number, "1"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Operator, "="),
            (TokenKind::Number, "2"),
            (TokenKind::Identifier, "y"),
            (TokenKind::Identifier, "Int"),
            (TokenKind::Operator, "="),
            (TokenKind::Number, "3"),
        ]);

        let (tree, errors) = parse_recovering("tokens.ist", &tokens, 10);

        // `x = 2` has no type and can't start a declaration, so it is skipped with the `1`
        assert_eq!(errors.len(), 1);
        assert_eq!(tree.declarations().len(), 1);
        let var = tree.declarations()[0].as_var().unwrap();
        assert_eq!(var.name().value(), "y");
        assert!(var.value().is_some());
    }

    #[test]
    fn recovering_stops_at_the_error_limit() {
        let tokens = tokens(&[
            (TokenKind::Number, "1"),
            (TokenKind::Identifier, "a"),
            (TokenKind::Identifier, "b"),
            (TokenKind::Identifier, "c"),
            (TokenKind::Number, "2"),
            (TokenKind::Identifier, "d"),
            (TokenKind::Identifier, "e"),
            (TokenKind::Number, "3"),
            (TokenKind::Identifier, "f"),
            (TokenKind::Identifier, "Int"),
        ]);

        // `c 2` fails before `d e` is reached
        let (tree, errors) = parse_recovering("tokens.ist", &tokens, 2);
        assert_eq!(errors.len(), 2);
        assert_eq!(tree.declarations().len(), 1);

        let (tree, errors) = parse_recovering("tokens.ist", &tokens, 10);
        assert_eq!(errors.len(), 3);
        assert_eq!(tree.declarations().len(), 3);
    }
}
