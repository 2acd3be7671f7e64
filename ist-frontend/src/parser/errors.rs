use std::fmt;

use codespan_reporting::diagnostic::Diagnostic;
use colored::Colorize;
use thiserror::Error;

use crate::{Position, Spanned, Token, TokenKind};

use super::number::NumberError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{}: expected {expected} found {found}", found.span().start())]
    UnexpectedToken {
        found: Token,
        expected: Expectations,
    },
    #[error("{eof}: expected {expected} found end of file")]
    UnexpectedEof {
        eof: Position,
        expected: Expectations,
    },
    #[error("{}: malformed number `{}`: {error}", token.span().start(), token.text())]
    MalformedNumber { token: Token, error: NumberError },
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        use ParseError as PE;

        match self {
            PE::UnexpectedToken { .. } => "E100",
            PE::UnexpectedEof { .. } => "E101",
            PE::MalformedNumber { .. } => "E102",
        }
    }

    pub fn message(&self) -> &'static str {
        use ParseError as PE;

        match self {
            PE::UnexpectedToken { .. } => "Unexpected Token",
            PE::UnexpectedEof { .. } => "Unexpected End of File",
            PE::MalformedNumber { .. } => "Malformed Number",
        }
    }

    /// Where the error starts
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { found, .. } => found.span().start(),
            ParseError::UnexpectedEof { eof, .. } => eof.clone(),
            ParseError::MalformedNumber { token, .. } => token.span().start(),
        }
    }
}

impl From<ParseError> for Diagnostic<()> {
    fn from(error: ParseError) -> Self {
        let msg = error.message();
        let code = error.code();
        match error {
            ParseError::UnexpectedToken { found, expected } => {
                Diagnostic::error().with_labels(vec![found.span().primary_label(format!(
                    "Expected {} found {}",
                    expected,
                    found.kind()
                ))])
            }
            ParseError::UnexpectedEof { eof, expected } => Diagnostic::error().with_labels(vec![
                eof.to_span()
                    .primary_label(format!("Expected {} found EOF", expected)),
            ]),
            ParseError::MalformedNumber { token, error } => Diagnostic::error()
                .with_labels(vec![token.span().primary_label(error.to_string())])
                .with_notes(vec![format!(
                    "Numbers look like {}, {}, {} or {}",
                    "1_000".yellow(),
                    "0xff".yellow(),
                    "4e2".yellow(),
                    "1.5f".yellow()
                )]),
        }
        .with_message(msg.to_string())
        .with_code(code)
    }
}

// Expectations
#[derive(Debug, Clone)]
pub enum Expectations {
    /// Any token of this kind
    Kind(TokenKind),
    /// A token of this kind with exactly this text
    Text(TokenKind, &'static str),
    /// Whatever can start the named production
    Production(&'static str),
}

impl PartialEq for Expectations {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expectations::Kind(t), Expectations::Kind(o)) => t == o,
            (Expectations::Text(t, s), Expectations::Text(o, r)) => t == o && s == r,
            (Expectations::Production(p), Expectations::Production(o)) => p == o,
            _ => false,
        }
    }
}

impl Eq for Expectations {}

impl fmt::Display for Expectations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectations::Kind(kind) => write!(f, "{kind}"),
            Expectations::Text(kind, text) => write!(f, "{kind} `{text}`"),
            Expectations::Production(production) => f.write_str(production),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expectations_compare_by_variant() {
        assert_eq!(
            Expectations::Text(TokenKind::Operator, "="),
            Expectations::Text(TokenKind::Operator, "=")
        );
        assert_ne!(
            Expectations::Kind(TokenKind::Identifier),
            Expectations::Text(TokenKind::Identifier, "x")
        );
    }

    #[test]
    fn messages() {
        assert_eq!(Expectations::Kind(TokenKind::Number).to_string(), "number");
        assert_eq!(
            Expectations::Text(TokenKind::Operator, "=").to_string(),
            "operator `=`"
        );
        assert_eq!(
            Expectations::Production("a declaration").to_string(),
            "a declaration"
        );
    }
}
