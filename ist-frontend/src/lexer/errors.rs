use codespan_reporting::diagnostic::Diagnostic;
use colored::Colorize;
use thiserror::Error;

use crate::Position;

/// Errors that stop (or, when recovering, interrupt) a scan.
///
/// Each error carries the position where the offending run began.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("{0}: unterminated string literal")]
    UnterminatedString(Position),
    #[error("{0}: unrecognized character {1:?}")]
    UnrecognizedCharacter(Position, char),
    #[error("{0}: unexpected operator {1:?}")]
    MalformedOperator(Position, char),
}

impl ScanError {
    pub fn code(&self) -> &'static str {
        use ScanError::*;

        match self {
            UnterminatedString(_) => "E001",
            UnrecognizedCharacter(..) => "E002",
            MalformedOperator(..) => "E003",
        }
    }

    pub fn message(&self) -> &'static str {
        use ScanError::*;

        match self {
            UnterminatedString(_) => "Unterminated string literal",
            UnrecognizedCharacter(..) => "Unrecognized character",
            MalformedOperator(..) => "Unexpected operator",
        }
    }

    pub fn position(&self) -> &Position {
        use ScanError::*;

        match self {
            UnterminatedString(position)
            | UnrecognizedCharacter(position, _)
            | MalformedOperator(position, _) => position,
        }
    }
}

impl From<ScanError> for Diagnostic<()> {
    fn from(err: ScanError) -> Self {
        use ScanError::*;

        // message & code are handled by the respective methods
        match &err {
            UnterminatedString(position) => Diagnostic::error().with_labels(vec![position
                .to_span()
                .primary_label(format!(
                    "This string is never closed, add a {} before the end of the file",
                    "\"".yellow()
                ))]),
            UnrecognizedCharacter(position, c) => Diagnostic::error().with_labels(vec![
                char_label(position, *c, "This character does not start any token"),
            ]),
            MalformedOperator(position, c) => Diagnostic::error()
                .with_labels(vec![char_label(
                    position,
                    *c,
                    "Only comparison operators are supported",
                )])
                .with_notes(vec![format!(
                    "Supported operators are {}, {}, {} and {}",
                    "==".yellow(),
                    "!=".yellow(),
                    "<=".yellow(),
                    ">=".yellow()
                )]),
        }
        .with_message(err.message())
        .with_code(err.code())
    }
}

fn char_label(
    position: &Position,
    c: char,
    message: &str,
) -> codespan_reporting::diagnostic::Label<()> {
    let start = position.offset();
    codespan_reporting::diagnostic::Label::primary((), start..start + c.len_utf8())
        .with_message(message)
}
