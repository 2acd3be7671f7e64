//! Runs the scanner and the parser over one source unit under a [`Config`].
use std::{slice, sync::Arc, time::Instant};

use codespan_reporting::diagnostic::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    ast::ParseTree, lex, lex_recovering, parse, parse_recovering, Config, ParseError, Position,
    ScanError, SourceUnit,
};

/// The result of work that may stop early or finish with errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E> {
    /// Finished without errors
    Complete(T),
    /// Finished, but parts of the input were skipped because of the errors
    Partial(T, Vec<E>),
    /// Stopped at the error
    Failed(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    /// The finished value, if there is one
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Complete(value) | Outcome::Partial(value, _) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn errors(&self) -> &[E] {
        match self {
            Outcome::Complete(_) => &[],
            Outcome::Partial(_, errors) => errors,
            Outcome::Failed(error) => slice::from_ref(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FrontendError {
    pub fn code(&self) -> &'static str {
        match self {
            FrontendError::Scan(error) => error.code(),
            FrontendError::Parse(error) => error.code(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FrontendError::Scan(error) => error.message(),
            FrontendError::Parse(error) => error.message(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            FrontendError::Scan(error) => error.position().clone(),
            FrontendError::Parse(error) => error.position(),
        }
    }
}

impl From<FrontendError> for Diagnostic<()> {
    fn from(error: FrontendError) -> Self {
        match error {
            FrontendError::Scan(error) => error.into(),
            FrontendError::Parse(error) => error.into(),
        }
    }
}

/// Scans and parses source units.
///
/// A `Frontend` holds no state between runs, so one value can be shared by threads processing
/// different units.
#[derive(Debug, Clone, Default)]
pub struct Frontend {
    config: Config,
}

impl Frontend {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(
        &self,
        name: impl Into<Arc<str>>,
        text: impl Into<Arc<str>>,
    ) -> Outcome<(SourceUnit, ParseTree), FrontendError> {
        let name = name.into();
        debug!(source = %name, recover = self.config.recover, "running front end");

        if self.config.recover {
            self.run_recovering(name, text.into())
        } else {
            self.run_fatal(name, text.into())
        }
    }

    fn run_fatal(
        &self,
        name: Arc<str>,
        text: Arc<str>,
    ) -> Outcome<(SourceUnit, ParseTree), FrontendError> {
        let start = Instant::now();
        let unit = match lex(name, text) {
            Ok(unit) => unit,
            Err(error) => return Outcome::Failed(error.into()),
        };
        self.timing("scan", unit.name(), start);

        let start = Instant::now();
        let tree = match parse(&unit) {
            Ok(tree) => tree,
            Err(error) => return Outcome::Failed(error.into()),
        };
        self.timing("parse", unit.name(), start);

        Outcome::Complete((unit, tree))
    }

    fn run_recovering(
        &self,
        name: Arc<str>,
        text: Arc<str>,
    ) -> Outcome<(SourceUnit, ParseTree), FrontendError> {
        let limit = self.config.error_limit;

        let start = Instant::now();
        let (unit, scan_errors) = lex_recovering(name, text);
        self.timing("scan", unit.name(), start);

        let mut errors: Vec<FrontendError> = scan_errors
            .into_iter()
            .take(limit)
            .map(FrontendError::from)
            .collect();

        let tree = if errors.len() < limit {
            let start = Instant::now();
            let (tree, parse_errors) =
                parse_recovering(unit.shared_name(), unit.tokens(), limit - errors.len());
            self.timing("parse", unit.name(), start);

            errors.extend(parse_errors.into_iter().map(FrontendError::from));
            tree
        } else {
            debug!(limit, "error limit reached while scanning, not parsing");
            ParseTree::new(unit.shared_name())
        };

        if errors.is_empty() {
            Outcome::Complete((unit, tree))
        } else {
            Outcome::Partial((unit, tree), errors)
        }
    }

    fn timing(&self, phase: &str, source: &str, start: Instant) {
        if self.config.timings {
            info!(source, elapsed = ?start.elapsed(), "{phase} finished");
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::{Expectations, TokenKind};

    fn recovering() -> Frontend {
        Frontend::new(Config::new(true, Config::DEFAULT_ERROR_LIMIT, true))
    }

    #[test]
    fn complete_run() {
        let outcome = Frontend::default().run("driver.ist", "x Int\ny Float");

        assert!(outcome.is_complete());
        assert!(outcome.errors().is_empty());
        let (unit, tree) = outcome.value().unwrap();
        assert_eq!(unit.tokens().len(), 4);
        assert_eq!(tree.declarations().len(), 2);
    }

    #[test]
    fn fatal_scan_error() {
        let outcome = Frontend::default().run("driver.ist", "x @ Int");

        assert!(outcome.value().is_none());
        match outcome.errors() {
            [FrontendError::Scan(ScanError::UnrecognizedCharacter(at, '@'))] => {
                assert_eq!(at.offset(), 2);
            }
            other => panic!("Expected one scan error, got {other:?}"),
        }
    }

    #[test]
    fn fatal_parse_error() {
        let outcome = Frontend::default().run("driver.ist", "x Int\n42");

        match outcome {
            Outcome::Failed(FrontendError::Parse(ParseError::UnexpectedToken {
                found,
                expected,
            })) => {
                assert_eq!(found.kind(), TokenKind::Number);
                assert_eq!(expected, Expectations::Production("a declaration"));
            }
            other => panic!("Expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn recovering_run_reports_every_phase() {
        let outcome = recovering().run("driver.ist", "x @\ny Int\n\"open");

        let (unit, tree) = outcome.value().unwrap();
        let kinds: Vec<_> = unit.tokens().iter().map(|token| token.kind()).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Identifier,
                TokenKind::Rune,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Rune,
            ]
        );

        // `x` stops at the rune, which only the scanner reports
        let codes: Vec<_> = outcome.errors().iter().map(FrontendError::code).collect();
        assert_eq!(codes, ["E002", "E001"]);
        assert_eq!(tree.declarations().len(), 1);
        assert_eq!(tree.declarations()[0].as_var().unwrap().name().value(), "y");
    }

    #[test]
    fn recovering_keeps_the_good_declarations() {
        let outcome = recovering().run("driver.ist", "a 1\nb Int\nc == 2\nd Float");

        let (_, tree) = outcome.value().unwrap();
        let names: Vec<_> = tree
            .declarations()
            .iter()
            .map(|decl| decl.as_var().unwrap().name().value())
            .collect();
        assert_eq!(names, ["b", "d"]);
        assert_eq!(outcome.errors().len(), 2);
    }

    #[test]
    fn error_limit_covers_scan_errors() {
        let frontend = Frontend::new(Config::new(true, 2, false));
        let outcome = frontend.run("driver.ist", "@ # $ x");

        assert_eq!(outcome.errors().len(), 2);
        let (_, tree) = outcome.value().unwrap();
        assert!(tree.declarations().is_empty());
    }

    #[test]
    fn diagnostics_carry_codes() {
        let outcome = Frontend::default().run("driver.ist", "\"open");
        let error = outcome.errors()[0].clone();

        assert_eq!(error.code(), "E001");
        assert_eq!(error.position().column(), 1);

        let diagnostic: Diagnostic<()> = error.into();
        assert_eq!(diagnostic.code.as_deref(), Some("E001"));
        assert_eq!(diagnostic.labels.len(), 1);
    }
}
