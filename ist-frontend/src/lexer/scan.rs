//! The scanner: turns the text of one source unit into positioned tokens.
//!
//! [`logos`](https://crates.io/crates/logos) classifies each run of characters. The scanner then
//! walks a cursor over that run one character at a time, which keeps the running line and column,
//! records line starts as newlines go by, and cuts the token text between the token-start and
//! current offsets.
use std::{ops::Range, sync::Arc, time::Instant};

use logos::Logos;
use tracing::{debug, trace};

use super::{
    token::Lexeme, LineTable, Location, Position, ScanError, SourceUnit, Span, Token, TokenKind,
};

/// Scans `text` and returns its tokens, stopping at the first error.
pub fn scan(text: &str, name: impl Into<Arc<str>>) -> Result<Vec<Token>, ScanError> {
    lex(name, text).map(SourceUnit::into_tokens)
}

/// Scans `text` into a complete [`SourceUnit`], stopping at the first error.
pub fn lex(name: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Result<SourceUnit, ScanError> {
    let text = text.into();
    let mut scanner = Scanner::new(name.into(), &text, Mode::Fatal);
    scanner.run()?;
    Ok(scanner.finish(text.clone()))
}

/// Scans `text` to the end, turning every failure into a [`TokenKind::Rune`] token and an error.
pub fn lex_recovering(
    name: impl Into<Arc<str>>,
    text: impl Into<Arc<str>>,
) -> (SourceUnit, Vec<ScanError>) {
    let text = text.into();
    let mut scanner = Scanner::new(name.into(), &text, Mode::Recover);

    // A recovering scan records errors instead of returning them
    let result = scanner.run();
    debug_assert!(result.is_ok());

    let errors = std::mem::take(&mut scanner.errors);
    (scanner.finish(text.clone()), errors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Fatal,
    Recover,
}

struct Scanner<'s> {
    name: Arc<str>,
    text: &'s str,
    mode: Mode,

    // byte offsets of the token being built and of the cursor
    token_start: usize,
    current: usize,

    // running positions at the same two offsets
    token_start_pos: Location,
    current_pos: Location,

    lines: LineTable,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
}

impl<'s> Scanner<'s> {
    fn new(name: Arc<str>, text: &'s str, mode: Mode) -> Self {
        Self {
            name,
            text,
            mode,
            token_start: 0,
            current: 0,
            token_start_pos: Location::origin(),
            current_pos: Location::origin(),
            lines: LineTable::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), ScanError> {
        let start = Instant::now();

        for (lexeme, range) in Lexeme::lexer(self.text).spanned() {
            debug_assert_eq!(range.start, self.current, "lexemes must be contiguous");

            match lexeme {
                Ok(Lexeme::Whitespace) => {
                    self.consume_to(range.end);
                    self.flush();
                }
                Ok(Lexeme::UnterminatedString) => {
                    let quote = self.position();
                    self.consume_to(range.end);
                    self.fail(ScanError::UnterminatedString(quote))?;
                }
                Ok(Lexeme::LoneOperator) => {
                    let at = self.position();
                    let c = self.consume_run(range);
                    self.fail(ScanError::MalformedOperator(at, c))?;
                }
                Ok(lexeme) => {
                    self.consume_to(range.end);
                    match lexeme.token_kind() {
                        Some(kind) => self.push_token(kind),
                        None => unreachable!("{lexeme:?} is handled above"),
                    }
                }
                Err(()) => {
                    let at = self.position();
                    let c = self.consume_run(range);
                    self.fail(ScanError::UnrecognizedCharacter(at, c))?;
                }
            }
        }

        // Final line boundary marker
        self.lines.finish(self.current);

        debug!(
            source = %self.name,
            tokens = self.tokens.len(),
            lines = self.lines.len(),
            errors = self.errors.len(),
            elapsed = ?start.elapsed(),
            "scanned source unit"
        );

        Ok(())
    }

    fn finish(self, text: Arc<str>) -> SourceUnit {
        SourceUnit::new(self.name, text, self.lines, self.tokens)
    }

    /// Looks `distance` characters past the cursor without moving it.
    fn look(&self, distance: usize) -> Option<char> {
        self.text[self.current..].chars().nth(distance)
    }

    /// Consumes one character, moving the running position and recording new lines.
    fn consume(&mut self) -> Option<char> {
        let c = self.look(0)?;
        self.current += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
            self.lines.push_line(self.current);
        } else {
            self.current_pos.column += 1;
        }
        self.current_pos.offset = self.current;

        Some(c)
    }

    fn consume_to(&mut self, end: usize) {
        while self.current < end {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// Consumes a failed run and returns its first character.
    fn consume_run(&mut self, range: Range<usize>) -> char {
        // An empty run would stall the cursor; always take at least one character
        let first = self.consume().unwrap_or(char::REPLACEMENT_CHARACTER);
        self.consume_to(range.end);
        first
    }

    fn position(&self) -> Position {
        Position::new(self.name.clone(), self.current_pos)
    }

    /// Emits the text between the token start and the cursor as a token.
    fn push_token(&mut self, kind: TokenKind) {
        let span = Span::from_locations(self.name.clone(), self.token_start_pos, self.current_pos);
        let token = Token::new(kind, &self.text[self.token_start..self.current], span);

        trace!(
            "[{:4}:{:4}:{:>10}] `{}`",
            self.token_start,
            self.current,
            token.kind(),
            token.text()
        );

        self.tokens.push(token);
        self.flush();
    }

    /// Starts the next token at the cursor.
    fn flush(&mut self) {
        self.token_start = self.current;
        self.token_start_pos = self.current_pos;
    }

    /// Reports an error over the run since the token start.
    ///
    /// Fatal scans stop here. Recovering scans keep the run as a [`TokenKind::Rune`] token.
    fn fail(&mut self, error: ScanError) -> Result<(), ScanError> {
        match self.mode {
            Mode::Fatal => Err(error),
            Mode::Recover => {
                debug!("recovering from scan error: {error}");
                self.errors.push(error);
                self.push_token(TokenKind::Rune);
                Ok(())
            }
        }
    }
}
