use std::{cmp::Ordering, fmt, ops::Range, sync::Arc};

use codespan_reporting::diagnostic::Label;

/// A point in a source unit.
///
/// `line` and `column` are 1-based and count characters. `offset` is the byte offset into the
/// text, kept so spans can be handed to `codespan` without re-walking the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The first character of any source unit.
    pub const fn origin() -> Self {
        Self::new(1, 1, 0)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.column, self.offset).cmp(&(other.line, other.column, other.offset))
    }
}

/// A [`Location`] together with the name of the source unit it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    name: Arc<str>,
    location: Location,
}

impl Position {
    pub fn new(name: Arc<str>, location: Location) -> Self {
        Self { name, location }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// A zero width span sitting on this position.
    pub fn to_span(&self) -> Span {
        Span::new(self, self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.line(), self.column())
    }
}

/// A half-open range of text inside one source unit.
///
/// Through [`Span::primary_label`] a span turns directly into a `codespan` label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    name: Arc<str>,
    start: Location,
    end: Location,
}

impl Span {
    /// Creates a new Span between two positions of the same source unit.
    pub fn new(start: &Position, end: &Position) -> Self {
        debug_assert_eq!(start.name, end.name, "Span ends must name the same source");
        Self::from_locations(start.name.clone(), start.location, end.location)
    }

    pub fn from_locations(name: Arc<str>, start: Location, end: Location) -> Self {
        debug_assert!(start <= end, "Span start must be before span end");
        Self { name, start, end }
    }

    /// Creates a new Span that goes from start of s1 to the end of s2
    ///
    /// Note: s1.end and s2.start do not have to be the same
    pub fn merge(s1: &Self, s2: &Self) -> Self {
        debug_assert_eq!(s1.name, s2.name);
        Self::from_locations(s1.name.clone(), s1.start, s2.end)
    }

    /// Creates a new Label from a span.
    pub fn primary_label(&self, message: impl Into<String>) -> Label<()> {
        Label::primary((), self.range()).with_message(message)
    }

    /// Returns the byte range start..end
    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Position {
        Position::new(self.name.clone(), self.start)
    }

    pub fn end(&self) -> Position {
        Position::new(self.name.clone(), self.end)
    }

    pub fn start_location(&self) -> Location {
        self.start
    }

    pub fn end_location(&self) -> Location {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{}",
            self.name, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Anything that knows where in the source it came from.
pub trait Spanned {
    fn span(&self) -> &Span;
}

impl Spanned for Span {
    fn span(&self) -> &Span {
        self
    }
}
