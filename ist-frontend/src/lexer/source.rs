use std::{ops::Range, sync::Arc};

use codespan_reporting::files::{self, Files};

use super::{Location, Position, Token};

/// Byte offsets where each line of a source unit starts.
///
/// Built by the scanner while it consumes the text, finished with the boundary marker recorded at
/// end of input, and never changed after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    starts: Vec<usize>,
    end: usize,
}

impl LineTable {
    pub(crate) fn new() -> Self {
        Self {
            starts: vec![0],
            end: 0,
        }
    }

    /// Called after the scanner consumes a line terminator.
    pub(crate) fn push_line(&mut self, start: usize) {
        debug_assert!(self.starts.last().map_or(true, |&last| last < start));
        self.starts.push(start);
    }

    /// Records the final line boundary at end of input.
    pub(crate) fn finish(&mut self, end: usize) {
        self.end = end;
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// The final line boundary, equal to the length of the text.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of lines. A trailing newline starts one more (empty) line.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// The 0-based index of the line containing `offset`.
    pub fn line_index(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }

    /// Byte offset of the start of line `index`; one past the last line gives the end marker.
    pub fn line_start(&self, index: usize) -> Option<usize> {
        match index.cmp(&self.starts.len()) {
            std::cmp::Ordering::Less => Some(self.starts[index]),
            std::cmp::Ordering::Equal => Some(self.end),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn line_range(&self, index: usize) -> Option<Range<usize>> {
        Some(self.line_start(index)?..self.line_start(index + 1)?)
    }
}

/// One scanned input: its name, text, line table and tokens.
///
/// Produced in one piece by [`lex`](crate::lex) and read-only afterwards, so it can be sent to
/// another thread or shared freely.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    name: Arc<str>,
    text: Arc<str>,
    lines: LineTable,
    tokens: Vec<Token>,
}

impl SourceUnit {
    pub(crate) fn new(name: Arc<str>, text: Arc<str>, lines: LineTable, tokens: Vec<Token>) -> Self {
        Self {
            name,
            text,
            lines,
            tokens,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &LineTable {
        &self.lines
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Maps a byte offset back to its line and column.
    ///
    /// Returns `None` when the offset is past the end or not on a character boundary.
    pub fn position(&self, offset: usize) -> Option<Position> {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return None;
        }

        let index = self.lines.line_index(offset);
        let line_start = self.lines.starts()[index];
        let column = self.text[line_start..offset].chars().count() + 1;

        Some(Position::new(
            self.name.clone(),
            Location::new(index + 1, column, offset),
        ))
    }
}

impl<'a> Files<'a> for SourceUnit {
    type FileId = ();
    type Name = &'a str;
    type Source = &'a str;

    fn name(&'a self, _id: ()) -> Result<&'a str, files::Error> {
        Ok(&self.name)
    }

    fn source(&'a self, _id: ()) -> Result<&'a str, files::Error> {
        Ok(&self.text)
    }

    fn line_index(&'a self, _id: (), byte_index: usize) -> Result<usize, files::Error> {
        Ok(self.lines.line_index(byte_index))
    }

    fn line_range(&'a self, _id: (), line_index: usize) -> Result<Range<usize>, files::Error> {
        self.lines
            .line_range(line_index)
            .ok_or(files::Error::LineTooLarge {
                given: line_index,
                max: self.lines.len() - 1,
            })
    }
}

#[cfg(test)]
mod tests {
    use codespan_reporting::files::Files;

    use crate::lex;

    #[test]
    fn line_table_counts_newlines() {
        let unit = lex("lines.ist", "a\nbb\n\nccc").unwrap();

        assert_eq!(unit.lines().starts(), &[0, 2, 5, 6]);
        assert_eq!(unit.lines().end(), 9);
        assert_eq!(unit.lines().len(), 4);
        assert_eq!(unit.lines().line_range(1), Some(2..5));
        assert_eq!(unit.lines().line_range(3), Some(6..9));
        assert_eq!(unit.lines().line_range(4), None);
    }

    #[test]
    fn trailing_newline_opens_an_empty_line() {
        let unit = lex("lines.ist", "x\n").unwrap();

        assert_eq!(unit.lines().starts(), &[0, 2]);
        assert_eq!(unit.lines().end(), 2);
        assert_eq!(unit.lines().line_range(1), Some(2..2));
    }

    #[test]
    fn empty_text_has_one_line() {
        let unit = lex("empty.ist", "").unwrap();

        assert_eq!(unit.lines().starts(), &[0]);
        assert_eq!(unit.lines().end(), 0);
        assert!(unit.tokens().is_empty());
    }

    #[test]
    fn position_counts_characters() {
        let unit = lex("pos.ist", "größe\n  x").unwrap();

        let x = unit.position(10).unwrap();
        assert_eq!((x.line(), x.column()), (2, 3));

        // `ß` is two bytes wide but one column
        let e = unit.position(6).unwrap();
        assert_eq!((e.line(), e.column()), (1, 5));

        assert!(unit.position(3).is_none());
        assert!(unit.position(100).is_none());
    }

    #[test]
    fn position_agrees_with_token_spans() {
        let unit = lex("agree.ist", "alpha\n  beta \"g\"\n>= 42").unwrap();

        for token in unit.tokens() {
            let span = crate::Spanned::span(token);
            assert_eq!(unit.position(span.range().start), Some(span.start()));
            assert_eq!(unit.position(span.range().end), Some(span.end()));
        }
    }

    #[test]
    fn files_impl_uses_line_table() {
        let unit = lex("files.ist", "a\nbc").unwrap();

        assert_eq!(Files::name(&unit, ()).unwrap(), "files.ist");
        assert_eq!(unit.line_index((), 3).unwrap(), 1);
        assert_eq!(unit.line_range((), 1).unwrap(), 2..4);
        assert_eq!(unit.line_number((), 1).unwrap(), 2);
        assert_eq!(unit.column_number((), 1, 3).unwrap(), 2);
        assert!(unit.line_range((), 5).is_err());
    }
}
