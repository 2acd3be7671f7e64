use std::fmt;

use logos::Logos;

use super::{span::Spanned, Span};

/// The kinds of token handed from the scanner to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Marks a run the scanner could not recognize. Only produced by a recovering scan.
    Rune,
    Identifier,
    Number,
    String,
    Operator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TokenKind::Rune => "rune",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
        })
    }
}

/// A token with its text and location.
///
/// The text is owned, and is exactly the slice of source the span covers (string tokens keep
/// their quotes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the token is of `kind` and, if given, has exactly `text`.
    pub fn is(&self, kind: TokenKind, text: Option<&str>) -> bool {
        self.kind == kind && text.map_or(true, |text| self.text == text)
    }
}

impl Spanned for Token {
    fn span(&self) -> &Span {
        &self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.text)
    }
}

/// Raw lexemes recognized by `logos`.
///
/// The scanner walks its cursor over each run and decides what becomes a [`Token`]. Every rule
/// starts on a different set of characters, so the longest match is also the first rule that
/// applies.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    #[regex(r"\s+")]
    Whitespace,

    #[regex(r"[\p{L}_][\p{L}0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Number,

    // A backslash escapes whatever follows it, including a quote
    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    String,

    // Runs to the end of input when the closing quote never comes
    #[regex(r#""([^"\\]|\\[\s\S])*\\?"#)]
    UnterminatedString,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    Operator,

    #[regex(r"[+\-*/=<>!]")]
    LoneOperator,
}

impl Lexeme {
    /// The token kind a successfully recognized lexeme is emitted as.
    pub(crate) fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Lexeme::Identifier => Some(TokenKind::Identifier),
            Lexeme::Number => Some(TokenKind::Number),
            Lexeme::String => Some(TokenKind::String),
            Lexeme::Operator => Some(TokenKind::Operator),
            Lexeme::Whitespace | Lexeme::UnterminatedString | Lexeme::LoneOperator => None,
        }
    }
}
