mod errors;
mod scan;
mod source;
mod span;
mod token;

pub use errors::ScanError;
pub use scan::{lex, lex_recovering, scan};
pub use source::{LineTable, SourceUnit};
pub use span::{Location, Position, Span, Spanned};
pub use token::{Token, TokenKind};
