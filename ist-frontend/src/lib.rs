/// Run configuration for the [`Frontend`] driver.
mod config;
/// Composes scanning and parsing, with or without error recovery.
mod driver;
/// The lexer turns the text of a source unit into positioned tokens.
mod lexer;
/// The parser transforms a token sequence into a parse tree.
mod parser;

pub use config::Config;
pub use driver::{Frontend, FrontendError, Outcome};
pub use lexer::{
    lex, lex_recovering, scan, LineTable, Location, Position, ScanError, SourceUnit, Span,
    Spanned, Token, TokenKind,
};
pub use parser::{
    ast,
    errors::{Expectations, ParseError},
    number::{interpret, NumberError},
    parse, parse_recovering, parse_tokens,
};

#[cfg(test)]
mod test {
    use std::thread;

    use num::BigInt;

    use crate::{ast::ParseTree, Config, Frontend, Outcome, SourceUnit, Token};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn units_can_cross_threads() {
        assert_send_sync::<SourceUnit>();
        assert_send_sync::<Token>();
        assert_send_sync::<ParseTree>();
        assert_send_sync::<Frontend>();
    }

    #[test]
    fn independent_units_on_separate_threads() {
        let frontend = Frontend::new(Config::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let frontend = frontend.clone();
                thread::spawn(move || {
                    let text = format!("value_{i} Int\n  other_{i} Float");
                    frontend.run(format!("unit_{i}.ist"), text)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            match handle.join().unwrap() {
                Outcome::Complete((unit, tree)) => {
                    assert_eq!(unit.name(), format!("unit_{i}.ist"));
                    assert_eq!(tree.source(), unit.name());
                    assert_eq!(tree.declarations().len(), 2);
                    let first = tree.declarations()[0].as_var().unwrap();
                    assert_eq!(first.name().value(), format!("value_{i}"));
                }
                other => panic!("Unit {i} did not parse: {other:?}"),
            }
        }
    }

    #[test]
    fn scanned_tokens_parse() {
        let unit = crate::lex("lib.ist", "count Int").unwrap();
        let tree = crate::parse(&unit).unwrap();

        assert_eq!(tree.declarations().len(), 1);
        assert_eq!(
            crate::interpret("0x_ff"),
            Ok(crate::ast::NumberValue::Int(BigInt::from(255)))
        );
    }
}
