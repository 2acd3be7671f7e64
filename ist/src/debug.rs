use std::{fs, path::Path, sync::Arc};

use codespan_reporting::{
    diagnostic::Diagnostic,
    files::{Files, SimpleFile},
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use colored::Colorize;
use eyre::{eyre, WrapErr};
use ist_frontend::{lex_recovering, Config, Frontend, Outcome, SourceUnit, Spanned, Token, TokenKind};
use tracing::debug;

fn read(path: &Path) -> eyre::Result<(Arc<str>, Arc<str>)> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read `{}`", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "read source file");

    Ok((path.display().to_string().into(), text.into()))
}

/// Renders diagnostics to stderr
fn emit<'f, F>(files: &'f F, diagnostics: impl IntoIterator<Item = Diagnostic<()>>) -> eyre::Result<()>
where
    F: Files<'f, FileId = ()>,
{
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();

    for diagnostic in diagnostics {
        term::emit(&mut writer.lock(), &config, files, &diagnostic)?;
    }

    Ok(())
}

/// Scans a file and prints its tokens, reporting every scan error on the way
pub fn lex(path: &Path, debug: bool) -> eyre::Result<()> {
    let (name, text) = read(path)?;
    let (unit, errors) = lex_recovering(name, text);
    let count = errors.len();

    emit(&unit, errors.into_iter().map(Diagnostic::from))?;

    if debug {
        print!("{}", debug_print(unit.tokens()));
    } else {
        println!("{}", pretty_print(&unit));
    }

    match count {
        0 => Ok(()),
        n => Err(eyre!("{n} scan error(s) in `{}`", unit.name())),
    }
}

/// Scans and parses a file and prints the parse tree
pub fn parse(path: &Path, config: Config) -> eyre::Result<()> {
    let (name, text) = read(path)?;

    match Frontend::new(config).run(name.clone(), text.clone()) {
        Outcome::Complete((_, tree)) => {
            println!("{tree:#?}");
            Ok(())
        }
        Outcome::Partial((unit, tree), errors) => {
            let count = errors.len();
            emit(&unit, errors.into_iter().map(Diagnostic::from))?;
            println!("{tree:#?}");
            Err(eyre!("{count} error(s) in `{name}`"))
        }
        Outcome::Failed(error) => {
            // The unit never finished scanning, render against the raw text instead
            let file = SimpleFile::new(name.clone(), text);
            emit(&file, [Diagnostic::from(error)])?;
            Err(eyre!("could not parse `{name}`"))
        }
    }
}

/// Prints the source back with each token colored by kind
fn pretty_print(unit: &SourceUnit) -> String {
    let text = unit.text();
    let mut out = String::new();
    let mut last = 0;

    for token in unit.tokens() {
        let range = token.span().range();
        // Whitespace between tokens is kept as is
        out.push_str(&text[last..range.start]);

        let colored = match token.kind() {
            TokenKind::Rune => token.text().red().underline(),
            TokenKind::Identifier => token.text().cyan(),
            TokenKind::Number => token.text().purple(),
            TokenKind::String => token.text().green(),
            TokenKind::Operator => token.text().yellow(),
        };
        out.push_str(&colored.to_string());

        last = range.end;
    }

    out.push_str(&text[last..]);
    out
}

fn debug_print(tokens: &[Token]) -> String {
    let mut out = String::new();

    for token in tokens {
        let start = token.span().start();
        out.push_str(&format!(
            "{:>4}:{:<4} |{}:{}|\n",
            start.line(),
            start.column(),
            token.kind(),
            token.text()
        ));
    }

    out
}
