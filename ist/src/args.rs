//! Command line arguments.
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use ist_frontend::Config;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Scans and parses ist source files")]
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the tokens of a file
    Lex {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// One token per line, with its location
        #[arg(short, long)]
        debug: bool,
    },
    /// Print the parse tree of a file
    Parse {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Keep going after errors
        #[arg(short, long)]
        recover: bool,

        /// Stop recovering after this many errors
        #[arg(short, long, default_value_t = Config::DEFAULT_ERROR_LIMIT)]
        error_limit: usize,

        /// Log how long scanning and parsing take
        #[arg(short, long)]
        timings: bool,
    },
}

/// `-v[v]` and `-q[q]` select how much is logged
#[derive(Debug, Clone, Copy, Args)]
pub struct LoggingArgs {
    #[arg(short = 'v', action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    verbose: u8,
    #[arg(short = 'q', action = ArgAction::Count, global = true, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    pub fn log_level_filter(&self) -> LevelFilter {
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
