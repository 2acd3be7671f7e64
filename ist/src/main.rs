mod args;
mod debug;

use clap::Parser;
use ist_frontend::Config;
use tracing::{level_filters::LevelFilter, trace};
use tracing_subscriber::{layer::SubscriberExt, Layer, Registry};

use args::{Cli, Commands};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.logging.log_level_filter())?;
    trace!("starting ist with args: {cli:?}");

    match cli.command {
        Commands::Lex { file, debug } => debug::lex(&file, debug),
        Commands::Parse {
            file,
            recover,
            error_limit,
            timings,
        } => debug::parse(&file, Config::new(recover, error_limit, timings)),
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(level_filter),
    );

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
