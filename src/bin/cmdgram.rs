use clap::Parser;

use cmdgram::cli::{self, args::CmdgramArgs};

fn main() -> miette::Result<()> {
    setup_logging();
    cli::run(CmdgramArgs::parse())
}

/// Logs go to stderr, filtered by `CMDGRAM_LOG` (default `warn`).
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("CMDGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
