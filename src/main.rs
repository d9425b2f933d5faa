//! cgm - coupling graph metrics CLI

use anyhow::Result;
use cgm::cli;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default log level for `-v <verbosity>`. `RUST_LOG` takes precedence.
fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbosity)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
