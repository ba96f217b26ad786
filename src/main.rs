//! seqpipe CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use seqpipe::cli::{Cli, CommandDispatcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `--debug` forces DEBUG for this crate; otherwise `RUST_LOG` is
/// honored, falling back to INFO. Diagnostics go to stderr so the
/// scheduler captures them alongside tool stderr, separate from the
/// stage log file.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("seqpipe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seqpipe=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match CommandDispatcher::dispatch(&cli) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
