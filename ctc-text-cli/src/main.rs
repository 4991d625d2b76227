//! ctc-text CLI - text encoding and CTC decoding tool

use clap::Parser;
use ctc_text_cli::cli::{Cli, run_cli};
use eyre::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let output = run_cli(Cli::parse())?;
    println!("{output}");

    Ok(())
}
