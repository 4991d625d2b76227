//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;

#[derive(Debug, Parser)]
#[command(name = "ctc-text")]
#[command(about = "Text encoding and CTC decoding tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize text the way the encoder sees it
    Normalize(crate::text::NormalizeArgs),

    /// Encode text into alphabet indices
    Encode(crate::text::EncodeArgs),

    /// Decode alphabet indices into text, without CTC collapsing
    Decode(crate::text::DecodeArgs),

    /// Collapse a raw CTC index path into text
    Collapse(crate::greedy::CollapseArgs),

    /// Greedy CTC decoding of a probability matrix
    Greedy(crate::greedy::Args),

    /// Beam search CTC decoding of a probability matrix
    Beam(crate::beam::Args),
}

/// Execute CLI command - separated for testing.
///
/// Returns what the binary prints to stdout.
pub fn run_cli(cli: Cli) -> Result<String> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Normalize(args) => crate::text::normalize(args),
        Commands::Encode(args) => crate::text::encode(args),
        Commands::Decode(args) => crate::text::decode(args),
        Commands::Collapse(args) => crate::greedy::collapse(args),
        Commands::Greedy(args) => crate::greedy::execute(args.try_into()?),
        Commands::Beam(args) => crate::beam::execute(args.try_into()?),
    }
}
