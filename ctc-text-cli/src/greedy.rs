//! Greedy CTC subcommands: collapse a raw path or decode a matrix.

use crate::config::{AlphabetArgs, AlphabetConfig, MatrixArgs};
use ctc_text::{GreedyCtcDecoder, ProbabilityMatrix};
use eyre::Result;
use std::time::Instant;

/// CLI arguments for collapsing a raw index path.
#[derive(clap::Args, Debug)]
pub struct CollapseArgs {
    /// Raw per-step indices, blanks included
    #[arg(required = true, num_args = 1..)]
    pub path: Vec<usize>,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,
}

pub fn collapse(args: CollapseArgs) -> Result<String> {
    let config = AlphabetConfig::try_from(args.alphabet)?;
    let decoder = GreedyCtcDecoder::new(config.alphabet)?;

    Ok(decoder.decode(&args.path)?)
}

/// CLI arguments for greedy matrix decoding.
#[derive(clap::Args, Debug)]
pub struct Args {
    #[command(flatten)]
    pub matrix: MatrixArgs,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,
}

/// Resolved configuration for greedy decoding.
#[derive(Debug)]
pub struct Config {
    pub decoder: GreedyCtcDecoder,
    pub matrix: ProbabilityMatrix,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let alphabet = AlphabetConfig::try_from(args.alphabet)?.alphabet;

        Ok(Self {
            decoder: GreedyCtcDecoder::new(alphabet)?,
            matrix: args.matrix.try_into()?,
        })
    }
}

pub fn execute(config: Config) -> Result<String> {
    let s = Instant::now();

    let result = config.decoder.decode_matrix(&config.matrix)?;

    tracing::info!(
        duration = %crate::format_secs(s.elapsed().as_secs_f32()),
        score = result.score,
        "greedy decoding completed"
    );

    Ok(result.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_with_default_alphabet() {
        // x x - x  with x = 24, blank = 27
        let output = collapse(CollapseArgs {
            path: vec![24, 24, 27, 24],
            alphabet: AlphabetArgs::default(),
        })
        .unwrap();

        assert_eq!(output, "xx");
    }

    #[test]
    fn collapse_rejects_out_of_range() {
        let err = collapse(CollapseArgs {
            path: vec![1, 28],
            alphabet: AlphabetArgs::default(),
        })
        .unwrap_err();

        assert!(err.to_string().contains("index 28 out of range"));
    }
}
