//! Beam subcommand - rank hypotheses with CTC prefix beam search.

use crate::config::{AlphabetArgs, AlphabetConfig, BeamConfig, MatrixArgs};
use ctc_text::{BeamSearchCtcDecoder, CancelFlag, ProbabilityMatrix, ScoredText};
use eyre::Result;
use std::time::Instant;

/// CLI arguments for beam search decoding.
#[derive(clap::Args, Debug)]
pub struct Args {
    #[command(flatten)]
    pub matrix: MatrixArgs,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,

    #[command(flatten)]
    pub beam_config: BeamConfig,
}

/// Resolved configuration for beam search decoding.
#[derive(Debug)]
pub struct Config {
    pub decoder: BeamSearchCtcDecoder,
    pub matrix: ProbabilityMatrix,
    pub beam_config: BeamConfig,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let alphabet = AlphabetConfig::try_from(args.alphabet)?.alphabet;

        Ok(Self {
            decoder: BeamSearchCtcDecoder::new(alphabet)?,
            matrix: args.matrix.try_into()?,
            beam_config: args.beam_config,
        })
    }
}

pub fn execute(config: Config) -> Result<String> {
    execute_cancellable(config, &CancelFlag::new())
}

/// Run the search, stopping early once `cancel` is set.
pub fn execute_cancellable(config: Config, cancel: &CancelFlag) -> Result<String> {
    let BeamConfig { beam_size, top } = config.beam_config;

    tracing::info!(
        steps = config.matrix.num_steps(),
        beam_size,
        "beam search"
    );

    let s = Instant::now();

    let hypotheses = config
        .decoder
        .decode_cancellable(&config.matrix, beam_size, cancel)?;

    tracing::info!(
        duration = %crate::format_secs(s.elapsed().as_secs_f32()),
        hypotheses = hypotheses.len(),
        "beam search completed"
    );

    Ok(format_hypotheses(&hypotheses[..top.min(hypotheses.len())]))
}

/// One `score<TAB>text` line per hypothesis.
fn format_hypotheses(hypotheses: &[ScoredText]) -> String {
    hypotheses
        .iter()
        .map(|h| format!("{:.6}\t{}", h.score, h.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_score_and_text() {
        let lines = format_hypotheses(&[
            ScoredText {
                text: "ab".into(),
                score: -0.5,
            },
            ScoredText {
                text: String::new(),
                score: -1.25,
            },
        ]);

        assert_eq!(lines, "-0.500000\tab\n-1.250000\t");
    }

    #[test]
    fn default_beam_config() {
        let config = BeamConfig::default();

        assert_eq!(config.beam_size, 16);
        assert_eq!(config.top, 5);
    }
}
