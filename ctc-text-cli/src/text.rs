//! Text subcommands: normalize, encode and decode.

use crate::config::{AlphabetArgs, AlphabetConfig};
use ctc_text::TextCodec;
use eyre::Result;

/// CLI arguments for text normalization.
#[derive(clap::Args, Debug)]
pub struct NormalizeArgs {
    /// Text to normalize
    pub text: String,
}

pub fn normalize(args: NormalizeArgs) -> Result<String> {
    Ok(ctc_text::normalize(&args.text))
}

/// CLI arguments for text encoding.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// Text to encode (normalized first)
    pub text: String,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,
}

pub fn encode(args: EncodeArgs) -> Result<String> {
    let config = AlphabetConfig::try_from(args.alphabet)?;
    let codec = TextCodec::new(config.alphabet);

    let encoded = codec.encode(&args.text)?;
    tracing::debug!(len = encoded.len(), "encoded text");

    Ok(join_indices(encoded.as_slice()))
}

/// CLI arguments for index decoding.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    /// Alphabet indices
    #[arg(required = true, num_args = 1..)]
    pub indices: Vec<usize>,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,
}

pub fn decode(args: DecodeArgs) -> Result<String> {
    let config = AlphabetConfig::try_from(args.alphabet)?;
    let codec = TextCodec::new(config.alphabet);

    Ok(codec.decode(&args.indices)?)
}

pub(crate) fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
