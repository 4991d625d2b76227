//! ctc-text: character codec and CTC decoding for speech recognition models.
//!
//! This crate translates between normalized text and the index sequences a
//! CTC-trained acoustic model consumes and produces.
//!
//! # Architecture
//!
//! - [`AlphabetMap`]: immutable character/index mapping, optionally with a blank
//! - [`TextCodec`]: normalizes and encodes text, decodes index sequences
//! - [`GreedyCtcDecoder`]: collapses the arg-max path of a [`ProbabilityMatrix`]
//! - [`BeamSearchCtcDecoder`]: prefix beam search returning ranked hypotheses
//!
//! An `AlphabetMap` is never mutated after construction; wrap it in an
//! [`std::sync::Arc`] and share it between the codec and decoders, across
//! threads if needed.
//!
//! # Quick Start
//!
//! ```ignore
//! use ctc_text::{AlphabetMap, BeamSearchCtcDecoder, ProbabilityMatrix, ScoreKind, TextCodec};
//! use std::sync::Arc;
//!
//! let alphabet = Arc::new(AlphabetMap::simple_ctc());
//!
//! // Reference path
//! let codec = TextCodec::new(alphabet.clone());
//! let targets = codec.encode("Hello, world!")?;
//!
//! // Inference path
//! let matrix = ProbabilityMatrix::new(model_output, ScoreKind::LogProbabilities)?;
//! let decoder = BeamSearchCtcDecoder::new(alphabet)?;
//! for hypothesis in decoder.decode(&matrix, 16)? {
//!     println!("{:.3} {}", hypothesis.score, hypothesis.text);
//! }
//! ```

pub mod alphabet;
pub mod cancel;
pub mod codec;
pub mod ctc;
pub mod error;
pub mod matrix;

pub use alphabet::{AlphabetMap, BLANK};
pub use cancel::CancelFlag;
pub use codec::{EncodedSequence, TextCodec, normalize};
pub use ctc::{BeamSearchCtcDecoder, GreedyCtcDecoder, ScoredText};
pub use error::{AlphabetError, CodecError, DecodeError, Error, Result};
pub use matrix::{ProbabilityMatrix, ScoreKind};
