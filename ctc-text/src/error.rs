//! Error types for ctc-text organized by component.

use ndarray::ShapeError;
use ndarray_stats::errors::MinMaxError;
use std::collections::BTreeSet;
use thiserror::Error;

/// Error variants organized by component.
#[derive(Debug, Error)]
pub enum Error {
    /// Alphabet construction error
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),

    /// Text encoding or index lookup error
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// CTC decoding error
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Alphabet construction errors.
#[derive(Debug, Error)]
pub enum AlphabetError {
    /// No characters given
    #[error("invalid alphabet: no characters")]
    Empty,

    /// The same character was given more than once
    #[error("invalid alphabet: duplicate characters {}", format_chars(chars))]
    DuplicateCharacters { chars: BTreeSet<char> },

    /// Blank character is not a member of the alphabet
    #[error("missing blank symbol {blank:?} in alphabet")]
    MissingBlankSymbol { blank: char },

    /// Alphabet was built without a blank but is used for CTC decoding
    #[error("alphabet has no blank symbol")]
    NoBlankSymbol,
}

/// Encoding and index lookup errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text contains characters outside the alphabet
    #[error("cannot encode text {text:?}: unknown characters {}", format_chars(chars))]
    UnknownCharacters { text: String, chars: BTreeSet<char> },

    /// Index is not below the alphabet size
    #[error("index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
}

/// CTC decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Row width does not match the alphabet size
    #[error("invalid input shape: row {step} has {got} scores, expected {expected}")]
    InvalidInputShape {
        step: usize,
        expected: usize,
        got: usize,
    },

    /// Beam size below one
    #[error("invalid beam size: {0} (minimum 1)")]
    InvalidBeamSize(usize),

    /// NaN or `+inf` score, or a negative or infinite probability
    #[error("invalid score {value} at step {step}, class {class}")]
    InvalidScore { step: usize, class: usize, value: f32 },

    /// Search stopped through a cancel flag
    #[error("decoding cancelled at step {step}")]
    Cancelled { step: usize },

    /// ndarray shape error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// ndarray-stats min/max error
    #[error(transparent)]
    MinMax(#[from] MinMaxError),
}

/// Result type alias for ctc-text operations.
pub type Result<T> = std::result::Result<T, Error>;

fn format_chars(chars: &BTreeSet<char>) -> String {
    chars
        .iter()
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ShapeError → DecodeError → Error
impl From<ShapeError> for Error {
    fn from(e: ShapeError) -> Self {
        Error::Decode(DecodeError::Shape(e))
    }
}

// MinMaxError → DecodeError → Error
impl From<MinMaxError> for Error {
    fn from(e: MinMaxError) -> Self {
        Error::Decode(DecodeError::MinMax(e))
    }
}
