//! Best-path (greedy) CTC decoding.

use crate::alphabet::AlphabetMap;
use crate::ctc::{ScoredText, collapse};
use crate::error::{CodecError, Result};
use crate::matrix::ProbabilityMatrix;
use std::sync::Arc;

/// Greedy CTC decoder.
///
/// Takes the most likely class at every step, then drops blanks and merges
/// repeats that are adjacent in the raw path.
#[derive(Clone, Debug)]
pub struct GreedyCtcDecoder {
    alphabet: Arc<AlphabetMap>,
    blank: usize,
}

impl GreedyCtcDecoder {
    /// # Errors
    ///
    /// Returns [`crate::AlphabetError::NoBlankSymbol`] if `alphabet` has no blank.
    pub fn new(alphabet: Arc<AlphabetMap>) -> Result<Self> {
        let blank = alphabet.blank_index()?;
        Ok(Self { alphabet, blank })
    }

    pub fn alphabet(&self) -> &AlphabetMap {
        &self.alphabet
    }

    /// Collapse a raw index path into text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexOutOfRange`] if any index, blanks included,
    /// is outside the alphabet.
    pub fn decode(&self, path: &[usize]) -> Result<String> {
        let size = self.alphabet.size();

        if let Some(&index) = path.iter().find(|&&index| index >= size) {
            return Err(CodecError::IndexOutOfRange { index, size }.into());
        }

        collapse(path, self.blank)
            .into_iter()
            .map(|index| self.alphabet.char_at(index))
            .collect()
    }

    /// Decode the arg-max path of `matrix`.
    ///
    /// The score is the log-probability of that single path.
    pub fn decode_matrix(&self, matrix: &ProbabilityMatrix) -> Result<ScoredText> {
        matrix.ensure_classes(self.alphabet.size())?;

        let path = matrix.best_path()?;
        let score: f64 = path
            .iter()
            .enumerate()
            .map(|(step, &class)| matrix.log_prob(step, class))
            .sum();
        let text = self.decode(&path)?;

        tracing::debug!(steps = path.len(), score, "greedy decode");

        Ok(ScoredText { text, score })
    }
}
