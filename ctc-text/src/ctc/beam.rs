//! CTC prefix beam search.

use crate::alphabet::AlphabetMap;
use crate::cancel::CancelFlag;
use crate::ctc::{ScoredText, log_sum_exp};
use crate::error::{DecodeError, Result};
use crate::matrix::ProbabilityMatrix;
use ndarray::ArrayView1;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Probability mass of one collapsed prefix, split by the last raw symbol.
#[derive(Clone, Copy, Debug)]
struct PrefixMass {
    /// Paths ending in blank
    blank: f64,
    /// Paths ending in the prefix's last character
    non_blank: f64,
}

impl PrefixMass {
    const ZERO: Self = Self {
        blank: f64::NEG_INFINITY,
        non_blank: f64::NEG_INFINITY,
    };

    const ONE: Self = Self {
        blank: 0.0,
        non_blank: f64::NEG_INFINITY,
    };

    fn total(&self) -> f64 {
        log_sum_exp(self.blank, self.non_blank)
    }
}

/// Beam entry: collapsed label prefix and its mass.
#[derive(Clone, Debug)]
struct Candidate {
    prefix: Vec<usize>,
    mass: PrefixMass,
    total: f64,
}

impl Candidate {
    fn new(prefix: Vec<usize>, mass: PrefixMass) -> Self {
        let total = mass.total();
        Self {
            prefix,
            mass,
            total,
        }
    }

    /// Higher mass first, then shorter prefix, then lower indices.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .total
            .total_cmp(&self.total)
            .then_with(|| self.prefix.len().cmp(&other.prefix.len()))
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

/// CTC prefix beam search decoder.
///
/// Keeps the `beam_size` collapsed prefixes with the highest aggregated
/// probability after every time step. All raw paths that collapse to the same
/// prefix are merged, so a hypothesis score is the log of the summed
/// probability of those paths. Work is `O(T × beam_size × V)`.
///
/// Scoring runs in log space. Ties are broken by shorter text, then by
/// alphabet order, which is code point order.
///
/// A beam of one follows the arg-max path, so its only hypothesis is the
/// [`crate::GreedyCtcDecoder`] text scored by the mass the beam retained.
#[derive(Clone, Debug)]
pub struct BeamSearchCtcDecoder {
    alphabet: Arc<AlphabetMap>,
    blank: usize,
}

impl BeamSearchCtcDecoder {
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

    /// Decode `matrix`, returning up to `beam_size` hypotheses best first.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidBeamSize`] if `beam_size` is zero
    /// - [`DecodeError::InvalidInputShape`] if rows do not match the alphabet
    pub fn decode(
        &self,
        matrix: &ProbabilityMatrix,
        beam_size: usize,
    ) -> Result<Vec<ScoredText>> {
        self.decode_cancellable(matrix, beam_size, &CancelFlag::new())
    }

    /// Like [`BeamSearchCtcDecoder::decode`], checking `cancel` before every
    /// time step.
    ///
    /// # Errors
    ///
    /// Additionally returns [`DecodeError::Cancelled`] once `cancel` is set.
    pub fn decode_cancellable(
        &self,
        matrix: &ProbabilityMatrix,
        beam_size: usize,
        cancel: &CancelFlag,
    ) -> Result<Vec<ScoredText>> {
        if beam_size < 1 {
            return Err(DecodeError::InvalidBeamSize(beam_size).into());
        }

        matrix.ensure_classes(self.alphabet.size())?;

        let beam = if beam_size == 1 {
            self.search_best_path(matrix, cancel)?
        } else {
            self.search(matrix, beam_size, cancel)?
        };

        tracing::debug!(
            steps = matrix.num_steps(),
            beam_size,
            hypotheses = beam.len(),
            "beam search finished"
        );

        beam.into_iter()
            .map(|candidate| -> Result<ScoredText> {
                let text = candidate
                    .prefix
                    .iter()
                    .map(|&index| self.alphabet.char_at(index))
                    .collect::<Result<String>>()?;

                Ok(ScoredText {
                    text,
                    score: candidate.total,
                })
            })
            .collect()
    }

    fn search(
        &self,
        matrix: &ProbabilityMatrix,
        beam_size: usize,
        cancel: &CancelFlag,
    ) -> Result<Vec<Candidate>> {
        let log_probs = matrix.log_probs();
        let mut beam = vec![Candidate::new(Vec::new(), PrefixMass::ONE)];

        for (step, row) in log_probs.rows().into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(DecodeError::Cancelled { step }.into());
            }

            let next = self.extend(&beam, row);
            beam = prune(next, beam_size);

            tracing::trace!(step, candidates = beam.len(), "beam step");
        }

        Ok(beam)
    }

    /// Single-entry beam that keeps the prefix of the arg-max path.
    fn search_best_path(
        &self,
        matrix: &ProbabilityMatrix,
        cancel: &CancelFlag,
    ) -> Result<Vec<Candidate>> {
        let log_probs = matrix.log_probs();
        let path = matrix.best_path()?;
        let mut beam = vec![Candidate::new(Vec::new(), PrefixMass::ONE)];
        let mut anchor = Vec::new();

        for (step, row) in log_probs.rows().into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(DecodeError::Cancelled { step }.into());
            }

            let label = path[step];
            if label != self.blank && (step == 0 || path[step - 1] != label) {
                anchor.push(label);
            }

            let mut next = self.extend(&beam, row);
            let mass = next.remove(&anchor).unwrap_or(PrefixMass::ZERO);
            beam = vec![Candidate::new(anchor.clone(), mass)];

            tracing::trace!(step, "best path step");
        }

        Ok(beam)
    }

    /// Extend every candidate by every symbol of one time step.
    fn extend(
        &self,
        beam: &[Candidate],
        row: ArrayView1<'_, f64>,
    ) -> HashMap<Vec<usize>, PrefixMass> {
        let mut next: HashMap<Vec<usize>, PrefixMass> =
            HashMap::with_capacity(beam.len() * row.len());

        for candidate in beam {
            let Candidate {
                prefix,
                mass,
                total,
            } = candidate;
            let last = prefix.last().copied();

            for (symbol, &log_prob) in row.iter().enumerate() {
                if symbol == self.blank {
                    let entry = next.entry(prefix.clone()).or_insert(PrefixMass::ZERO);
                    entry.blank = log_sum_exp(entry.blank, total + log_prob);
                    continue;
                }

                let extended = [prefix.as_slice(), &[symbol]].concat();

                if last == Some(symbol) {
                    // Adjacent repeat collapses into the same prefix; only a
                    // path ending in blank can start a new copy of the symbol.
                    let entry = next.entry(prefix.clone()).or_insert(PrefixMass::ZERO);
                    entry.non_blank = log_sum_exp(entry.non_blank, mass.non_blank + log_prob);

                    let entry = next.entry(extended).or_insert(PrefixMass::ZERO);
                    entry.non_blank = log_sum_exp(entry.non_blank, mass.blank + log_prob);
                } else {
                    let entry = next.entry(extended).or_insert(PrefixMass::ZERO);
                    entry.non_blank = log_sum_exp(entry.non_blank, total + log_prob);
                }
            }
        }

        next
    }
}

/// Keep the `beam_size` best candidates, sorted best first.
fn prune(candidates: HashMap<Vec<usize>, PrefixMass>, beam_size: usize) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates
        .into_iter()
        .map(|(prefix, mass)| Candidate::new(prefix, mass))
        .collect();

    // Zero-mass prefixes only survive when nothing else does.
    if ranked.iter().any(|c| c.total > f64::NEG_INFINITY) {
        ranked.retain(|c| c.total > f64::NEG_INFINITY);
    }

    if ranked.len() > beam_size {
        ranked.select_nth_unstable_by(beam_size - 1, Candidate::rank);
        ranked.truncate(beam_size);
    }

    ranked.sort_unstable_by(Candidate::rank);
    ranked
}
