//! Per-time-step class scores produced by an acoustic model.

use crate::error::{DecodeError, Result};
use ndarray::{Array2, ArrayView2};
use ndarray_stats::QuantileExt;

/// How the values of a [`ProbabilityMatrix`] are to be read.
///
/// Always set explicitly by the caller; scores are never sniffed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreKind {
    /// Non-negative probabilities (e.g. softmax output)
    #[default]
    Probabilities,
    /// Natural-log probabilities (e.g. log-softmax output)
    LogProbabilities,
}

/// Dense `(steps, classes)` score matrix.
///
/// Column order follows the [`crate::AlphabetMap`] index order.
#[derive(Clone, Debug)]
pub struct ProbabilityMatrix {
    scores: Array2<f32>,
    kind: ScoreKind,
}

impl ProbabilityMatrix {
    /// Wrap a dense score array.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidScore`] for values outside the domain of
    /// `kind`: probabilities must be finite and non-negative, log-probabilities
    /// finite or `-inf`.
    pub fn new(scores: Array2<f32>, kind: ScoreKind) -> Result<Self> {
        let invalid = scores.indexed_iter().find(|&(_, &value)| match kind {
            ScoreKind::Probabilities => !value.is_finite() || value < 0.0,
            ScoreKind::LogProbabilities => !(value.is_finite() || value == f32::NEG_INFINITY),
        });

        if let Some(((step, class), &value)) = invalid {
            return Err(DecodeError::InvalidScore { step, class, value }.into());
        }

        Ok(Self { scores, kind })
    }

    /// Build from row slices, checking that every row has the same width.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidInputShape`] naming the first row whose
    /// width differs from the first row's.
    pub fn from_rows<R>(rows: &[R], kind: ScoreKind) -> Result<Self>
    where
        R: AsRef<[f32]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());

        if let Some((step, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != width)
        {
            return Err(DecodeError::InvalidInputShape {
                step,
                expected: width,
                got: row.as_ref().len(),
            }
            .into());
        }

        let flat: Vec<f32> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();

        let scores = Array2::from_shape_vec((rows.len(), width), flat)?;
        Self::new(scores, kind)
    }

    /// Number of time steps (T).
    pub fn num_steps(&self) -> usize {
        self.scores.nrows()
    }

    /// Number of classes per step (V).
    pub fn num_classes(&self) -> usize {
        self.scores.ncols()
    }

    pub fn kind(&self) -> ScoreKind {
        self.kind
    }

    pub fn scores(&self) -> ArrayView2<'_, f32> {
        self.scores.view()
    }

    /// Fail unless every row holds exactly `classes` scores.
    pub fn ensure_classes(&self, classes: usize) -> Result<()> {
        if self.num_steps() > 0 && self.num_classes() != classes {
            return Err(DecodeError::InvalidInputShape {
                step: 0,
                expected: classes,
                got: self.num_classes(),
            }
            .into());
        }
        Ok(())
    }

    /// Log-probability of `class` at `step`.
    ///
    /// Panics if either index is out of bounds.
    pub fn log_prob(&self, step: usize, class: usize) -> f64 {
        self.to_log(self.scores[[step, class]])
    }

    /// All scores in log space, widened to `f64`.
    pub fn log_probs(&self) -> Array2<f64> {
        self.scores.mapv(|score| self.to_log(score))
    }

    fn to_log(&self, score: f32) -> f64 {
        match self.kind {
            ScoreKind::Probabilities => f64::from(score).ln(),
            ScoreKind::LogProbabilities => f64::from(score),
        }
    }

    /// Arg-max class of every step; the first maximum wins ties.
    pub fn best_path(&self) -> Result<Vec<usize>> {
        self.scores
            .rows()
            .into_iter()
            .map(|row| row.argmax().map_err(Into::into))
            .collect()
    }
}
