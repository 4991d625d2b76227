//! CTC decoding: blank removal, repeat collapsing and prefix beam search.

pub mod beam;
pub mod greedy;

pub use beam::BeamSearchCtcDecoder;
pub use greedy::GreedyCtcDecoder;

/// Decoded text with its natural-log probability.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredText {
    pub text: String,
    pub score: f64,
}

impl ScoredText {
    /// Score converted back to a probability.
    pub fn probability(&self) -> f64 {
        self.score.exp()
    }
}

/// Collapse a raw per-step label path.
///
/// A label is kept when it is not blank and differs from the raw label one
/// step earlier. Comparing against the raw predecessor, not the last kept
/// label, is what lets a blank separate two identical characters.
pub(crate) fn collapse(path: &[usize], blank: usize) -> Vec<usize> {
    path.iter()
        .enumerate()
        .filter(|&(i, &label)| label != blank && (i == 0 || path[i - 1] != label))
        .map(|(_, &label)| label)
        .collect()
}

/// `ln(exp(a) + exp(b))` without overflow; `-inf` is the additive identity.
pub(crate) fn log_sum_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let max = a.max(b);
    max + (-(a - b).abs()).exp().ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_keeps_blank_separated_repeats() {
        let blank = 9;

        assert_eq!(collapse(&[1, 1, blank, 1], blank), vec![1, 1]);
        assert_eq!(collapse(&[1, blank, blank, 1], blank), vec![1, 1]);
        assert_eq!(collapse(&[1, 1, 1], blank), vec![1]);
        assert_eq!(collapse(&[blank, blank], blank), Vec::<usize>::new());
    }

    #[test]
    fn log_sum_exp_matches_linear_sum() {
        let sum = log_sum_exp(0.25f64.ln(), 0.5f64.ln());

        assert!((sum.exp() - 0.75).abs() < 1e-12);
        assert_eq!(log_sum_exp(f64::NEG_INFINITY, -1.0), -1.0);
        assert_eq!(
            log_sum_exp(f64::NEG_INFINITY, f64::NEG_INFINITY),
            f64::NEG_INFINITY
        );
    }
}
