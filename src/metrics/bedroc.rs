//! BEDROC early-recognition score.

use ndarray::ArrayView1;

use super::curve::descending_order;
use crate::error::EvalError;

/// Boltzmann-Enhanced Discrimination of ROC, after Truchon & Bayley,
/// "Evaluating virtual screening methods: good and bad metrics for the
/// 'early recognition' problem" (doi:10.1021/ci600426e).
///
/// A rank-exponentially-weighted generalization of AUC that rewards
/// placing positives early in the ranking. `alpha` controls how sharply
/// early ranks are weighted: larger values compress the window of ranks
/// that matter, while `alpha -> 0` recovers plain AUC.
///
/// # Arguments
///
/// * `labels` - Binary class labels, 1.0 for the positive class
/// * `scores` - Prediction values, used for ordering only
/// * `alpha` - Early recognition parameter, must be positive
/// * `decreasing` - True when high scores indicate the positive class
///
/// # Returns
///
/// A value in [0, 1] for non-degenerate input. Folds where every item is
/// positive, or none is, have no defined early-recognition behavior and
/// yield NaN.
pub fn bedroc(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
    alpha: f64,
    decreasing: bool,
) -> Result<f64, EvalError> {
    if alpha <= 0.0 {
        return Err(EvalError::InvalidArgument(format!(
            "BEDROC alpha must be positive, got {alpha}"
        )));
    }
    if labels.len() != scores.len() {
        return Err(EvalError::ShapeMismatch {
            expected: labels.len(),
            got: scores.len(),
        });
    }

    let big_n = labels.len() as f64;
    let n_pos = labels.iter().filter(|&&l| l > 0.5).count() as f64;
    if n_pos == 0.0 || n_pos == big_n {
        return Ok(f64::NAN);
    }

    let mut order = descending_order(scores);
    if !decreasing {
        order.reverse();
    }

    // Sum of exp(-alpha * rank / N) over the 1-based ranks of positives.
    let s: f64 = order
        .iter()
        .enumerate()
        .filter(|&(_, &idx)| labels[idx] > 0.5)
        .map(|(rank0, _)| (-alpha * (rank0 + 1) as f64 / big_n).exp())
        .sum();

    let r_a = n_pos / big_n;
    let rand_sum = r_a * (1.0 - (-alpha).exp()) / ((alpha / big_n).exp() - 1.0);
    // Hyperbolic forms stay finite for large alpha where the naive
    // exponential expansion would overflow.
    let fac = r_a * (alpha / 2.0).sinh() / ((alpha / 2.0).cosh() - (alpha / 2.0 - alpha * r_a).cosh());
    let cte = 1.0 / (1.0 - (alpha * (1.0 - r_a)).exp());

    Ok(s * fac / rand_sum + cte)
}

// =============================================================================
// Tests
// =============================================================================
