//! Best-case classifier scores via a full threshold sweep.
//!
//! Every distinct score is tried as a decision cutoff; the confusion matrix
//! at each cutoff is reconstructed from the ROC curve and scored by a
//! caller-supplied metric. The result is the best value any fixed-threshold
//! classifier could have achieved on that fold.

use ndarray::ArrayView1;

use super::curve::RocCurve;
use crate::error::EvalError;

// =============================================================================
// Threshold Metric Trait
// =============================================================================

/// A classification score over confusion-matrix counts.
///
/// Implementations must return NaN for undefined operating points (zero
/// denominators) instead of panicking; the sweep skips NaN scores.
pub trait ThresholdMetric: Send + Sync {
    /// Score one confusion matrix. Counts arrive as f64 but are integral
    /// up to float error.
    fn compute(&self, tn: f64, fp: f64, fn_: f64, tp: f64) -> f64;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

/// F1 score: `tp / (tp + 0.5 (fp + fn))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct F1Score;

impl ThresholdMetric for F1Score {
    fn compute(&self, _tn: f64, fp: f64, fn_: f64, tp: f64) -> f64 {
        // 0/0 yields the required NaN.
        tp / (tp + 0.5 * (fp + fn_))
    }

    fn name(&self) -> &'static str {
        "f1"
    }
}

/// Matthews correlation coefficient.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatthewsCorrCoef;

impl ThresholdMetric for MatthewsCorrCoef {
    fn compute(&self, tn: f64, fp: f64, fn_: f64, tp: f64) -> f64 {
        let denom = (tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_);
        // A zero factor means the numerator is zero too; guard so float
        // error in the reconstructed counts cannot produce +-inf.
        if denom <= 0.0 {
            return f64::NAN;
        }
        (tp * tn - fp * fn_) / denom.sqrt()
    }

    fn name(&self) -> &'static str {
        "mcc"
    }
}

/// Balanced accuracy: `(TPR + TNR) / 2`. Undefined unless both rates are,
/// no partial credit for one-class folds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedAccuracy;

impl ThresholdMetric for BalancedAccuracy {
    fn compute(&self, tn: f64, fp: f64, fn_: f64, tp: f64) -> f64 {
        let pos = tp + fn_;
        let neg = tn + fp;
        if pos == 0.0 || neg == 0.0 {
            return f64::NAN;
        }
        (tp / pos + tn / neg) / 2.0
    }

    fn name(&self) -> &'static str {
        "balanced_accuracy"
    }
}

// =============================================================================
// Sweep
// =============================================================================

/// Maximum of `metric` over every distinguishable decision threshold,
/// together with the threshold achieving it.
///
/// Confusion counts at each operating point are reconstructed from the
/// curve ratios and the class totals; the true values are integral, so no
/// rounding is applied.
///
/// Tie-break: the update condition is `score >= max`, so of several equal
/// maxima the last point in curve order (the lowest threshold) wins. This
/// mirrors the behavior of existing evaluation pipelines and is kept for
/// bit-compatibility with their outputs.
///
/// When every operating point is undefined (NaN never beats the running
/// maximum) the sentinel `(0.0, 0.0)` is returned.
pub fn max_over_thresholds(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
    metric: &dyn ThresholdMetric,
) -> Result<(f64, f64), EvalError> {
    let curve = RocCurve::compute(labels, scores)?;
    let n_pos = labels.iter().filter(|&&l| l > 0.5).count() as f64;
    let n_neg = labels.len() as f64 - n_pos;

    let mut max_score = 0.0;
    let mut best_threshold = 0.0;
    for ((&fpr, &tpr), &threshold) in curve.fpr.iter().zip(&curve.tpr).zip(&curve.thresholds) {
        let tn = (1.0 - fpr) * n_neg;
        let tp = tpr * n_pos;
        let fn_ = n_pos - tp;
        let fp = n_neg - tn;

        let score = metric.compute(tn, fp, fn_, tp);
        if score >= max_score {
            max_score = score;
            best_threshold = threshold;
        }
    }
    Ok((max_score, best_threshold))
}

/// Best achievable F1 score and its threshold.
pub fn max_f1(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<(f64, f64), EvalError> {
    max_over_thresholds(labels, scores, &F1Score)
}

/// Best achievable Matthews correlation coefficient and its threshold.
pub fn max_mcc(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<(f64, f64), EvalError> {
    max_over_thresholds(labels, scores, &MatthewsCorrCoef)
}

/// Best achievable balanced accuracy and its threshold.
pub fn max_balanced_accuracy(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
) -> Result<(f64, f64), EvalError> {
    max_over_thresholds(labels, scores, &BalancedAccuracy)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rstest::rstest;

    #[test]
    fn perfectly_separable_fold_scores_one() {
        let labels = array![1.0, 1.0, 0.0, 0.0];
        let scores = array![0.9, 0.8, 0.3, 0.2];
        let (f1, thr_f1) = max_f1(labels.view(), scores.view()).unwrap();
        let (mcc, thr_mcc) = max_mcc(labels.view(), scores.view()).unwrap();
        let (ba, thr_ba) = max_balanced_accuracy(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(f1, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mcc, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ba, 1.0, epsilon = 1e-12);
        // The separating threshold is the lowest positive score.
        assert_abs_diff_eq!(thr_f1, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(thr_mcc, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(thr_ba, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn imperfect_fold_best_f1() {
        // Thresholds 0.9/0.8/0.4/0.1 give F1 = 2/3, 1/2, 4/5, 2/3.
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let scores = array![0.9, 0.8, 0.4, 0.1];
        let (f1, threshold) = max_f1(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(f1, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(threshold, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn equal_scores_keep_the_later_threshold() {
        // Balanced accuracy is 0.75 at both 0.9 and 0.4; the `>=` update
        // keeps the later (lower) threshold.
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let scores = array![0.9, 0.6, 0.4, 0.1];
        let (ba, threshold) = max_balanced_accuracy(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(ba, 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(threshold, 0.4, epsilon = 1e-12);
    }

    #[rstest]
    #[case(array![1.0, 1.0], array![0.9, 0.8])]
    #[case(array![0.0, 0.0], array![0.9, 0.8])]
    fn one_class_fold_returns_sentinel(
        #[case] labels: ndarray::Array1<f64>,
        #[case] scores: ndarray::Array1<f64>,
    ) {
        // Every operating point is undefined, so the sweep falls through
        // to the sentinel default.
        let (score, threshold) = max_mcc(labels.view(), scores.view()).unwrap();
        assert_eq!(score, 0.0);
        assert_eq!(threshold, 0.0);
        let (score, threshold) = max_balanced_accuracy(labels.view(), scores.view()).unwrap();
        assert_eq!(score, 0.0);
        assert_eq!(threshold, 0.0);
    }

    #[rstest]
    #[case(array![1.0, 0.0, 1.0, 0.0], array![0.9, 0.8, 0.4, 0.1])]
    #[case(array![1.0, 1.0, 0.0, 0.0], array![0.5, 0.5, 0.5, 0.2])]
    #[case(array![0.0, 1.0, 0.0, 1.0], array![0.6, 0.6, 0.3, 0.3])]
    fn f1_in_unit_range_and_threshold_from_scores(
        #[case] labels: ndarray::Array1<f64>,
        #[case] scores: ndarray::Array1<f64>,
    ) {
        let (f1, threshold) = max_f1(labels.view(), scores.view()).unwrap();
        assert!((0.0..=1.0).contains(&f1), "F1 out of range: {f1}");
        assert!(
            scores.iter().any(|&s| s == threshold),
            "threshold {threshold} is not an input score"
        );
    }

    #[test]
    fn mcc_is_negative_for_inverted_ranking_points() {
        // Direct kernel check: an anti-correlated confusion matrix.
        let mcc = MatthewsCorrCoef.compute(0.0, 2.0, 2.0, 0.0);
        assert_abs_diff_eq!(mcc, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn metric_names() {
        assert_eq!(F1Score.name(), "f1");
        assert_eq!(MatthewsCorrCoef.name(), "mcc");
        assert_eq!(BalancedAccuracy.name(), "balanced_accuracy");
    }
}
