//! ROC / precision-recall curve primitives.

use ndarray::ArrayView1;

use crate::error::EvalError;

fn check_shapes(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<(), EvalError> {
    if labels.len() != scores.len() {
        return Err(EvalError::ShapeMismatch {
            expected: labels.len(),
            got: scores.len(),
        });
    }
    Ok(())
}

/// Indices of `scores` sorted by score descending. The sort is stable, so
/// tied scores keep input order.
pub(crate) fn descending_order(scores: ArrayView1<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

// =============================================================================
// ROC Curve
// =============================================================================

/// ROC curve over every distinct threshold present in the scores.
///
/// No interpolation or decimation: each distinct score value yields one
/// operating point, so every achievable confusion matrix is represented.
/// Thresholds are stored descending. When a class is empty the
/// corresponding rate is NaN throughout.
#[derive(Debug, Clone)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Compute the curve from binary labels and real-valued scores.
    pub fn compute(labels: ArrayView1<f64>, scores: ArrayView1<f64>) -> Result<Self, EvalError> {
        check_shapes(labels, scores)?;

        let n = labels.len();
        let order = descending_order(scores);
        let n_pos = labels.iter().filter(|&&l| l > 0.5).count() as f64;
        let n_neg = n as f64 - n_pos;

        let mut fpr = Vec::new();
        let mut tpr = Vec::new();
        let mut thresholds = Vec::new();

        let mut tp = 0.0;
        let mut fp = 0.0;
        let mut i = 0;
        while i < n {
            let threshold = scores[order[i]];
            // Consume the whole tie group before emitting a point.
            let mut j = i;
            while j < n && scores[order[j]] == threshold {
                if labels[order[j]] > 0.5 {
                    tp += 1.0;
                } else {
                    fp += 1.0;
                }
                j += 1;
            }
            thresholds.push(threshold);
            tpr.push(tp / n_pos);
            fpr.push(fp / n_neg);
            i = j;
        }

        Ok(Self {
            fpr,
            tpr,
            thresholds,
        })
    }

    /// Area under the curve by the trapezoid rule, integrating from the
    /// implicit (0, 0) origin. NaN for an empty curve or a one-class fold.
    pub fn auc(&self) -> f64 {
        if self.thresholds.is_empty() {
            return f64::NAN;
        }
        let mut auc = 0.0;
        let (mut prev_x, mut prev_y) = (0.0, 0.0);
        for (&x, &y) in self.fpr.iter().zip(&self.tpr) {
            auc += (x - prev_x) * (y + prev_y) / 2.0;
            prev_x = x;
            prev_y = y;
        }
        auc
    }
}

// =============================================================================
// Average Precision (PR-AUC)
// =============================================================================

/// Average precision: `Σ (R_i − R_{i−1}) · P_i` over descending-score
/// prefixes, one term per distinct threshold.
///
/// This is the step-function summary of the precision-recall curve, not a
/// trapezoidal fit (linear PR interpolation is too optimistic). NaN when
/// the fold has no positives.
pub fn average_precision(
    labels: ArrayView1<f64>,
    scores: ArrayView1<f64>,
) -> Result<f64, EvalError> {
    check_shapes(labels, scores)?;

    let n = labels.len();
    let n_pos = labels.iter().filter(|&&l| l > 0.5).count() as f64;
    if n_pos == 0.0 {
        return Ok(f64::NAN);
    }

    let order = descending_order(scores);
    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut prev_recall = 0.0;
    let mut ap = 0.0;
    let mut i = 0;
    while i < n {
        let threshold = scores[order[i]];
        let mut j = i;
        while j < n && scores[order[j]] == threshold {
            if labels[order[j]] > 0.5 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            j += 1;
        }
        let precision = tp / (tp + fp);
        let recall = tp / n_pos;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
        i = j;
    }
    Ok(ap)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn roc_curve_covers_every_distinct_threshold() {
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let scores = array![0.9, 0.8, 0.4, 0.1];
        let curve = RocCurve::compute(labels.view(), scores.view()).unwrap();
        assert_eq!(curve.thresholds, vec![0.9, 0.8, 0.4, 0.1]);
        assert_eq!(curve.tpr, vec![0.5, 0.5, 1.0, 1.0]);
        assert_eq!(curve.fpr, vec![0.0, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn roc_curve_groups_tied_scores() {
        let labels = array![1.0, 0.0, 1.0];
        let scores = array![0.5, 0.5, 0.1];
        let curve = RocCurve::compute(labels.view(), scores.view()).unwrap();
        assert_eq!(curve.thresholds, vec![0.5, 0.1]);
        assert_eq!(curve.tpr, vec![0.5, 1.0]);
        assert_eq!(curve.fpr, vec![1.0, 1.0]);
    }

    #[test]
    fn auc_perfect_separation() {
        let labels = array![1.0, 1.0, 0.0, 0.0];
        let scores = array![0.9, 0.8, 0.3, 0.2];
        let curve = RocCurve::compute(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(curve.auc(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn auc_partial_ranking() {
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let scores = array![0.9, 0.8, 0.4, 0.1];
        let curve = RocCurve::compute(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(curve.auc(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn auc_single_class_is_nan() {
        let labels = array![1.0, 1.0];
        let scores = array![0.9, 0.8];
        let curve = RocCurve::compute(labels.view(), scores.view()).unwrap();
        assert!(curve.auc().is_nan());
    }

    #[test]
    fn auc_empty_is_nan() {
        let labels: ndarray::Array1<f64> = array![];
        let scores: ndarray::Array1<f64> = array![];
        let curve = RocCurve::compute(labels.view(), scores.view()).unwrap();
        assert!(curve.auc().is_nan());
    }

    #[test]
    fn average_precision_perfect() {
        let labels = array![1.0, 1.0, 0.0, 0.0];
        let scores = array![0.9, 0.8, 0.3, 0.2];
        let ap = average_precision(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(ap, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn average_precision_interleaved() {
        // Hits at ranks 1 and 3: AP = 0.5 * 1.0 + 0.5 * (2/3)
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let scores = array![0.9, 0.8, 0.4, 0.1];
        let ap = average_precision(labels.view(), scores.view()).unwrap();
        assert_abs_diff_eq!(ap, 5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn average_precision_no_positives_is_nan() {
        let labels = array![0.0, 0.0];
        let scores = array![0.9, 0.8];
        assert!(average_precision(labels.view(), scores.view())
            .unwrap()
            .is_nan());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let labels = array![1.0, 0.0];
        let scores = array![0.9];
        assert!(matches!(
            RocCurve::compute(labels.view(), scores.view()),
            Err(EvalError::ShapeMismatch { .. })
        ));
    }
}
