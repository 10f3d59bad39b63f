//! Per-fold evaluation: the boundary between file handling and the
//! metric kernels.

use std::path::Path;

use ndarray::Array1;
use serde::Serialize;

use crate::data::{read_predictions, split_folds, PredictionRecord};
use crate::error::EvalError;
use crate::meta::ExperimentMeta;
use crate::metrics::{
    average_precision, bedroc, max_balanced_accuracy, max_f1, max_mcc, precision_at_l,
    recall_at_l, RocCurve,
};

/// Knobs shared by every fold evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalParams {
    /// Ranking cutoff L for precision@L / recall@L.
    pub at: usize,
    /// BEDROC early-recognition parameter.
    pub alpha: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self { at: 20, alpha: 20.0 }
    }
}

// =============================================================================
// Fold Metrics
// =============================================================================

/// The metric battery for one fold, in output-column order.
///
/// `None` means the metric is undefined on this fold (empty fold, one-class
/// fold, no positives). Undefined values serialize as `NaN` in the CSV
/// table and `null` in JSON; they are never silently dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FoldMetrics {
    pub roc_auc: Option<f64>,
    pub pr_auc: Option<f64>,
    pub precision_at: Option<f64>,
    pub recall_at: Option<f64>,
    pub bedroc: Option<f64>,
    pub max_balanced_accuracy: Option<f64>,
    pub max_mcc: Option<f64>,
    pub max_f1: Option<f64>,
}

impl FoldMetrics {
    /// Values in the same order as [`crate::report::metric_columns`].
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            self.roc_auc,
            self.pr_auc,
            self.precision_at,
            self.recall_at,
            self.bedroc,
            self.max_balanced_accuracy,
            self.max_mcc,
            self.max_f1,
        ]
    }
}

/// `None` for anything non-finite coming out of the kernels.
fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Evaluate one fold's cleaned records.
///
/// Pure function of its inputs. An empty fold is not an error: every
/// metric comes back undefined and the row still reaches the output table
/// for inspection.
pub fn evaluate_fold(
    records: &[PredictionRecord],
    params: &EvalParams,
) -> Result<FoldMetrics, EvalError> {
    if records.is_empty() {
        return Ok(FoldMetrics::default());
    }

    let labels = Array1::from_iter(records.iter().map(|r| f64::from(r.label)));
    let scores = Array1::from_iter(records.iter().map(|r| r.score));

    let curve = RocCurve::compute(labels.view(), scores.view())?;
    let pr_auc = average_precision(labels.view(), scores.view())?;
    let p_at = precision_at_l(records, params.at)?;
    let r_at = recall_at_l(records, params.at)?;
    let bedroc_score = bedroc(labels.view(), scores.view(), params.alpha, true)?;
    let (mba, _) = max_balanced_accuracy(labels.view(), scores.view())?;
    let (mcc, _) = max_mcc(labels.view(), scores.view())?;
    let (f1, _) = max_f1(labels.view(), scores.view())?;

    Ok(FoldMetrics {
        roc_auc: defined(curve.auc()),
        pr_auc: defined(pr_auc),
        precision_at: defined(p_at),
        recall_at: defined(r_at),
        bedroc: defined(bedroc_score),
        max_balanced_accuracy: defined(mba),
        max_mcc: defined(mcc),
        max_f1: defined(f1),
    })
}

// =============================================================================
// File Evaluation
// =============================================================================

/// One output row: experiment metadata, fold id, and the metric battery.
#[derive(Debug, Clone, Serialize)]
pub struct EvalRow {
    #[serde(flatten)]
    pub meta: ExperimentMeta,
    pub fold: u32,
    #[serde(flatten)]
    pub metrics: FoldMetrics,
}

/// Evaluate a whole prediction file: read and clean its records, split
/// them into folds, and score each fold independently.
pub fn evaluate_file(path: &Path, params: &EvalParams) -> Result<Vec<EvalRow>, EvalError> {
    let meta = ExperimentMeta::from_path(path)?;
    let records = read_predictions(path)?;

    let mut rows = Vec::new();
    for (fold, fold_records) in split_folds(records) {
        let metrics = evaluate_fold(&fold_records, params)?;
        rows.push(EvalRow {
            meta: meta.clone(),
            fold,
            metrics,
        });
    }
    Ok(rows)
}

// =============================================================================
// Tests
// =============================================================================
