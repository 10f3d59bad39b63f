//! vseval: evaluation metrics for virtual-screening prediction runs.
//!
//! Scores ligand-ranking experiments: given per-fold prediction records
//! (score + true-label pairs per ligand/target), computes a battery of
//! ranking and classification metrics and assembles them into one
//! evaluation table across many parameter combinations.
//!
//! # Key Types
//!
//! - [`PredictionRecord`] / [`read_predictions`] - Prediction-file handling
//! - [`evaluate_fold`] / [`FoldMetrics`] - Per-fold metric computation
//! - [`ExperimentMeta`] - Experiment configuration decoded from filenames
//! - [`EvalWriter`] - Streaming CSV output
//!
//! # Metrics
//!
//! ROC-AUC, PR-AUC, precision@L, recall@L, BEDROC, and the best-case
//! classifier scores (max F1, max MCC, max balanced accuracy) obtained by
//! sweeping every decision threshold. See the [`metrics`] module.
//!
//! Undefined values (zero denominators, degenerate class balance) are
//! never errors: they flow through as NaN inside the numeric kernels and
//! surface as `None` in [`FoldMetrics`].

pub mod data;
pub mod error;
pub mod eval;
pub mod meta;
pub mod metrics;
pub mod report;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{read_predictions, split_folds, PredictionRecord};
pub use error::EvalError;
pub use eval::{evaluate_file, evaluate_fold, EvalParams, EvalRow, FoldMetrics};
pub use meta::ExperimentMeta;
pub use report::EvalWriter;
