//! Experiment metadata decoded from prediction-file names.
//!
//! Prediction files are named `dataset.method_cv.params.ext`, where
//! `params` is either a fingerprint id or `fingerprint_weight` with the
//! weight zero-padded ("075" reads as 0.75). The metric kernels never see
//! filenames; they receive this struct, already decoded.

use std::path::Path;

use serde::Serialize;

use crate::error::EvalError;

/// Configuration of one experiment, as carried by its output filename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentMeta {
    pub dataset: String,
    pub method: String,
    /// Cross-validation scheme tag (e.g. "loocv", "kfold").
    pub cv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Method weighting coefficient, when the method has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl ExperimentMeta {
    /// Decode experiment metadata from a prediction-file path.
    pub fn from_path(path: &Path) -> Result<Self, EvalError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| EvalError::Metadata(format!("unusable path: {}", path.display())))?;

        let parts: Vec<&str> = name.split('.').collect();
        let [dataset, scenario, parameters, _ext] = parts[..] else {
            return Err(EvalError::Metadata(format!(
                "expected dataset.method_cv.params.ext, got {name:?}"
            )));
        };

        let Some((method, cv)) = scenario.split_once('_') else {
            return Err(EvalError::Metadata(format!(
                "expected method_cv scenario, got {scenario:?}"
            )));
        };

        let (fingerprint, alpha) = match parameters.split('_').collect::<Vec<_>>()[..] {
            [fingerprint] => (fingerprint, None),
            [fingerprint, weight] => (fingerprint, Some(decode_weight(weight)?)),
            _ => {
                return Err(EvalError::Metadata(format!(
                    "expected 1 or 2 method parameters, got {parameters:?}"
                )))
            }
        };

        Ok(Self {
            dataset: dataset.to_owned(),
            method: method.to_owned(),
            cv: cv.to_owned(),
            fingerprint: Some(fingerprint.to_owned()),
            alpha,
        })
    }
}

/// Decode a zero-padded weight string by inserting a decimal point after
/// the first digit: "05" -> 0.5, "075" -> 0.75.
pub fn decode_weight(raw: &str) -> Result<f64, EvalError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EvalError::Metadata(format!(
            "weight must be a zero-padded integer string, got {raw:?}"
        )));
    }
    let (head, tail) = raw.split_at(1);
    format!("{head}.{tail}")
        .parse()
        .map_err(|_| EvalError::Metadata(format!("unreadable weight {raw:?}")))
}

// =============================================================================
// Tests
// =============================================================================
