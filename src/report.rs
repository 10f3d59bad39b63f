//! Streaming assembly of the evaluation table.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::EvalError;
use crate::eval::{EvalParams, EvalRow};

/// Metric column headers, parameterized by the run's cutoff and alpha.
pub fn metric_columns(params: &EvalParams) -> [String; 8] {
    [
        "ROC-AUC".to_owned(),
        "PR-AUC".to_owned(),
        format!("P({})", params.at),
        format!("R({})", params.at),
        format!("BEDROC({})", params.alpha),
        "Max Balanced Accuracy".to_owned(),
        "Max MCC".to_owned(),
        "Max F1 score".to_owned(),
    ]
}

/// Undefined metrics are written out as literal NaN so they stay visible
/// in the table instead of being dropped.
fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "NaN".to_owned(),
    }
}

// =============================================================================
// CSV Writer
// =============================================================================

/// Streaming CSV writer for evaluation rows.
///
/// Consumes one row at a time, in whatever order the worker pool finishes
/// them; rows are self-identifying through their metadata, so no ordering
/// is imposed. The header is derived from the first row's metadata: the
/// Fingerprint and Alpha columns appear only when that experiment carries
/// those parameters.
pub struct EvalWriter<W: Write> {
    inner: csv::Writer<W>,
    columns: [String; 8],
    started: bool,
    has_fingerprint: bool,
    has_alpha: bool,
}

impl<W: Write> EvalWriter<W> {
    pub fn new(writer: W, params: &EvalParams) -> Self {
        Self {
            inner: csv::Writer::from_writer(writer),
            columns: metric_columns(params),
            started: false,
            has_fingerprint: false,
            has_alpha: false,
        }
    }

    fn write_header(&mut self, row: &EvalRow) -> Result<(), EvalError> {
        self.has_fingerprint = row.meta.fingerprint.is_some();
        self.has_alpha = row.meta.alpha.is_some();

        let mut header = vec!["Dataset", "Method", "CV", "Fold ID"];
        if self.has_fingerprint {
            header.push("Fingerprint");
        }
        if self.has_alpha {
            header.push("Alpha");
        }
        header.extend(self.columns.iter().map(String::as_str));
        self.inner.write_record(&header)?;
        self.started = true;
        Ok(())
    }

    /// Append one evaluation row, writing the header first if needed.
    pub fn write_row(&mut self, row: &EvalRow) -> Result<(), EvalError> {
        if !self.started {
            self.write_header(row)?;
        }

        let mut fields = vec![
            row.meta.dataset.clone(),
            row.meta.method.clone(),
            row.meta.cv.clone(),
            row.fold.to_string(),
        ];
        if self.has_fingerprint {
            fields.push(row.meta.fingerprint.clone().unwrap_or_default());
        }
        if self.has_alpha {
            fields.push(format_value(row.meta.alpha));
        }
        fields.extend(row.metrics.values().into_iter().map(format_value));
        self.inner.write_record(&fields)?;
        Ok(())
    }

    /// Flush buffered rows to the underlying writer.
    pub fn flush(&mut self) -> Result<(), EvalError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Finish writing and return the underlying writer.
    pub fn into_inner(self) -> Result<W, EvalError> {
        self.inner
            .into_inner()
            .map_err(|err| EvalError::Io(io::Error::new(io::ErrorKind::Other, err.to_string())))
    }
}

// =============================================================================
// JSON Report
// =============================================================================

/// Whole-run report for `--out-json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub at: usize,
    pub alpha: f64,
    pub rows: &'a [EvalRow],
}

impl<'a> JsonReport<'a> {
    pub fn new(params: &EvalParams, rows: &'a [EvalRow]) -> Self {
        Self {
            at: params.at,
            alpha: params.alpha,
            rows,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::FoldMetrics;
    use crate::meta::ExperimentMeta;

    fn meta(alpha: Option<f64>) -> ExperimentMeta {
        ExperimentMeta {
            dataset: "ds".to_owned(),
            method: "simspread".to_owned(),
            cv: "loocv".to_owned(),
            fingerprint: Some("maccs".to_owned()),
            alpha,
        }
    }

    fn row(alpha: Option<f64>) -> EvalRow {
        EvalRow {
            meta: meta(alpha),
            fold: 3,
            metrics: FoldMetrics {
                roc_auc: Some(0.75),
                max_f1: Some(0.8),
                ..FoldMetrics::default()
            },
        }
    }

    fn written(rows: &[EvalRow]) -> String {
        let mut writer = EvalWriter::new(Vec::new(), &EvalParams::default());
        for row in rows {
            writer.write_row(row).unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn header_without_alpha_column() {
        let out = written(&[row(None)]);
        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "Dataset,Method,CV,Fold ID,Fingerprint,ROC-AUC,PR-AUC,P(20),R(20),BEDROC(20),\
             Max Balanced Accuracy,Max MCC,Max F1 score"
        );
    }

    #[test]
    fn header_with_alpha_column() {
        let out = written(&[row(Some(0.5))]);
        let header = out.lines().next().unwrap();
        assert!(header.contains("Alpha"));
    }

    #[test]
    fn undefined_metrics_stay_visible_as_nan() {
        let out = written(&[row(None)]);
        let data_line = out.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            "ds,simspread,loocv,3,maccs,0.75,NaN,NaN,NaN,NaN,NaN,NaN,0.8"
        );
    }

    #[test]
    fn one_line_per_row_after_header() {
        let out = written(&[row(None), row(None), row(None)]);
        assert_eq!(out.lines().count(), 4);
    }
}
