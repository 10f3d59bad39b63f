//! Prediction records and per-fold grouping.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Score value marking "no valid prediction". Filtered out before any
/// metric computation.
pub const SENTINEL_SCORE: f64 = -99.0;

/// One scored ligand/target pair from a prediction file.
///
/// Files are headerless CSV with columns `(fold, ligand, target, score, tp)`.
/// `label` is the true-positive flag (0 or 1); `score` is only ever used for
/// relative ordering (higher = more confident positive).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionRecord {
    pub fold: u32,
    pub ligand: String,
    pub target: String,
    pub score: f64,
    #[serde(rename = "tp")]
    pub label: u8,
}

// =============================================================================
// Reading and Cleaning
// =============================================================================

/// Read a prediction file and return its cleaned records.
///
/// Cleaning collapses exact duplicates (first occurrence wins) and drops
/// sentinel-scored rows. No further validation is performed; the file is
/// trusted to carry 0/1 labels.
pub fn read_predictions(path: &Path) -> Result<Vec<PredictionRecord>, EvalError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(clean_records(records))
}

/// Collapse exact duplicates and drop sentinel-scored records. The first
/// occurrence of a duplicate wins; scores compare bitwise.
pub fn clean_records(records: Vec<PredictionRecord>) -> Vec<PredictionRecord> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(records.len());
    for record in records {
        if record.score == SENTINEL_SCORE {
            continue;
        }
        let key = (
            record.fold,
            record.ligand.clone(),
            record.target.clone(),
            record.score.to_bits(),
            record.label,
        );
        if seen.insert(key) {
            cleaned.push(record);
        }
    }
    cleaned
}

/// Group records by fold id. Folds are independent evaluation units.
pub fn split_folds(records: Vec<PredictionRecord>) -> BTreeMap<u32, Vec<PredictionRecord>> {
    let mut folds: BTreeMap<u32, Vec<PredictionRecord>> = BTreeMap::new();
    for record in records {
        folds.entry(record.fold).or_default().push(record);
    }
    folds
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fold: u32, ligand: &str, target: &str, score: f64, label: u8) -> PredictionRecord {
        PredictionRecord {
            fold,
            ligand: ligand.to_owned(),
            target: target.to_owned(),
            score,
            label,
        }
    }

    #[test]
    fn cleaning_collapses_duplicates_and_drops_sentinel() {
        let rows = vec![
            record(0, "A", "X", 0.9, 1),
            record(0, "A", "X", 0.9, 1),
            record(0, "B", "Y", -99.0, 0),
        ];
        let cleaned = clean_records(rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0], record(0, "A", "X", 0.9, 1));
    }

    #[test]
    fn cleaning_keeps_near_duplicates() {
        // Same pair, different score: both stay.
        let rows = vec![record(0, "A", "X", 0.9, 1), record(0, "A", "X", 0.8, 1)];
        assert_eq!(clean_records(rows).len(), 2);
    }

    #[test]
    fn folds_split_by_id() {
        let rows = vec![
            record(1, "A", "X", 0.9, 1),
            record(0, "B", "Y", 0.8, 0),
            record(1, "C", "Z", 0.7, 0),
        ];
        let folds = split_folds(rows);
        assert_eq!(folds.len(), 2);
        assert_eq!(folds[&0].len(), 1);
        assert_eq!(folds[&1].len(), 2);
    }
}
