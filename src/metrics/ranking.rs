//! Per-ligand precision@L and recall@L.
//!
//! Both metrics rank each ligand's candidate targets by score and look at
//! the top-L prefix, then average across ligands. The cutoff L is fixed by
//! the caller (the evaluation table uses L = 20).

use std::collections::BTreeMap;

use super::nanmean;
use crate::data::PredictionRecord;
use crate::error::EvalError;

fn check_cutoff(l: usize) -> Result<(), EvalError> {
    if l == 0 {
        return Err(EvalError::InvalidArgument(
            "ranking cutoff L must be positive".to_owned(),
        ));
    }
    Ok(())
}

/// Per-ligand (score, label) lists, sorted by score descending. Groups
/// iterate in ligand-name order and the sort is stable, so tied scores
/// resolve by input order and reruns are reproducible.
fn ranked_groups(records: &[PredictionRecord]) -> BTreeMap<&str, Vec<(f64, u8)>> {
    let mut groups: BTreeMap<&str, Vec<(f64, u8)>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.ligand.as_str())
            .or_default()
            .push((record.score, record.label));
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    }
    groups
}

/// Precision at L, averaged across ligands.
///
/// The denominator is always L: a ligand with fewer than L candidates
/// counts the missing slots as misses. NaN only when there are no ligands.
pub fn precision_at_l(records: &[PredictionRecord], l: usize) -> Result<f64, EvalError> {
    check_cutoff(l)?;
    let per_ligand: Vec<f64> = ranked_groups(records)
        .values()
        .map(|group| {
            let hits: f64 = group.iter().take(l).map(|&(_, label)| label as f64).sum();
            hits / l as f64
        })
        .collect();
    Ok(nanmean(&per_ligand))
}

/// Recall at L, averaged across ligands.
///
/// A ligand with no positives has undefined recall; it contributes NaN and
/// is excluded from the mean rather than dragging it toward zero.
pub fn recall_at_l(records: &[PredictionRecord], l: usize) -> Result<f64, EvalError> {
    check_cutoff(l)?;
    let per_ligand: Vec<f64> = ranked_groups(records)
        .values()
        .map(|group| {
            let total: f64 = group.iter().map(|&(_, label)| label as f64).sum();
            if total == 0.0 {
                return f64::NAN;
            }
            let hits: f64 = group.iter().take(l).map(|&(_, label)| label as f64).sum();
            hits / total
        })
        .collect();
    Ok(nanmean(&per_ligand))
}

// =============================================================================
// Tests
// =============================================================================
