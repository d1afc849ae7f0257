//! Symptom → deficiency scoring.
//!
//! Every selected symptom casts one vote for each substance in its evidence
//! list. Substances are ranked by votes; ties keep the order in which the
//! substances were first seen. Confidence is the share of selected symptoms
//! that voted for the substance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  Error, Result,
  catalog::{Catalog, Substance, SubstanceId},
  selection::Selection,
};

/// Maximum number of ranked results returned by [`score`].
pub const MAX_RESULTS: usize = 5;

/// How many results the share text names.
const SHARE_TOP: usize = 3;

// ─── Results ─────────────────────────────────────────────────────────────────

/// One ranked candidate deficiency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
  pub substance:     Substance,
  /// Number of selected symptoms whose evidence list names this substance.
  pub support_count: usize,
  /// `support_count / |selection|`, in (0, 1].
  pub confidence:    f64,
}

impl ScoreResult {
  pub fn band(&self) -> ConfidenceBand { ConfidenceBand::of(self.confidence) }
}

/// Presentation bucket for a confidence value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConfidenceBand {
  High,
  Medium,
  Low,
}

impl ConfidenceBand {
  /// Lower bounds are inclusive: 0.6 is high, 0.3 is medium.
  pub fn of(confidence: f64) -> Self {
    if confidence >= 0.6 {
      Self::High
    } else if confidence >= 0.3 {
      Self::Medium
    } else {
      Self::Low
    }
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Rank candidate substances for `selection`.
///
/// Returns [`Error::EmptySelection`] if nothing is selected. An empty result
/// list is not an error; it means no selected symptom evidences anything.
pub fn score(catalog: &Catalog, selection: &Selection) -> Result<Vec<ScoreResult>> {
  if selection.is_empty() {
    return Err(Error::EmptySelection);
  }

  // Tally in first-encounter order; the index map only locates the slot.
  let mut tally: Vec<(&SubstanceId, usize)> = Vec::new();
  let mut slots: HashMap<&SubstanceId, usize> = HashMap::new();
  for symptom in selection.iter() {
    let evidence = catalog.lookup_substances_for(symptom);
    if evidence.is_empty() {
      tracing::debug!(symptom, "symptom evidences no substance");
    }
    for id in evidence {
      let slot = *slots.entry(id).or_insert_with(|| {
        tally.push((id, 0));
        tally.len() - 1
      });
      tally[slot].1 += 1;
    }
  }

  // `sort_by` is stable, which is what keeps ties in first-seen order.
  tally.sort_by(|a, b| b.1.cmp(&a.1));
  tally.truncate(MAX_RESULTS);

  let total = selection.len() as f64;
  let results = tally
    .into_iter()
    .map(|(id, count)| {
      Ok(ScoreResult {
        substance:     catalog.get_substance(id.as_str())?.clone(),
        support_count: count,
        confidence:    count as f64 / total,
      })
    })
    .collect::<Result<Vec<_>>>()?;

  tracing::debug!(
    selected = selection.len(),
    results = results.len(),
    "scored selection"
  );
  Ok(results)
}

/// One-line summary naming the top results, suitable for sharing.
///
/// Returns `None` when there is nothing to recommend.
pub fn share_text(results: &[ScoreResult]) -> Option<String> {
  if results.is_empty() {
    return None;
  }
  let names = results
    .iter()
    .take(SHARE_TOP)
    .map(|r| r.substance.name.as_str())
    .collect::<Vec<_>>()
    .join(", ");
  Some(format!("Based on the symptoms, you may need: {names}"))
}
