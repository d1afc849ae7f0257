//! The reference catalog: substances and the symptoms that evidence them.
//!
//! A [`Catalog`] is built once at startup and never mutated. Integrity rules
//! (no dangling substance references, no duplicates) are checked when it is
//! built, so lookups on a constructed catalog only fail on ids the caller
//! invented.

use std::{borrow::Borrow, collections::HashMap, fmt, path::Path};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// The catalog bundled with the library.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Stable identifier of a substance, e.g. `vitamin-d` or `iron`.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubstanceId(String);

impl SubstanceId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SubstanceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for SubstanceId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for SubstanceId {
  fn from(s: String) -> Self { Self(s) }
}

impl Borrow<str> for SubstanceId {
  fn borrow(&self) -> &str { &self.0 }
}

impl AsRef<str> for SubstanceId {
  fn as_ref(&self) -> &str { &self.0 }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Whether a substance is a vitamin or a mineral.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
  #[serde(alias = "vitamins")]
  Vitamin,
  #[serde(alias = "minerals")]
  Mineral,
}

/// A vitamin or mineral and everything shown about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
  pub id:                SubstanceId,
  pub name:              String,
  pub scientific_name:   String,
  pub category:          Category,
  /// Short deficiency symptoms, most characteristic first.
  pub symptoms:          Vec<String>,
  pub detailed_symptoms: Vec<String>,
  /// Food sources, most recommended first.
  pub sources:           Vec<String>,
  pub daily_requirement: String,
  pub risk_groups:       Vec<String>,
  /// 1 (mild) to 3 (serious). Informational only; never used in scoring.
  pub severity:          u8,
  pub icon:              String,
}

impl Substance {
  /// The symptoms shown on a result card.
  pub fn card_symptoms(&self) -> &[String] {
    &self.symptoms[..self.symptoms.len().min(3)]
  }

  /// The food sources shown on a result card.
  pub fn card_sources(&self) -> &[String] {
    &self.sources[..self.sources.len().min(4)]
  }
}

/// One symptom and the substances it is evidence for, in evidence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomEntry {
  pub id:         String,
  pub label:      String,
  pub substances: Vec<SubstanceId>,
}

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
  substances: Vec<Substance>,
  symptoms:   Vec<SymptomEntry>,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Immutable symptom → substance lookup table plus the substance records.
#[derive(Debug, Clone)]
pub struct Catalog {
  substances:      Vec<Substance>,
  substance_index: HashMap<SubstanceId, usize>,
  symptoms:        Vec<SymptomEntry>,
  symptom_index:   HashMap<String, usize>,
}

impl Catalog {
  /// Build a catalog, rejecting data that breaks the integrity rules.
  pub fn new(
    substances: Vec<Substance>,
    symptoms: Vec<SymptomEntry>,
  ) -> Result<Self> {
    let mut substance_index = HashMap::with_capacity(substances.len());
    for (i, substance) in substances.iter().enumerate() {
      if !(1..=3).contains(&substance.severity) {
        return Err(Error::InvalidCatalog(format!(
          "substance {} has severity {} outside 1-3",
          substance.id, substance.severity
        )));
      }
      if substance_index.insert(substance.id.clone(), i).is_some() {
        return Err(Error::InvalidCatalog(format!(
          "duplicate substance id {}",
          substance.id
        )));
      }
    }

    let mut symptom_index = HashMap::with_capacity(symptoms.len());
    for (i, entry) in symptoms.iter().enumerate() {
      if symptom_index.insert(entry.id.clone(), i).is_some() {
        return Err(Error::InvalidCatalog(format!(
          "duplicate symptom id {:?}",
          entry.id
        )));
      }
      for (pos, id) in entry.substances.iter().enumerate() {
        if !substance_index.contains_key(id) {
          return Err(Error::InvalidCatalog(format!(
            "symptom {:?} references unknown substance {id}",
            entry.id
          )));
        }
        if entry.substances[..pos].contains(id) {
          return Err(Error::InvalidCatalog(format!(
            "symptom {:?} lists substance {id} twice",
            entry.id
          )));
        }
      }
    }

    Ok(Self {
      substances,
      substance_index,
      symptoms,
      symptom_index,
    })
  }

  /// The catalog bundled with the library.
  pub fn builtin() -> Result<Self> { Self::from_json(BUILTIN_CATALOG) }

  /// Parse a catalog document (`{"substances": [...], "symptoms": [...]}`).
  pub fn from_json(json: &str) -> Result<Self> {
    let doc: CatalogDocument = serde_json::from_str(json)?;
    Self::new(doc.substances, doc.symptoms)
  }

  /// Read and parse a catalog document from disk.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json(&raw)
  }

  /// Substance ids evidenced by `symptom`; empty for unknown symptoms.
  pub fn lookup_substances_for(&self, symptom: &str) -> &[SubstanceId] {
    self
      .symptom_index
      .get(symptom)
      .map(|&i| self.symptoms[i].substances.as_slice())
      .unwrap_or_default()
  }

  /// Resolve a substance id to its record.
  pub fn get_substance(&self, id: &str) -> Result<&Substance> {
    self
      .substance_index
      .get(id)
      .map(|&i| &self.substances[i])
      .ok_or_else(|| Error::NotFound(SubstanceId::from(id)))
  }

  /// Display label of a symptom, if the catalog knows it.
  pub fn symptom_label(&self, symptom: &str) -> Option<&str> {
    self
      .symptom_index
      .get(symptom)
      .map(|&i| self.symptoms[i].label.as_str())
  }

  /// All symptom entries, in catalog order.
  pub fn symptoms(&self) -> &[SymptomEntry] { &self.symptoms }

  /// All substance records, in catalog order.
  pub fn substances(&self) -> &[Substance] { &self.substances }
}
