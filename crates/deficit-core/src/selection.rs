//! The set of symptoms a user has picked for one scoring session.

use serde::{Deserialize, Serialize};

/// Unique, insertion-ordered set of symptom ids.
///
/// Membership is what matters for scoring; the insertion order only decides
/// how ties between equally supported substances are broken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Selection {
  symptoms: Vec<String>,
}

impl Selection {
  pub fn new() -> Self { Self::default() }

  /// Add `symptom`. Returns `false` if it was already selected.
  pub fn add(&mut self, symptom: impl Into<String>) -> bool {
    let symptom = symptom.into();
    if self.contains(&symptom) {
      return false;
    }
    self.symptoms.push(symptom);
    true
  }

  /// Remove `symptom`. Returns `false` if it was not selected.
  pub fn remove(&mut self, symptom: &str) -> bool {
    let before = self.symptoms.len();
    self.symptoms.retain(|s| s != symptom);
    self.symptoms.len() != before
  }

  /// Flip membership of `symptom` and return whether it is now selected.
  pub fn toggle(&mut self, symptom: &str) -> bool {
    if self.remove(symptom) {
      false
    } else {
      self.symptoms.push(symptom.to_owned());
      true
    }
  }

  pub fn contains(&self, symptom: &str) -> bool {
    self.symptoms.iter().any(|s| s == symptom)
  }

  pub fn clear(&mut self) { self.symptoms.clear(); }

  pub fn len(&self) -> usize { self.symptoms.len() }

  pub fn is_empty(&self) -> bool { self.symptoms.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.symptoms.iter().map(String::as_str)
  }

  pub fn as_slice(&self) -> &[String] { &self.symptoms }
}

impl<S: Into<String>> FromIterator<S> for Selection {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut selection = Self::new();
    for symptom in iter {
      selection.add(symptom);
    }
    selection
  }
}

impl From<Vec<String>> for Selection {
  fn from(symptoms: Vec<String>) -> Self { symptoms.into_iter().collect() }
}

impl From<Selection> for Vec<String> {
  fn from(selection: Selection) -> Self { selection.symptoms }
}
