//! Saved scoring sessions, favorite substances, and the theme flag.
//!
//! Everything is persisted through a [`KeyValueStore`] under three keys:
//! `history` (JSON list of [`HistoryRecord`], newest first, capped at
//! [`HISTORY_CAPACITY`]), `favorites` (JSON list of substance ids) and
//! `darkMode` (`"true"` / `"false"`).
//!
//! Store failures are reported as [`Error::StoreUnavailable`] from the
//! operation that hit them and nowhere else; scoring never touches the store.

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  catalog::{Catalog, SubstanceId},
  scoring::{self, ScoreResult},
  selection::Selection,
  store::KeyValueStore,
};

pub const HISTORY_KEY: &str = "history";
pub const FAVORITES_KEY: &str = "favorites";
pub const THEME_KEY: &str = "darkMode";

/// Most records kept; saving past this evicts the oldest.
pub const HISTORY_CAPACITY: usize = 10;

// ─── Records ─────────────────────────────────────────────────────────────────

/// What a saved session remembers about one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultProjection {
  pub id:         SubstanceId,
  pub name:       String,
  pub confidence: f64,
}

impl From<&ScoreResult> for ResultProjection {
  fn from(result: &ScoreResult) -> Self {
    Self {
      id:         result.substance.id.clone(),
      name:       result.substance.name.clone(),
      confidence: result.confidence,
    }
  }
}

/// A saved scoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
  #[serde(with = "iso_millis")]
  pub date:     DateTime<Utc>,
  pub symptoms: Selection,
  pub results:  Vec<ResultProjection>,
}

impl HistoryRecord {
  /// Re-run the stored selection against `catalog`.
  ///
  /// The stored projections are not consulted, so the outcome reflects the
  /// catalog as it is now.
  pub fn replay(&self, catalog: &Catalog) -> Result<Vec<ScoreResult>> {
    scoring::score(catalog, &self.symptoms)
  }

  /// Short description for history listings.
  pub fn summary(&self) -> String {
    format!(
      "{} possible results - {} symptoms",
      self.results.len(),
      self.symptoms.len()
    )
  }
}

/// RFC 3339 in UTC with millisecond precision, e.g.
/// `2024-05-01T09:30:00.000Z`.
mod iso_millis {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(D::Error::custom)
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Session history and user preferences on top of a [`KeyValueStore`].
///
/// Favorites are read once in [`HistoryStore::open`] and kept in memory, so
/// [`HistoryStore::is_favorite`] never touches the backend. History and the
/// theme flag are read on demand.
#[derive(Debug)]
pub struct HistoryStore<S> {
  store:     S,
  favorites: Vec<SubstanceId>,
}

impl<S: KeyValueStore> HistoryStore<S> {
  /// Wrap `store`, loading the favorite set.
  ///
  /// An unreadable favorite set is logged and treated as empty. Repeated ids
  /// keep their first occurrence only.
  pub fn open(store: S) -> Self {
    let stored = match read_json::<_, Vec<SubstanceId>>(&store, FAVORITES_KEY) {
      Ok(favorites) => favorites.unwrap_or_default(),
      Err(e) => {
        tracing::warn!(error = %e, "could not load favorites, starting empty");
        Vec::new()
      }
    };
    let mut favorites: Vec<SubstanceId> = Vec::with_capacity(stored.len());
    for id in stored {
      if !favorites.contains(&id) {
        favorites.push(id);
      }
    }
    Self { store, favorites }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn into_inner(self) -> S { self.store }

  // ── History ──────────────────────────────────────────────────────────────

  /// Record a session timestamped now. See [`HistoryStore::save_session_at`].
  pub fn save_session(
    &mut self,
    selection: &Selection,
    results: &[ScoreResult],
  ) -> Result<HistoryRecord> {
    self.save_session_at(selection, results, Utc::now())
  }

  /// Prepend a session recorded at `date`, dropping the oldest records beyond
  /// [`HISTORY_CAPACITY`].
  ///
  /// `date` is truncated to the millisecond precision it is stored with, so
  /// the returned record equals the one read back later. A corrupt stored
  /// history is logged and replaced; only store failures are returned.
  pub fn save_session_at(
    &mut self,
    selection: &Selection,
    results: &[ScoreResult],
    date: DateTime<Utc>,
  ) -> Result<HistoryRecord> {
    let record = HistoryRecord {
      date: date.trunc_subsecs(3),
      symptoms: selection.clone(),
      results: results.iter().map(ResultProjection::from).collect(),
    };

    let mut history = match self.load_history() {
      Ok(history) => history,
      Err(e @ Error::CorruptValue { .. }) => {
        tracing::warn!(error = %e, "discarding unreadable history");
        Vec::new()
      }
      Err(e) => return Err(e),
    };
    history.insert(0, record.clone());
    history.truncate(HISTORY_CAPACITY);

    let raw = serde_json::to_string(&history)?;
    self.store.set(HISTORY_KEY, &raw).map_err(Error::store)?;

    tracing::info!(
      symptoms = record.symptoms.len(),
      results = record.results.len(),
      kept = history.len(),
      "saved session"
    );
    Ok(record)
  }

  /// Saved sessions, newest first. Empty when nothing has been saved.
  pub fn load_history(&self) -> Result<Vec<HistoryRecord>> {
    Ok(read_json(&self.store, HISTORY_KEY)?.unwrap_or_default())
  }

  /// Re-score the record at `index` (0 = newest). `None` if there is none.
  pub fn replay(
    &self,
    catalog: &Catalog,
    index: usize,
  ) -> Result<Option<Vec<ScoreResult>>> {
    let history = self.load_history()?;
    history
      .get(index)
      .map(|record| record.replay(catalog))
      .transpose()
  }

  // ── Favorites ────────────────────────────────────────────────────────────

  /// Flip `id` in the favorite set and persist. Returns the new membership.
  ///
  /// If the write fails the in-memory set is restored before the error is
  /// returned.
  pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
    let removed_at = self.favorites.iter().position(|f| f.as_str() == id);
    match removed_at {
      Some(pos) => {
        self.favorites.remove(pos);
      }
      None => self.favorites.push(SubstanceId::from(id)),
    }
    let now_favorite = removed_at.is_none();

    if let Err(e) = self.persist_favorites() {
      match removed_at {
        Some(pos) => self.favorites.insert(pos, SubstanceId::from(id)),
        None => {
          self.favorites.pop();
        }
      }
      return Err(e);
    }

    tracing::debug!(id, favorite = now_favorite, "toggled favorite");
    Ok(now_favorite)
  }

  pub fn is_favorite(&self, id: &str) -> bool {
    self.favorites.iter().any(|f| f.as_str() == id)
  }

  /// Favorite ids in the order they were added.
  pub fn favorites(&self) -> &[SubstanceId] { &self.favorites }

  fn persist_favorites(&mut self) -> Result<()> {
    let raw = serde_json::to_string(&self.favorites)?;
    self.store.set(FAVORITES_KEY, &raw).map_err(Error::store)
  }

  // ── Theme ────────────────────────────────────────────────────────────────

  /// Whether the dark theme is on. Unreadable values count as off.
  pub fn theme(&self) -> bool {
    match self.store.get(THEME_KEY) {
      Ok(value) => value.as_deref() == Some("true"),
      Err(e) => {
        tracing::warn!(error = %e, "could not read theme preference");
        false
      }
    }
  }

  pub fn set_theme(&mut self, dark: bool) -> Result<()> {
    let value = if dark { "true" } else { "false" };
    self.store.set(THEME_KEY, value).map_err(Error::store)
  }
}

/// Read and decode the JSON value under `key`, if any.
fn read_json<S, T>(store: &S, key: &'static str) -> Result<Option<T>>
where
  S: KeyValueStore,
  T: serde::de::DeserializeOwned,
{
  let Some(raw) = store.get(key).map_err(Error::store)? else {
    return Ok(None);
  };
  serde_json::from_str(&raw)
    .map(Some)
    .map_err(|source| Error::CorruptValue { key, source })
}
