//! Error types for `deficit-core`.

use thiserror::Error;

use crate::catalog::SubstanceId;

#[derive(Debug, Error)]
pub enum Error {
  /// Scoring was requested with no symptoms selected.
  #[error("no symptoms selected")]
  EmptySelection,

  /// A substance id has no record in the catalog.
  #[error("substance not found: {0}")]
  NotFound(SubstanceId),

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("stored value under {key:?} is corrupt: {source}")]
  CorruptValue {
    key:    &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid catalog: {0}")]
  InvalidCatalog(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Wrap a backend error as [`Error::StoreUnavailable`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
