//! Layered configuration: TOML file, then `DEFICIT_*` environment variables,
//! then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/deficit/config.toml";
const DEFAULT_STORE_PATH: &str = "~/.local/share/deficit/deficit.db";

/// Runtime settings, deserialised from the config file and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding history, favorites and the theme flag.
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Alternative catalog document; the bundled catalog is used when unset.
  #[serde(default)]
  pub catalog_path: Option<PathBuf>,
  /// Append log output here. Without it the TUI logs nowhere.
  #[serde(default)]
  pub log_file:     Option<PathBuf>,
}

fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:   default_store_path(),
      catalog_path: None,
      log_file:     None,
    }
  }
}

impl Settings {
  /// Read `config_file` (optional) and `DEFICIT_*` variables.
  pub fn load(config_file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(expand_tilde(config_file)).required(false))
      .add_source(config::Environment::with_prefix("DEFICIT"))
      .build()
      .with_context(|| {
        format!("failed to read config file {}", config_file.display())
      })?;

    let mut settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.expand_paths();
    Ok(settings)
  }

  /// Apply command-line overrides.
  pub fn override_with(
    mut self,
    store_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    log_file: Option<PathBuf>,
  ) -> Self {
    if let Some(path) = store_path {
      self.store_path = path;
    }
    if catalog_path.is_some() {
      self.catalog_path = catalog_path;
    }
    if log_file.is_some() {
      self.log_file = log_file;
    }
    self.expand_paths();
    self
  }

  fn expand_paths(&mut self) {
    self.store_path = expand_tilde(&self.store_path);
    self.catalog_path = self.catalog_path.as_deref().map(expand_tilde);
    self.log_file = self.log_file.as_deref().map(expand_tilde);
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert!(settings.store_path.ends_with("deficit/deficit.db"));
    assert!(settings.catalog_path.is_none());
  }

  #[test]
  fn file_values_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "store_path = \"/tmp/one.db\"").unwrap();
    writeln!(file, "catalog_path = \"/tmp/catalog.json\"").unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/tmp/one.db"));
    assert_eq!(
      settings.catalog_path.as_deref(),
      Some(Path::new("/tmp/catalog.json"))
    );

    let settings =
      settings.override_with(Some(PathBuf::from("/tmp/two.db")), None, None);
    assert_eq!(settings.store_path, PathBuf::from("/tmp/two.db"));
    assert!(settings.catalog_path.is_some());
  }

  #[test]
  fn tilde_expands_to_home() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/x/y.db")),
        PathBuf::from(home).join("x/y.db")
      );
    }
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
