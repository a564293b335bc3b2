//! Updater configuration.
//!
//! Built once in `main` from an optional TOML file and `IBTRACS_*`
//! environment variables, then passed by reference to every component.

use std::path::{Path, PathBuf};

use ibtracs_store_sqlite::expand_tilde;
use serde::Deserialize;

/// NOAA's all-basins IBTrACS list, version v04r01.
pub const DEFAULT_CSV_URL: &str = "https://www.ncei.noaa.gov/data/international-best-track-archive-for-climate-stewardship-ibtracs/v04r01/access/csv/ibtracs.ALL.list.v04r01.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct UpdaterConfig {
  /// SQLite database file; a leading `~/` is expanded.
  #[serde(default = "default_database_path")]
  pub database_path:           PathBuf,
  /// Archive download location, used when no local CSV is supplied.
  #[serde(default = "default_csv_url")]
  pub csv_url:                 String,
  /// How far before the watermark an incremental run reaches back to pick up
  /// revised observations. Zero keeps strictly-newer rows only.
  #[serde(default)]
  pub revision_lookback_hours: u32,
}

fn default_database_path() -> PathBuf { PathBuf::from("data/storms.db") }

fn default_csv_url() -> String { DEFAULT_CSV_URL.to_owned() }

impl Default for UpdaterConfig {
  fn default() -> Self {
    Self {
      database_path:           default_database_path(),
      csv_url:                 default_csv_url(),
      revision_lookback_hours: 0,
    }
  }
}

impl UpdaterConfig {
  /// Load from `path` (optional) overlaid with `IBTRACS_*` environment
  /// variables.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.as_ref()).required(false))
      .add_source(config::Environment::with_prefix("IBTRACS").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn database_path(&self) -> PathBuf { expand_tilde(&self.database_path) }

  pub fn revision_lookback(&self) -> chrono::Duration {
    chrono::Duration::hours(i64::from(self.revision_lookback_hours))
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let cfg = UpdaterConfig::load("/nonexistent/updater.toml").unwrap();
    assert_eq!(cfg.csv_url, DEFAULT_CSV_URL);
    assert_eq!(cfg.revision_lookback(), chrono::Duration::zero());
  }

  #[test]
  fn reads_toml_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "database_path = \"/tmp/storms.db\"\nrevision_lookback_hours = 48"
    )
    .unwrap();

    let cfg = UpdaterConfig::load(file.path()).unwrap();
    assert_eq!(cfg.database_path(), PathBuf::from("/tmp/storms.db"));
    assert_eq!(cfg.revision_lookback(), chrono::Duration::hours(48));
    assert_eq!(cfg.csv_url, DEFAULT_CSV_URL);
  }

  #[test]
  fn tilde_is_expanded() {
    let cfg = UpdaterConfig {
      database_path: PathBuf::from("~/storms.db"),
      ..Default::default()
    };
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(cfg.database_path(), PathBuf::from(home).join("storms.db"));
    }
  }
}
