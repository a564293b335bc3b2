//! Incremental IBTrACS ingestion.
//!
//! Reads the archive CSV (a local file or a fresh download), normalises every
//! row, keeps the rows newer than the store's watermark, replaces revised
//! storm tails, and upserts the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = UpdaterConfig::load("updater.toml")?;
//! let report = ibtracs_updater::run(&config, None).await?;
//! ```

pub mod config;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod source;

use std::path::Path;

use ibtracs_store_sqlite::SqliteStore;

pub use config::UpdaterConfig;
pub use error::{Error, Result};
pub use pipeline::{UpdateMode, UpdateReport, Updater};

/// Open the configured store, run one update, and close the store on every
/// exit path.
///
/// `csv` overrides the download with a local file.
pub async fn run(config: &UpdaterConfig, csv: Option<&Path>) -> Result<UpdateReport> {
  let database_path = config.database_path();
  tracing::info!(path = %database_path.display(), "opening track store");
  let store = SqliteStore::open(&database_path)
    .await
    .map_err(Error::store)?;

  let result = Updater::new(&store, config).run(csv).await;
  if let Err(e) = &result {
    tracing::error!(error = %e, "update failed");
  }

  if let Err(e) = store.close().await {
    tracing::warn!(error = %e, "failed to close track store");
  }

  result
}
