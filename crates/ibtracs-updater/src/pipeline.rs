//! The update run: watermark → input → normalise & filter → tail deletion →
//! upsert → report.

use std::{
  collections::{BTreeMap, BTreeSet},
  path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use ibtracs_core::{
  filter::IncrementalFilter,
  genesis::GenesisResolver,
  normalize::normalize,
  store::TrackStore,
  track::TrackPoint,
};

use crate::{Error, Result, UpdaterConfig, download, source};

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
  /// The store was empty; every valid row is a candidate.
  Full,
  /// Only rows after the cutoff are candidates.
  Incremental,
}

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
  pub mode:             UpdateMode,
  pub rows_read:        u64,
  pub rows_rejected:    u64,
  pub candidates:       u64,
  pub storms_touched:   u64,
  pub tails_deleted:    u64,
  pub upserted:         u64,
  pub watermark_before: Option<NaiveDateTime>,
  pub watermark_after:  Option<NaiveDateTime>,
}

// ─── Normalise & filter ──────────────────────────────────────────────────────

/// The filtered output of one pass over the archive.
#[derive(Debug)]
pub struct Batch {
  pub rows_read:     u64,
  pub rows_rejected: u64,
  pub candidates:    Vec<TrackPoint>,
}

/// Resolve genesis over the whole file, then normalise every row and keep
/// those passing `filter`.
///
/// Blocking; run it off the async runtime.
pub fn collect_candidates(path: &Path, filter: IncrementalFilter) -> Result<Batch> {
  let mut resolver = GenesisResolver::new();
  source::scan(path, |record| resolver.observe(record))?;
  let origins = resolver.finish();
  tracing::debug!(storms = origins.len(), "resolved storm origins");

  let mut candidates = Vec::new();
  let mut rows_rejected = 0;
  let rows_read = source::scan(path, |record| match normalize(record, &origins) {
    Some(point) if filter.passes(&point) => candidates.push(point),
    Some(_) => {}
    None => rows_rejected += 1,
  })?;

  Ok(Batch { rows_read, rows_rejected, candidates })
}

// ─── Tail deletion ───────────────────────────────────────────────────────────

/// The watermark moved back by `lookback`. A look-back reaching past the
/// earliest representable time covers all history.
pub fn cutoff_for(watermark: NaiveDateTime, lookback: chrono::Duration) -> NaiveDateTime {
  watermark
    .checked_sub_signed(lookback)
    .unwrap_or(NaiveDateTime::MIN)
}

/// A storm whose stored track after `after` is replaced by the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailDeletion {
  pub storm_id: String,
  pub after:    NaiveDateTime,
}

/// Storms whose earliest candidate is at or before the watermark get their
/// stored points after `cutoff` deleted before the upsert.
///
/// Nothing is planned without a watermark.
pub fn plan_tail_deletions(
  candidates: &[TrackPoint],
  watermark: Option<NaiveDateTime>,
  cutoff: Option<NaiveDateTime>,
) -> Vec<TailDeletion> {
  let (Some(watermark), Some(cutoff)) = (watermark, cutoff) else {
    return Vec::new();
  };

  let mut earliest: BTreeMap<&str, NaiveDateTime> = BTreeMap::new();
  for point in candidates {
    earliest
      .entry(point.storm_id.as_str())
      .and_modify(|t| *t = (*t).min(point.observation_time))
      .or_insert(point.observation_time);
  }

  earliest
    .into_iter()
    .filter(|(_, first)| *first <= watermark)
    .map(|(storm_id, _)| TailDeletion { storm_id: storm_id.to_owned(), after: cutoff })
    .collect()
}

// ─── Updater ─────────────────────────────────────────────────────────────────

/// Runs updates against any [`TrackStore`].
pub struct Updater<'a, S> {
  store:  &'a S,
  config: &'a UpdaterConfig,
}

impl<'a, S: TrackStore> Updater<'a, S> {
  pub fn new(store: &'a S, config: &'a UpdaterConfig) -> Self { Self { store, config } }

  /// Run one update. `csv` overrides the configured download.
  pub async fn run(&self, csv: Option<&Path>) -> Result<UpdateReport> {
    self.store.ensure_schema().await.map_err(Error::store)?;

    let watermark = self
      .store
      .latest_observation_time()
      .await
      .map_err(Error::store)?;
    let mode = match watermark {
      None => UpdateMode::Full,
      Some(_) => UpdateMode::Incremental,
    };
    let cutoff = watermark.map(|w| cutoff_for(w, self.config.revision_lookback()));
    tracing::info!(?mode, ?watermark, ?cutoff, "starting update");

    let input = download::acquire(csv, &self.config.csv_url).await?;
    let result = self
      .apply(input.path().to_path_buf(), mode, watermark, cutoff)
      .await;
    input.cleanup();

    let report = result?;
    tracing::info!(
      mode = ?report.mode,
      rows_read = report.rows_read,
      rows_rejected = report.rows_rejected,
      candidates = report.candidates,
      storms_touched = report.storms_touched,
      tails_deleted = report.tails_deleted,
      upserted = report.upserted,
      watermark_before = ?report.watermark_before,
      watermark_after = ?report.watermark_after,
      "update complete"
    );
    Ok(report)
  }

  async fn apply(
    &self,
    path: PathBuf,
    mode: UpdateMode,
    watermark: Option<NaiveDateTime>,
    cutoff: Option<NaiveDateTime>,
  ) -> Result<UpdateReport> {
    let filter = IncrementalFilter::new(cutoff);
    let batch =
      tokio::task::spawn_blocking(move || collect_candidates(&path, filter)).await??;
    tracing::info!(
      rows_read = batch.rows_read,
      rows_rejected = batch.rows_rejected,
      candidates = batch.candidates.len(),
      "normalised archive"
    );

    let mut report = UpdateReport {
      mode,
      rows_read: batch.rows_read,
      rows_rejected: batch.rows_rejected,
      candidates: batch.candidates.len() as u64,
      storms_touched: 0,
      tails_deleted: 0,
      upserted: 0,
      watermark_before: watermark,
      watermark_after: watermark,
    };

    if batch.candidates.is_empty() {
      tracing::info!("no new observations");
      return Ok(report);
    }

    let storms: BTreeSet<&str> = batch
      .candidates
      .iter()
      .map(|p| p.storm_id.as_str())
      .collect();
    report.storms_touched = storms.len() as u64;

    for tail in plan_tail_deletions(&batch.candidates, watermark, cutoff) {
      let deleted = self
        .store
        .delete_tail(&tail.storm_id, tail.after)
        .await
        .map_err(Error::store)?;
      tracing::debug!(storm_id = %tail.storm_id, after = %tail.after, deleted, "deleted storm tail");
      report.tails_deleted += deleted;
    }

    report.upserted = self
      .store
      .upsert(&batch.candidates)
      .await
      .map_err(Error::store)?;

    report.watermark_after = self
      .store
      .latest_observation_time()
      .await
      .map_err(Error::store)?;

    Ok(report)
  }
}
