//! The `TrackStore` trait.
//!
//! Implemented by storage backends (e.g. `ibtracs-store-sqlite`). The updater
//! and the HTTP API depend on this abstraction, not on a concrete backend.

use std::future::Future;

use chrono::NaiveDateTime;

use crate::track::TrackPoint;

/// Abstraction over a track point store.
///
/// Rows are keyed by `(storm_id, observation_time)`. All methods return `Send`
/// futures so the trait works inside multi-threaded runtimes (e.g. tokio with
/// `axum`).
pub trait TrackStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Create the track table and its indexes if absent. Idempotent.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Latest stored observation time, or `None` for an empty store. This is
  /// the watermark of the next incremental run.
  fn latest_observation_time(
    &self,
  ) -> impl Future<Output = Result<Option<NaiveDateTime>, Self::Error>> + Send + '_;

  /// Delete every point of `storm_id` observed strictly after `after`.
  /// Returns the number of rows removed.
  fn delete_tail<'a>(
    &'a self,
    storm_id: &'a str,
    after: NaiveDateTime,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Insert `points`, overwriting every non-key column on key conflict.
  ///
  /// The batch is applied atomically. Returns the number of rows inserted or
  /// updated; an empty batch is a no-op returning 0.
  fn upsert<'a>(
    &'a self,
    points: &'a [TrackPoint],
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All rows of storms whose genesis falls in the given calendar month,
  /// ordered by storm id then observation time.
  fn storms_by_month(
    &self,
    year: i32,
    month: u32,
  ) -> impl Future<Output = Result<Vec<TrackPoint>, Self::Error>> + Send + '_;

  /// Total number of stored points.
  fn count_points(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
