//! [`SqliteStore`]: the SQLite implementation of [`TrackStore`].

use std::path::Path;

use chrono::NaiveDateTime;
use ibtracs_core::{store::TrackStore, storm::month_range, track::TrackPoint};

use crate::{
  Result,
  encode::{RawTrackPoint, decode_dt, encode_dt, encode_radii},
  schema::{COLUMN_LIST, SCHEMA, UPSERT},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A track store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Opening does
/// not create the schema; call [`TrackStore::ensure_schema`] first.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  /// Close the underlying connection, flushing any pending work.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── TrackStore impl ─────────────────────────────────────────────────────────

impl TrackStore for SqliteStore {
  type Error = crate::Error;

  async fn ensure_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn latest_observation_time(&self) -> Result<Option<NaiveDateTime>> {
    let latest: Option<String> = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT MAX(time) FROM storms", [], |r| r.get(0))?))
      .await?;

    latest.as_deref().map(decode_dt).transpose()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn delete_tail(&self, storm_id: &str, after: NaiveDateTime) -> Result<u64> {
    let id = storm_id.to_owned();
    let after_str = encode_dt(after);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          r#"DELETE FROM storms WHERE "ID" = ?1 AND time > ?2"#,
          rusqlite::params![id, after_str],
        )?)
      })
      .await?;

    Ok(u64::try_from(deleted)?)
  }

  async fn upsert(&self, points: &[TrackPoint]) -> Result<u64> {
    if points.is_empty() {
      return Ok(0);
    }
    let points = points.to_vec();

    let affected = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut affected = 0usize;
        {
          let mut stmt = tx.prepare_cached(UPSERT.as_str())?;
          for p in &points {
            let [r34_ne, r34_se, r34_sw, r34_nw, r50_ne, r50_se, r50_sw, r50_nw, r64_ne, r64_se, r64_sw, r64_nw] =
              encode_radii(p);
            affected += stmt.execute(rusqlite::params![
              p.storm_id,
              p.atcf_id,
              p.name,
              p.basin,
              p.subbasin,
              p.season,
              encode_dt(p.genesis),
              encode_dt(p.observation_time),
              p.lat,
              p.lon,
              p.wind,
              p.mslp,
              p.speed,
              p.dist2land,
              p.classification,
              p.rmw,
              p.basin_time,
              p.subbasin_time,
              p.agency,
              r34_ne,
              r34_se,
              r34_sw,
              r34_nw,
              r50_ne,
              r50_se,
              r50_sw,
              r50_nw,
              r64_ne,
              r64_se,
              r64_sw,
              r64_nw,
            ])?;
          }
        }
        tx.commit()?;
        Ok(affected)
      })
      .await?;

    tracing::debug!(affected, "upserted track points");
    Ok(u64::try_from(affected)?)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn storms_by_month(&self, year: i32, month: u32) -> Result<Vec<TrackPoint>> {
    let (start, end) = month_range(year, month)?;
    let start_str = encode_dt(start);
    let end_str = encode_dt(end);

    let raws: Vec<RawTrackPoint> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          r#"SELECT {columns}
             FROM storms
             WHERE genesis >= ?1 AND genesis < ?2
             ORDER BY "ID", time"#,
          columns = *COLUMN_LIST,
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, end_str], RawTrackPoint::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTrackPoint::into_point).collect()
  }

  async fn count_points(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM storms", [], |r| r.get(0))?))
      .await?;
    Ok(u64::try_from(count)?)
  }
}
