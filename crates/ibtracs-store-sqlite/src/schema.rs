//! SQL schema for the IBTrACS SQLite store.
//!
//! Executed by [`TrackStore::ensure_schema`](ibtracs_core::store::TrackStore)
//! at the start of every run.

use std::sync::LazyLock;

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// Timestamps are `YYYY-MM-DDTHH:MM:SS` text, so lexical comparison is
/// chronological.
pub const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

-- One row per storm observation.
CREATE TABLE IF NOT EXISTS storms (
    "ID"           TEXT    NOT NULL,
    "ATCF_ID"      TEXT,
    name           TEXT    NOT NULL,
    basin          TEXT    NOT NULL,
    subbasin       TEXT    NOT NULL,
    season         INTEGER NOT NULL,
    genesis        TEXT    NOT NULL,
    time           TEXT    NOT NULL,
    lat            REAL    NOT NULL,
    lon            REAL    NOT NULL,
    wind           REAL,
    mslp           REAL,
    speed          REAL,
    dist2land      REAL,
    classification TEXT,
    rmw            REAL,
    basin_time     TEXT,
    subbasin_time  TEXT,
    agency         TEXT,
    "R34_NE" REAL, "R34_SE" REAL, "R34_SW" REAL, "R34_NW" REAL,
    "R50_NE" REAL, "R50_SE" REAL, "R50_SW" REAL, "R50_NW" REAL,
    "R64_NE" REAL, "R64_SE" REAL, "R64_SW" REAL, "R64_NW" REAL,
    PRIMARY KEY ("ID", time)
);

CREATE INDEX IF NOT EXISTS idx_storms_time ON storms(time);
CREATE INDEX IF NOT EXISTS idx_storms_id   ON storms("ID");
"#;

/// Every `storms` column in `encode` order. Reads and the upsert both use
/// this list, so positional parameters and row indexes stay aligned.
pub const COLUMNS: [&str; 31] = [
  r#""ID""#, r#""ATCF_ID""#, "name", "basin", "subbasin", "season", "genesis",
  "time", "lat", "lon", "wind", "mslp", "speed", "dist2land",
  "classification", "rmw", "basin_time", "subbasin_time", "agency",
  r#""R34_NE""#, r#""R34_SE""#, r#""R34_SW""#, r#""R34_NW""#,
  r#""R50_NE""#, r#""R50_SE""#, r#""R50_SW""#, r#""R50_NW""#,
  r#""R64_NE""#, r#""R64_SE""#, r#""R64_SW""#, r#""R64_NW""#,
];

/// Primary key columns.
const KEY: [&str; 2] = [r#""ID""#, "time"];

/// `COLUMNS` joined for a `SELECT` list.
pub static COLUMN_LIST: LazyLock<String> = LazyLock::new(|| COLUMNS.join(", "));

/// Insert-or-overwrite statement; every non-key column takes the incoming
/// value on `("ID", time)` conflict.
pub static UPSERT: LazyLock<String> = LazyLock::new(|| {
  let placeholders = (1..=COLUMNS.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  let updates = COLUMNS
    .iter()
    .filter(|c| !KEY.contains(c))
    .map(|c| format!("{c} = excluded.{c}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO storms ({}) VALUES ({placeholders}) ON CONFLICT ({}) DO UPDATE SET {updates}",
    *COLUMN_LIST,
    KEY.join(", "),
  )
});

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn upsert_binds_every_column_and_updates_non_keys() {
    assert!(UPSERT.contains("?31)"));
    assert!(!UPSERT.contains("?32"));
    assert!(UPSERT.contains(r#""R64_NW" = excluded."R64_NW""#));
    assert!(UPSERT.contains("genesis = excluded.genesis"));
    assert!(!UPSERT.contains("time = excluded.time"));
    assert!(!UPSERT.contains(r#""ID" = excluded."ID""#));
  }
}
