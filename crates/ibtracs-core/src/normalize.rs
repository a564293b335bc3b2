//! Row normalizer: one raw IBTrACS CSV record → one [`TrackPoint`].
//!
//! Parsing is tolerant. Malformed optional fields become `None`; rows lacking
//! a storm id, a valid observation time, or a position are rejected by
//! returning `None` from [`normalize`]. Nothing here returns an error.

use std::{
  collections::{BTreeMap, HashMap},
  hash::BuildHasher,
};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{
  genesis::StormOrigins,
  track::{NOT_NAMED, TrackPoint, WindRadii},
};

// ─── Raw records ─────────────────────────────────────────────────────────────

/// A raw archive row addressed by column name.
///
/// Missing columns and empty cells are indistinguishable to the normalizer.
pub trait RawRecord {
  fn field(&self, column: &str) -> Option<&str>;
}

impl<S: BuildHasher> RawRecord for HashMap<String, String, S> {
  fn field(&self, column: &str) -> Option<&str> { self.get(column).map(String::as_str) }
}

impl RawRecord for BTreeMap<String, String> {
  fn field(&self, column: &str) -> Option<&str> { self.get(column).map(String::as_str) }
}

/// Column names read from the archive.
pub mod columns {
  pub const SID: &str = "SID";
  pub const NAME: &str = "NAME";
  pub const SEASON: &str = "SEASON";
  pub const BASIN: &str = "BASIN";
  pub const SUBBASIN: &str = "SUBBASIN";
  pub const ISO_TIME: &str = "ISO_TIME";
  pub const LAT: &str = "LAT";
  pub const LON: &str = "LON";
  pub const WIND: &str = "USA_WIND";
  pub const PRES: &str = "USA_PRES";
  pub const STORM_SPEED: &str = "STORM_SPEED";
  pub const DIST2LAND: &str = "DIST2LAND";
  pub const STATUS: &str = "USA_STATUS";
  pub const RMW: &str = "USA_RMW";
  pub const AGENCY: &str = "USA_AGENCY";

  /// Alternate identifier columns, probed in order.
  pub const ATCF_ID: [&str; 2] = ["USA_ATCF_ID", "ATCF_ID"];

  /// Wind radii columns per threshold, quadrants in `NE, SE, SW, NW` order.
  pub const R34: [&str; 4] = ["USA_R34_NE", "USA_R34_SE", "USA_R34_SW", "USA_R34_NW"];
  pub const R50: [&str; 4] = ["USA_R50_NE", "USA_R50_SE", "USA_R50_SW", "USA_R50_NW"];
  pub const R64: [&str; 4] = ["USA_R64_NE", "USA_R64_SE", "USA_R64_SW", "USA_R64_NW"];
}

// ─── Field parsers ───────────────────────────────────────────────────────────

/// Archive sentinel for a missing measurement.
pub const MISSING_SENTINEL: f64 = -999.0;

/// Cell contents that mean "not available" for optional text fields.
///
/// `NA` is deliberately absent: it is the North Atlantic basin code.
const NOT_AVAILABLE: [&str; 3] = ["nan", "NaN", "N/A"];

const TIMESTAMP_FORMATS: [&str; 4] = [
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%dT%H:%M",
];

/// Parse a numeric cell. Blank, NaN, the `-999` sentinel and garbage are all
/// `None`.
pub fn parse_float(raw: &str) -> Option<f64> {
  let value: f64 = raw.trim().parse().ok()?;
  if !value.is_finite() || value == MISSING_SENTINEL {
    return None;
  }
  Some(value)
}

/// Parse an optional text cell.
pub fn parse_text(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() || NOT_AVAILABLE.contains(&trimmed) {
    return None;
  }
  Some(trimmed.to_owned())
}

/// Parse an `ISO_TIME` cell. RFC 3339 values are converted to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  TIMESTAMP_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    .or_else(|| {
      DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
    })
}

/// Parse a `SEASON` cell, defaulting to 0.
pub fn parse_season(raw: &str) -> i32 {
  let trimmed = raw.trim();
  trimmed
    .parse::<i32>()
    .ok()
    .or_else(|| {
      parse_float(trimmed)
        .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
        .map(|f| f as i32)
    })
    .unwrap_or(0)
}

// ─── Record accessors ────────────────────────────────────────────────────────

fn float_field<R: RawRecord + ?Sized>(record: &R, column: &str) -> Option<f64> {
  record.field(column).and_then(parse_float)
}

fn text_field<R: RawRecord + ?Sized>(record: &R, column: &str) -> Option<String> {
  record.field(column).and_then(parse_text)
}

fn radii_field<R: RawRecord + ?Sized>(record: &R, cols: [&str; 4]) -> WindRadii {
  WindRadii::from_quadrants(cols.map(|c| float_field(record, c)))
}

/// The storm identifier of a record, if present.
pub fn storm_id<R: RawRecord + ?Sized>(record: &R) -> Option<String> {
  text_field(record, columns::SID)
}

/// The observation time of a record, if present and valid.
pub fn observation_time<R: RawRecord + ?Sized>(record: &R) -> Option<NaiveDateTime> {
  record.field(columns::ISO_TIME).and_then(parse_timestamp)
}

/// First non-blank alternate identifier.
pub fn atcf_id<R: RawRecord + ?Sized>(record: &R) -> Option<String> {
  columns::ATCF_ID.iter().find_map(|c| text_field(record, c))
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Convert one raw record into a [`TrackPoint`].
///
/// `origins` must have been resolved over the whole batch the record belongs
/// to. A storm absent from `origins` takes the row's own time as genesis.
///
/// Returns `None` for rejected rows: no storm id, no valid time, or a missing
/// latitude/longitude.
pub fn normalize<R: RawRecord + ?Sized>(
  record: &R,
  origins: &StormOrigins,
) -> Option<TrackPoint> {
  let storm_id = storm_id(record)?;
  let observation_time = observation_time(record)?;
  let lat = float_field(record, columns::LAT)?;
  let lon = float_field(record, columns::LON)?;

  let basin_time = text_field(record, columns::BASIN);
  let subbasin_time = text_field(record, columns::SUBBASIN);

  let genesis = origins
    .genesis_or(&storm_id, observation_time)
    .min(observation_time);
  let origin = origins.get(&storm_id);
  let basin = origin
    .and_then(|o| o.basin.clone())
    .or_else(|| basin_time.clone())
    .unwrap_or_default();
  let subbasin = origin
    .and_then(|o| o.subbasin.clone())
    .or_else(|| subbasin_time.clone())
    .unwrap_or_default();

  Some(TrackPoint {
    atcf_id: atcf_id(record),
    name: text_field(record, columns::NAME).unwrap_or_else(|| NOT_NAMED.to_owned()),
    basin,
    subbasin,
    season: record.field(columns::SEASON).map_or(0, parse_season),
    genesis,
    observation_time,
    lat,
    lon,
    wind: float_field(record, columns::WIND),
    mslp: float_field(record, columns::PRES),
    speed: float_field(record, columns::STORM_SPEED),
    dist2land: float_field(record, columns::DIST2LAND),
    classification: text_field(record, columns::STATUS),
    rmw: float_field(record, columns::RMW),
    basin_time,
    subbasin_time,
    agency: text_field(record, columns::AGENCY),
    r34: radii_field(record, columns::R34),
    r50: radii_field(record, columns::R50),
    r64: radii_field(record, columns::R64),
    storm_id,
  })
}
