//! Encoding and decoding helpers between track points and SQLite rows.
//!
//! Timestamps are stored as `YYYY-MM-DDTHH:MM:SS` text (no offset; the archive
//! is UTC throughout). Every other column maps onto a native SQLite type.

use chrono::NaiveDateTime;
use ibtracs_core::track::{TrackPoint, WindRadii};

use crate::{Error, Result};

const DT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String { dt.format(DT_FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DT_FORMAT)
    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `storms` row, in `schema::COLUMNS` order.
pub struct RawTrackPoint {
  pub storm_id:       String,
  pub atcf_id:        Option<String>,
  pub name:           String,
  pub basin:          String,
  pub subbasin:       String,
  pub season:         i32,
  pub genesis:        String,
  pub time:           String,
  pub lat:            f64,
  pub lon:            f64,
  pub wind:           Option<f64>,
  pub mslp:           Option<f64>,
  pub speed:          Option<f64>,
  pub dist2land:      Option<f64>,
  pub classification: Option<String>,
  pub rmw:            Option<f64>,
  pub basin_time:     Option<String>,
  pub subbasin_time:  Option<String>,
  pub agency:         Option<String>,
  pub radii:          [Option<f64>; 12],
}

impl RawTrackPoint {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut radii = [None; 12];
    for (i, slot) in radii.iter_mut().enumerate() {
      *slot = row.get(19 + i)?;
    }

    Ok(Self {
      storm_id: row.get(0)?,
      atcf_id: row.get(1)?,
      name: row.get(2)?,
      basin: row.get(3)?,
      subbasin: row.get(4)?,
      season: row.get(5)?,
      genesis: row.get(6)?,
      time: row.get(7)?,
      lat: row.get(8)?,
      lon: row.get(9)?,
      wind: row.get(10)?,
      mslp: row.get(11)?,
      speed: row.get(12)?,
      dist2land: row.get(13)?,
      classification: row.get(14)?,
      rmw: row.get(15)?,
      basin_time: row.get(16)?,
      subbasin_time: row.get(17)?,
      agency: row.get(18)?,
      radii,
    })
  }

  pub fn into_point(self) -> Result<TrackPoint> {
    let [r34_ne, r34_se, r34_sw, r34_nw, r50_ne, r50_se, r50_sw, r50_nw, r64_ne, r64_se, r64_sw, r64_nw] =
      self.radii;

    Ok(TrackPoint {
      storm_id:         self.storm_id,
      atcf_id:          self.atcf_id,
      name:             self.name,
      basin:            self.basin,
      subbasin:         self.subbasin,
      season:           self.season,
      genesis:          decode_dt(&self.genesis)?,
      observation_time: decode_dt(&self.time)?,
      lat:              self.lat,
      lon:              self.lon,
      wind:             self.wind,
      mslp:             self.mslp,
      speed:            self.speed,
      dist2land:        self.dist2land,
      classification:   self.classification,
      rmw:              self.rmw,
      basin_time:       self.basin_time,
      subbasin_time:    self.subbasin_time,
      agency:           self.agency,
      r34:              WindRadii::from_quadrants([r34_ne, r34_se, r34_sw, r34_nw]),
      r50:              WindRadii::from_quadrants([r50_ne, r50_se, r50_sw, r50_nw]),
      r64:              WindRadii::from_quadrants([r64_ne, r64_se, r64_sw, r64_nw]),
    })
  }
}

/// Flatten the twelve radii of a point into column order.
pub fn encode_radii(point: &TrackPoint) -> [Option<f64>; 12] {
  let mut out = [None; 12];
  for (chunk, radii) in out.chunks_exact_mut(4).zip(point.radii()) {
    chunk.copy_from_slice(&radii.quadrants());
  }
  out
}
