//! Storm collections, the per-month read model served over HTTP.
//!
//! Rows come back from the store one per observation. They are grouped by
//! storm id and folded into one [`Storm`] per id, with a parallel array per
//! time-varying field.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, track::TrackPoint};

/// One storm with its full track as parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storm {
  #[serde(rename = "ID")]
  pub storm_id:       String,
  #[serde(rename = "ATCF_ID")]
  pub atcf_id:        Option<String>,
  pub name:           String,
  pub basin:          String,
  pub subbasin:       String,
  pub season:         i32,
  pub genesis:        NaiveDateTime,

  pub time:           Vec<NaiveDateTime>,
  pub lat:            Vec<f64>,
  pub lon:            Vec<f64>,
  pub wind:           Vec<Option<f64>>,
  pub mslp:           Vec<Option<f64>>,
  pub speed:          Vec<Option<f64>>,
  pub dist2land:      Vec<Option<f64>>,
  pub classification: Vec<Option<String>>,
  pub rmw:            Vec<Option<f64>>,
  pub basins:         Vec<Option<String>>,
  pub subbasins:      Vec<Option<String>>,
  pub agencies:       Vec<Option<String>>,

  #[serde(rename = "R34_NE")]
  pub r34_ne: Vec<Option<f64>>,
  #[serde(rename = "R34_SE")]
  pub r34_se: Vec<Option<f64>>,
  #[serde(rename = "R34_SW")]
  pub r34_sw: Vec<Option<f64>>,
  #[serde(rename = "R34_NW")]
  pub r34_nw: Vec<Option<f64>>,
  #[serde(rename = "R50_NE")]
  pub r50_ne: Vec<Option<f64>>,
  #[serde(rename = "R50_SE")]
  pub r50_se: Vec<Option<f64>>,
  #[serde(rename = "R50_SW")]
  pub r50_sw: Vec<Option<f64>>,
  #[serde(rename = "R50_NW")]
  pub r50_nw: Vec<Option<f64>>,
  #[serde(rename = "R64_NE")]
  pub r64_ne: Vec<Option<f64>>,
  #[serde(rename = "R64_SE")]
  pub r64_se: Vec<Option<f64>>,
  #[serde(rename = "R64_SW")]
  pub r64_sw: Vec<Option<f64>>,
  #[serde(rename = "R64_NW")]
  pub r64_nw: Vec<Option<f64>>,
}

impl Storm {
  /// Start a storm from its first observation; the track arrays are empty.
  fn from_first(first: &TrackPoint) -> Self {
    Self {
      storm_id:       first.storm_id.clone(),
      atcf_id:        first.atcf_id.clone(),
      name:           first.name.clone(),
      basin:          first.basin.clone(),
      subbasin:       first.subbasin.clone(),
      season:         first.season,
      genesis:        first.genesis,
      time:           Vec::new(),
      lat:            Vec::new(),
      lon:            Vec::new(),
      wind:           Vec::new(),
      mslp:           Vec::new(),
      speed:          Vec::new(),
      dist2land:      Vec::new(),
      classification: Vec::new(),
      rmw:            Vec::new(),
      basins:         Vec::new(),
      subbasins:      Vec::new(),
      agencies:       Vec::new(),
      r34_ne:         Vec::new(),
      r34_se:         Vec::new(),
      r34_sw:         Vec::new(),
      r34_nw:         Vec::new(),
      r50_ne:         Vec::new(),
      r50_se:         Vec::new(),
      r50_sw:         Vec::new(),
      r50_nw:         Vec::new(),
      r64_ne:         Vec::new(),
      r64_se:         Vec::new(),
      r64_sw:         Vec::new(),
      r64_nw:         Vec::new(),
    }
  }

  fn push(mut self, p: TrackPoint) -> Self {
    self.time.push(p.observation_time);
    self.lat.push(p.lat);
    self.lon.push(p.lon);
    self.wind.push(p.wind);
    self.mslp.push(p.mslp);
    self.speed.push(p.speed);
    self.dist2land.push(p.dist2land);
    self.classification.push(p.classification);
    self.rmw.push(p.rmw);
    self.basins.push(p.basin_time);
    self.subbasins.push(p.subbasin_time);
    self.agencies.push(p.agency);
    self.r34_ne.push(p.r34.ne);
    self.r34_se.push(p.r34.se);
    self.r34_sw.push(p.r34.sw);
    self.r34_nw.push(p.r34.nw);
    self.r50_ne.push(p.r50.ne);
    self.r50_se.push(p.r50.se);
    self.r50_sw.push(p.r50.sw);
    self.r50_nw.push(p.r50.nw);
    self.r64_ne.push(p.r64.ne);
    self.r64_se.push(p.r64.se);
    self.r64_sw.push(p.r64.sw);
    self.r64_nw.push(p.r64.nw);
    self
  }
}

/// Response body of the month query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StormCollection {
  pub storms: Vec<Storm>,
}

/// Group observation rows into storms.
///
/// Storms come out ordered by id; each track is ordered by time regardless of
/// input order. Storm-level fields are taken from the earliest observation.
pub fn group_into_storms<I>(rows: I) -> StormCollection
where
  I: IntoIterator<Item = TrackPoint>,
{
  let mut by_storm: BTreeMap<String, Vec<TrackPoint>> = BTreeMap::new();
  for row in rows {
    by_storm.entry(row.storm_id.clone()).or_default().push(row);
  }

  let storms = by_storm
    .into_values()
    .filter_map(|mut track| {
      track.sort_by_key(|p| p.observation_time);
      let first = Storm::from_first(track.first()?);
      Some(track.into_iter().fold(first, Storm::push))
    })
    .collect();

  StormCollection { storms }
}

/// Half-open `[start, end)` range covering one calendar month.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime)> {
  let invalid = || Error::InvalidMonth { year, month };

  let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
  let next = if start.month() == 12 {
    NaiveDate::from_ymd_opt(year + 1, 1, 1)
  } else {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
  }
  .ok_or_else(invalid)?;

  let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).ok_or_else(invalid);
  Ok((midnight(start)?, midnight(next)?))
}
