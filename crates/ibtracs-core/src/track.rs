//! Track points: one row per storm observation.
//!
//! A track point is keyed by `(storm_id, observation_time)`. Storm-level
//! attributes (name, season, genesis, storm basin) are repeated on every row
//! of the same storm; the store has no separate storm table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Name assigned to storms that have none in the archive.
pub const NOT_NAMED: &str = "NOT_NAMED";

// ─── Wind radii ──────────────────────────────────────────────────────────────

/// Radial extent (nm) of one wind-speed threshold in each quadrant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindRadii {
  pub ne: Option<f64>,
  pub se: Option<f64>,
  pub sw: Option<f64>,
  pub nw: Option<f64>,
}

impl WindRadii {
  /// Quadrant values in `NE, SE, SW, NW` order.
  pub fn quadrants(&self) -> [Option<f64>; 4] { [self.ne, self.se, self.sw, self.nw] }

  pub fn from_quadrants([ne, se, sw, nw]: [Option<f64>; 4]) -> Self {
    Self { ne, se, sw, nw }
  }
}

// ─── Track point ─────────────────────────────────────────────────────────────

/// One normalised storm observation, ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
  pub storm_id:         String,
  pub atcf_id:          Option<String>,
  pub name:             String,
  /// Basin the storm formed in.
  pub basin:            String,
  pub subbasin:         String,
  pub season:           i32,
  /// Earliest observation time of the storm within the ingested batch.
  pub genesis:          NaiveDateTime,
  pub observation_time: NaiveDateTime,
  pub lat:              f64,
  pub lon:              f64,
  pub wind:             Option<f64>,
  pub mslp:             Option<f64>,
  pub speed:            Option<f64>,
  pub dist2land:        Option<f64>,
  pub classification:   Option<String>,
  pub rmw:              Option<f64>,
  /// Basin at this observation; differs from `basin` once a storm crosses.
  pub basin_time:       Option<String>,
  pub subbasin_time:    Option<String>,
  pub agency:           Option<String>,
  pub r34:              WindRadii,
  pub r50:              WindRadii,
  pub r64:              WindRadii,
}

impl TrackPoint {
  /// The primary key of this point.
  pub fn key(&self) -> (&str, NaiveDateTime) {
    (self.storm_id.as_str(), self.observation_time)
  }

  /// Wind radii in threshold order (34, 50, 64 kt).
  pub fn radii(&self) -> [&WindRadii; 3] { [&self.r34, &self.r50, &self.r64] }
}
