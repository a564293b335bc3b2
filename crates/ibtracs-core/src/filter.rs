//! Incremental filter: keep only points strictly after a cutoff.

use chrono::NaiveDateTime;

use crate::track::TrackPoint;

/// Pure predicate over [`TrackPoint`]s.
///
/// With no cutoff (empty store) every point passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncrementalFilter {
  cutoff: Option<NaiveDateTime>,
}

impl IncrementalFilter {
  pub fn new(cutoff: Option<NaiveDateTime>) -> Self { Self { cutoff } }

  pub fn cutoff(&self) -> Option<NaiveDateTime> { self.cutoff }

  pub fn passes(&self, point: &TrackPoint) -> bool {
    self
      .cutoff
      .is_none_or(|cutoff| point.observation_time > cutoff)
  }

  pub fn apply<I>(self, points: I) -> impl Iterator<Item = TrackPoint>
  where
    I: IntoIterator<Item = TrackPoint>,
  {
    points.into_iter().filter(move |p| self.passes(p))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::track::WindRadii;

  fn point(hour: u32) -> TrackPoint {
    let time = NaiveDate::from_ymd_opt(2020, 8, 1)
      .unwrap()
      .and_hms_opt(hour, 0, 0)
      .unwrap();
    TrackPoint {
      storm_id:         "S".into(),
      atcf_id:          None,
      name:             "NOT_NAMED".into(),
      basin:            "NA".into(),
      subbasin:         "MM".into(),
      season:           2020,
      genesis:          time,
      observation_time: time,
      lat:              10.0,
      lon:              -40.0,
      wind:             None,
      mslp:             None,
      speed:            None,
      dist2land:        None,
      classification:   None,
      rmw:              None,
      basin_time:       None,
      subbasin_time:    None,
      agency:           None,
      r34:              WindRadii::default(),
      r50:              WindRadii::default(),
      r64:              WindRadii::default(),
    }
  }

  #[test]
  fn no_cutoff_passes_everything() {
    let filter = IncrementalFilter::default();
    let kept: Vec<_> = filter.apply((0..24).map(point)).collect();
    assert_eq!(kept.len(), 24);
  }

  #[test]
  fn cutoff_excludes_at_and_before() {
    let cutoff = point(6).observation_time;
    let filter = IncrementalFilter::new(Some(cutoff));

    assert!(!filter.passes(&point(0)));
    assert!(!filter.passes(&point(6)));
    assert!(filter.passes(&point(7)));

    let kept: Vec<_> = filter.apply((0..24).map(point)).collect();
    assert_eq!(kept.len(), 17);
    assert!(kept.iter().all(|p| p.observation_time > cutoff));
  }
}
