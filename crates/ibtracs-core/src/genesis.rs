//! Genesis resolution: the earliest observation of each storm in a batch.
//!
//! Every normalised row needs its storm's genesis, so the resolver runs over
//! the whole batch before any row is normalised. The storm-level basin and
//! subbasin are taken from the same (earliest) row.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::normalize::{RawRecord, columns, observation_time, parse_text, storm_id};

/// What a storm looked like at its first observation in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StormOrigin {
  pub genesis:  NaiveDateTime,
  pub basin:    Option<String>,
  pub subbasin: Option<String>,
}

/// Storm id → [`StormOrigin`] for one ingestion batch.
#[derive(Debug, Clone, Default)]
pub struct StormOrigins {
  origins: HashMap<String, StormOrigin>,
}

impl StormOrigins {
  pub fn get(&self, storm_id: &str) -> Option<&StormOrigin> { self.origins.get(storm_id) }

  /// Genesis of `storm_id`, or `fallback` when the storm was never observed
  /// with a valid time.
  pub fn genesis_or(&self, storm_id: &str, fallback: NaiveDateTime) -> NaiveDateTime {
    self.get(storm_id).map_or(fallback, |o| o.genesis)
  }

  pub fn len(&self) -> usize { self.origins.len() }

  pub fn is_empty(&self) -> bool { self.origins.is_empty() }
}

/// Incremental fold computing [`StormOrigins`].
#[derive(Debug, Default)]
pub struct GenesisResolver {
  origins: HashMap<String, StormOrigin>,
}

impl GenesisResolver {
  pub fn new() -> Self { Self::default() }

  /// Resolve origins over an in-memory batch.
  pub fn resolve<'a, R>(records: impl IntoIterator<Item = &'a R>) -> StormOrigins
  where
    R: RawRecord + ?Sized + 'a,
  {
    let mut resolver = Self::new();
    for record in records {
      resolver.observe(record);
    }
    resolver.finish()
  }

  /// Fold one record. Rows without a storm id or a valid time are ignored.
  /// On ties the first row seen wins.
  pub fn observe<R: RawRecord + ?Sized>(&mut self, record: &R) {
    let (Some(id), Some(time)) = (storm_id(record), observation_time(record)) else {
      return;
    };

    match self.origins.get_mut(&id) {
      Some(origin) if time >= origin.genesis => {}
      Some(origin) => *origin = origin_of(record, time),
      None => {
        self.origins.insert(id, origin_of(record, time));
      }
    }
  }

  pub fn finish(self) -> StormOrigins { StormOrigins { origins: self.origins } }
}

fn origin_of<R: RawRecord + ?Sized>(record: &R, genesis: NaiveDateTime) -> StormOrigin {
  StormOrigin {
    genesis,
    basin: record.field(columns::BASIN).and_then(parse_text),
    subbasin: record.field(columns::SUBBASIN).and_then(parse_text),
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use chrono::NaiveDate;

  use super::*;
  use crate::normalize::normalize;

  fn row(sid: &str, time: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
      ("SID".to_owned(), sid.to_owned()),
      ("ISO_TIME".to_owned(), time.to_owned()),
      ("LAT".to_owned(), "10.0".to_owned()),
      ("LON".to_owned(), "-40.0".to_owned()),
    ])
  }

  fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 8, day)
      .unwrap()
      .and_hms_opt(hour, 0, 0)
      .unwrap()
  }

  #[test]
  fn genesis_is_minimum_per_storm() {
    let rows = [
      row("A", "2020-08-02 00:00:00"),
      row("A", "2020-08-01 12:00:00"),
      row("B", "2020-08-05 06:00:00"),
      row("A", "2020-08-03 00:00:00"),
      row("B", "2020-08-04 18:00:00"),
    ];
    let origins = GenesisResolver::resolve(&rows);

    assert_eq!(origins.len(), 2);
    assert_eq!(origins.get("A").unwrap().genesis, at(1, 12));
    assert_eq!(origins.get("B").unwrap().genesis, at(4, 18));

    let points: Vec<_> = rows.iter().filter_map(|r| normalize(r, &origins)).collect();
    assert_eq!(points.len(), rows.len());
    for p in &points {
      let expected = if p.storm_id == "A" { at(1, 12) } else { at(4, 18) };
      assert_eq!(p.genesis, expected);
      assert!(p.genesis <= p.observation_time);
    }
  }

  #[test]
  fn unparseable_times_do_not_count() {
    let rows = [row("A", "garbage"), row("A", "2020-08-02 00:00:00")];
    let origins = GenesisResolver::resolve(&rows);
    assert_eq!(origins.get("A").unwrap().genesis, at(2, 0));
  }

  #[test]
  fn storm_without_valid_time_falls_back() {
    let origins = GenesisResolver::resolve(&[row("A", "")]);
    assert!(origins.is_empty());
    assert_eq!(origins.genesis_or("A", at(9, 0)), at(9, 0));
  }
}
