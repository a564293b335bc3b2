//! CSV access to the archive file.
//!
//! The archive is read twice per run (genesis pass, then normalisation pass)
//! rather than held in memory; the full archive is several hundred megabytes.

use std::{collections::HashMap, path::Path};

use ibtracs_core::normalize::RawRecord;

use crate::{Error, Result};

/// Header name → column position.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
  positions: HashMap<String, usize>,
}

impl ColumnIndex {
  pub fn from_headers(headers: &csv::StringRecord) -> Self {
    let positions = headers
      .iter()
      .enumerate()
      .map(|(i, h)| (h.trim().to_owned(), i))
      .collect();
    Self { positions }
  }

  pub fn position(&self, column: &str) -> Option<usize> { self.positions.get(column).copied() }
}

/// One CSV row viewed through its header index.
pub struct CsvRecord<'a> {
  columns: &'a ColumnIndex,
  record:  &'a csv::StringRecord,
}

impl RawRecord for CsvRecord<'_> {
  fn field(&self, column: &str) -> Option<&str> {
    self.columns.position(column).and_then(|i| self.record.get(i))
  }
}

/// Stream every data row of the CSV at `path` through `visit`.
///
/// Rows with a different field count than the header are tolerated. Returns
/// the number of rows visited.
pub fn scan<F>(path: &Path, mut visit: F) -> Result<u64>
where
  F: FnMut(&CsvRecord<'_>),
{
  let csv_err = |source| Error::Csv { path: path.to_path_buf(), source };

  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::All)
    .from_path(path)
    .map_err(csv_err)?;

  let columns = ColumnIndex::from_headers(reader.headers().map_err(csv_err)?);

  let mut record = csv::StringRecord::new();
  let mut rows = 0u64;
  while reader.read_record(&mut record).map_err(csv_err)? {
    visit(&CsvRecord { columns: &columns, record: &record });
    rows += 1;
  }

  tracing::debug!(path = %path.display(), rows, "scanned CSV");
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use ibtracs_core::normalize::{observation_time, storm_id};

  use super::*;

  #[test]
  fn scans_rows_by_header_name() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      "SID,ISO_TIME,LAT,LON\n \n\
       AL012020,2020-08-01 00:00:00,25.0,-77.5\n\
       AL012020, 2020-08-01 06:00:00 ,25.5\n"
    )
    .unwrap();

    let mut ids = Vec::new();
    let mut times = Vec::new();
    let mut lons = Vec::new();
    let rows = scan(file.path(), |rec| {
      assert_eq!(rec.field("NOT_A_COLUMN"), None);
      ids.push(storm_id(rec));
      times.push(observation_time(rec));
      lons.push(rec.field("LON").map(str::to_owned));
    })
    .unwrap();

    assert_eq!(rows, 3);
    assert_eq!(ids[0], None);
    assert_eq!(ids[1].as_deref(), Some("AL012020"));
    assert!(times[2].is_some());
    assert_eq!(lons[1].as_deref(), Some("-77.5"));
    assert_eq!(lons[2], None);
  }

  #[test]
  fn missing_file_is_an_error() {
    let err = scan(Path::new("/nonexistent/ibtracs.csv"), |_| {}).unwrap_err();
    assert!(matches!(err, Error::Csv { .. }));
  }
}
