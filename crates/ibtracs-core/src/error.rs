//! Error types for `ibtracs-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid month {month} for year {year}")]
  InvalidMonth { year: i32, month: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
