//! SQLite backend for the IBTrACS track store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod paths;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use paths::expand_tilde;
pub use store::SqliteStore;
