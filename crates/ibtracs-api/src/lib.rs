//! JSON query API over an IBTrACS track store.
//!
//! Exposes an axum [`Router`] backed by any [`ibtracs_core::store::TrackStore`].
//! The API is read-only; TLS and auth are the caller's responsibility.

pub mod error;
pub mod storms;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use ibtracs_core::store::TrackStore;
use ibtracs_store_sqlite::expand_tilde;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_database_path() -> PathBuf { PathBuf::from("data/storms.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          default_host(),
      port:          default_port(),
      database_path: default_database_path(),
    }
  }
}

impl ServerConfig {
  /// The SQLite file to serve, with a leading `~` expanded.
  pub fn database_path(&self) -> PathBuf { expand_tilde(&self.database_path) }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TrackStore + 'static,
{
  Router::new()
    .route("/", get(storms::health))
    .route("/storms/{year}/{month}", get(storms::by_month::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

#[cfg(test)]
mod tests;
