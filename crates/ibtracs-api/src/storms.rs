//! Handlers for the storm query endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Health check |
//! | `GET`  | `/storms/{year}/{month}` | Storms whose genesis falls in the month; 400 if `month` is outside 1–12 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use ibtracs_core::{
  store::TrackStore,
  storm::{StormCollection, group_into_storms},
};
use serde::Serialize;

use crate::error::ApiError;

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:  &'static str,
  pub message: &'static str,
}

/// `GET /`
pub async fn health() -> Json<Health> {
  Json(Health { status: "ok", message: "IBTrACS API is running" })
}

// ─── By month ────────────────────────────────────────────────────────────────

/// `GET /storms/{year}/{month}`
pub async fn by_month<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<(i32, u32)>, PathRejection>,
) -> Result<Json<StormCollection>, ApiError>
where
  S: TrackStore,
{
  let Path((year, month)) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  if !(1..=12).contains(&month) {
    return Err(ApiError::BadRequest(format!("month must be 1-12, got {month}")));
  }

  let rows = store
    .storms_by_month(year, month)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let collection = group_into_storms(rows);
  tracing::debug!(year, month, storms = collection.storms.len(), "served month");
  Ok(Json(collection))
}
