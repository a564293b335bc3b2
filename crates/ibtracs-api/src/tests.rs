//! Router tests against an in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime};
use ibtracs_core::{
  store::TrackStore,
  track::{TrackPoint, WindRadii},
};
use ibtracs_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{ServerConfig, api_router};

fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2020, month, day)
    .unwrap()
    .and_hms_opt(hour, 0, 0)
    .unwrap()
}

fn point(storm_id: &str, genesis: NaiveDateTime, time: NaiveDateTime) -> TrackPoint {
  TrackPoint {
    storm_id:         storm_id.into(),
    atcf_id:          Some("AL012020".into()),
    name:             "ARTHUR".into(),
    basin:            "NA".into(),
    subbasin:         "MM".into(),
    season:           2020,
    genesis,
    observation_time: time,
    lat:              25.0,
    lon:              -77.5,
    wind:             Some(40.0),
    mslp:             None,
    speed:            None,
    dist2land:        Some(120.0),
    classification:   Some("TS".into()),
    rmw:              None,
    basin_time:       Some("NA".into()),
    subbasin_time:    Some("MM".into()),
    agency:           Some("hurdat_atl".into()),
    r34:              WindRadii { ne: Some(90.0), ..Default::default() },
    r50:              WindRadii::default(),
    r64:              WindRadii::default(),
  }
}

async fn seeded_store() -> Arc<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.ensure_schema().await.unwrap();
  let g = at(8, 1, 0);
  store
    .upsert(&[
      point("2020214N25282", g, g),
      point("2020214N25282", g, at(8, 1, 6)),
      point("2020203N11300", at(7, 21, 12), at(7, 21, 12)),
    ])
    .await
    .unwrap();
  Arc::new(store)
}

async fn get(store: Arc<SqliteStore>, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let resp = api_router(store).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_reports_status() {
  let (status, body) = get(seeded_store().await, "/").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
  assert_eq!(body["message"], "IBTrACS API is running");
}

// ─── By month ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn month_returns_storms_with_parallel_arrays() {
  let (status, body) = get(seeded_store().await, "/storms/2020/8").await;
  assert_eq!(status, StatusCode::OK);

  let storms = body["storms"].as_array().unwrap();
  assert_eq!(storms.len(), 1);

  let storm = &storms[0];
  assert_eq!(storm["ID"], "2020214N25282");
  assert_eq!(storm["ATCF_ID"], "AL012020");
  assert_eq!(storm["basin"], "NA");
  assert_eq!(storm["genesis"], "2020-08-01T00:00:00");
  assert_eq!(storm["time"].as_array().unwrap().len(), 2);
  assert_eq!(storm["lat"].as_array().unwrap().len(), 2);
  assert_eq!(storm["mslp"][0], Value::Null);
  assert_eq!(storm["R34_NE"][1], 90.0);
  assert_eq!(storm["agencies"][0], "hurdat_atl");
}

#[tokio::test]
async fn empty_month_is_empty_collection() {
  let (status, body) = get(seeded_store().await, "/storms/1851/6").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["storms"], Value::Array(vec![]));
}

#[tokio::test]
async fn month_out_of_range_is_bad_request() {
  for uri in ["/storms/2020/0", "/storms/2020/13"] {
    let (status, body) = get(seeded_store().await, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(body["error"].as_str().unwrap().contains("month"));
  }
}

#[tokio::test]
async fn unparseable_path_is_json_bad_request() {
  for uri in ["/storms/2020/abc", "/storms/2020/-1", "/storms/later/8"] {
    let (status, body) = get(seeded_store().await, uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(body["error"].is_string(), "{uri}");
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn server_config_defaults() {
  let cfg: ServerConfig = config::Config::builder()
    .build()
    .unwrap()
    .try_deserialize()
    .unwrap();
  assert_eq!(cfg.host, "127.0.0.1");
  assert_eq!(cfg.port, 8000);
  assert_eq!(cfg.database_path(), ServerConfig::default().database_path);
}

#[test]
fn server_database_path_expands_home() {
  let cfg = ServerConfig {
    database_path: "~/ibtracs/storms.db".into(),
    ..Default::default()
  };
  if let Some(home) = std::env::var_os("HOME") {
    assert_eq!(cfg.database_path(), std::path::PathBuf::from(home).join("ibtracs/storms.db"));
  }
}
