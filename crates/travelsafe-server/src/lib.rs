//! HTTP server for TravelSafe.
//!
//! Mounts the JSON API from [`travelsafe_api`] under `/api` and adds a banner
//! at `/` and a store-backed health check at `/health`.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use travelsafe_core::store::IncidentStore;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRAVELSAFE_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Upper bound on any single store call, in seconds.
  #[serde(default = "default_store_timeout_secs")]
  pub store_timeout_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/travelsafe/incidents.db") }
fn default_store_timeout_secs() -> u64 { 5 }

impl ServerConfig {
  pub fn store_timeout(&self) -> Duration { Duration::from_secs(self.store_timeout_secs) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_path:         default_store_path(),
      store_timeout_secs: default_store_timeout_secs(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: IncidentStore + 'static,
{
  Router::new()
    .route("/", get(banner))
    .route("/health", get(health::<S>))
    .with_state(store.clone())
    .nest("/api", travelsafe_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Route handlers ──────────────────────────────────────────────────────────

async fn banner() -> Json<serde_json::Value> {
  Json(json!({
    "message": "TravelSafe API is running",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

async fn health<S>(State(store): State<Arc<S>>) -> Response
where
  S: IncidentStore,
{
  match store.count().await {
    Ok(incidents) => Json(json!({ "status": "healthy", "incidents": incidents })).into_response(),
    Err(e) => {
      tracing::warn!(error = %e, "health check failed");
      (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "unavailable" })),
      )
        .into_response()
    }
  }
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, header},
  };
  use serde_json::Value;
  use tower::ServiceExt as _;
  use travelsafe_store_sqlite::SqliteStore;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router(store)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn config_fields_fall_back_to_defaults() {
    let cfg: ServerConfig = serde_json::from_value(json!({ "port": 9000 })).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.address(), "127.0.0.1:9000");
  }

  // ── Banner and health ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn banner_reports_version() {
    let (status, body) = send(make_store().await, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "TravelSafe API is running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
  }

  #[tokio::test]
  async fn health_counts_incidents() {
    let store = make_store().await;
    let (status, body) = send(store.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "incidents": 0 }));

    send(
      store.clone(),
      "POST",
      "/api/incidents",
      Some(json!({ "latitude": 1.0, "longitude": 2.0, "incident_type": "theft" })),
    )
    .await;
    let (_, body) = send(store, "GET", "/health", None).await;
    assert_eq!(body["incidents"], 1);
  }

  // ── Incidents ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn report_then_query_nearby() {
    let store = make_store().await;

    let (status, body) = send(
      store.clone(),
      "POST",
      "/api/incidents",
      Some(json!({
        "latitude": 40.0009,
        "longitude": -75.0,
        "incident_type": " theft ",
        "description": "bag snatched",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["incident_id"], 1);
    assert_eq!(body["incident"]["incident_type"], "theft");
    assert_eq!(body["incident"]["verified"], false);

    let (status, body) = send(
      store.clone(),
      "GET",
      "/api/incidents/near?latitude=40.0&longitude=-75.0",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let near = body.as_array().unwrap();
    assert_eq!(near.len(), 1);
    assert_eq!(near[0]["id"], 1);
    assert_eq!(near[0]["distance_km"], 0.1);

    let (_, body) = send(
      store,
      "GET",
      "/api/incidents/near?latitude=40.0&longitude=-75.0&radius_km=0.05",
      None,
    )
    .await;
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn invalid_input_is_rejected_before_the_store() {
    let store = make_store().await;

    let (status, body) = send(
      store.clone(),
      "POST",
      "/api/incidents",
      Some(json!({ "latitude": 95.0, "longitude": 0.0, "incident_type": "theft" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("latitude"));

    let (status, _) = send(
      store.clone(),
      "POST",
      "/api/incidents",
      Some(json!({ "latitude": 0.0, "longitude": 0.0, "incident_type": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      store.clone(),
      "GET",
      "/api/crime?latitude=0.0&longitude=0.0&radius_km=-1",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(store, "GET", "/health", None).await;
    assert_eq!(body["incidents"], 0);
  }

  // ── Crime and fusion ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_area_crime_is_baseline() {
    let (status, body) = send(
      make_store().await,
      "GET",
      "/api/crime?latitude=10.0&longitude=10.0",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crime_rate"], 10);
    assert_eq!(body["safety_level"], "very_safe");
    assert_eq!(body["source"], "user_reports");
  }

  #[tokio::test]
  async fn safety_score_with_one_nearby_incident() {
    let store = make_store().await;
    send(
      store.clone(),
      "POST",
      "/api/incidents",
      Some(json!({ "latitude": 40.0009, "longitude": -75.0, "incident_type": "theft" })),
    )
    .await;

    let (status, body) = send(
      store,
      "POST",
      "/api/safety-score",
      Some(json!({
        "latitude": 40.0,
        "longitude": -75.0,
        "image_analysis": null,
        "weather": { "safety_impact": "neutral" },
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["safety_score"], 56);
    assert_eq!(body["safety_level"], "moderate");
    assert_eq!(body["alert"], false);
    assert_eq!(body["breakdown"]["image_analysis"], Value::Null);
    assert_eq!(body["breakdown"]["crime_data"], 65);
    assert_eq!(body["crime"]["recent_incidents"], 1);
    assert_eq!(body["radius_km"], 1.0);
  }

  #[tokio::test]
  async fn safety_score_accepts_raw_weather_and_photo() {
    let (status, body) = send(
      make_store().await,
      "POST",
      "/api/safety-score",
      Some(json!({
        "latitude": 10.0,
        "longitude": 10.0,
        "image_analysis": { "travel_safe": true },
        "weather": { "condition": "fog", "visibility_km": 0.4, "wind_speed": 2.0 },
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weather"]["safety_impact"], "negative");
    assert_eq!(body["breakdown"]["image_analysis"], 55);
    assert_eq!(body["breakdown"]["weather"], 30);
  }

  #[tokio::test]
  async fn failed_or_empty_image_analysis_is_not_scored() {
    let store = make_store().await;
    let score = |image_analysis: Value| {
      send(
        store.clone(),
        "POST",
        "/api/safety-score",
        Some(json!({
          "latitude": 10.0,
          "longitude": 10.0,
          "image_analysis": image_analysis,
        })),
      )
    };

    let (_, without_photo) = score(Value::Null).await;
    assert_eq!(without_photo["safety_score"], 66);

    for payload in [json!({}), json!({ "error": "vision model unavailable" })] {
      let (status, body) = score(payload.clone()).await;
      assert_eq!(status, StatusCode::OK);
      assert_eq!(body["breakdown"]["image_analysis"], Value::Null, "{payload}");
      assert_eq!(body["safety_score"], without_photo["safety_score"], "{payload}");
    }
  }
}
