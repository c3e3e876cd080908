//! Handlers for `/incidents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/incidents` | Body: [`NewIncidentBody`]; returns 201 + [`ReportReceipt`] |
//! | `GET`  | `/incidents/near` | `?latitude&longitude[&radius_km]`; store order, with `distance_km` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use travelsafe_core::{
  assess,
  incident::{IncidentId, IncidentRecord, NearbyIncident},
  store::IncidentStore,
};

use crate::{PointParams, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /incidents`.
#[derive(Debug, Deserialize)]
pub struct NewIncidentBody {
  pub latitude:      f64,
  pub longitude:     f64,
  pub incident_type: String,
  pub description:   Option<String>,
}

/// Response to a successful report.
#[derive(Debug, Serialize)]
pub struct ReportReceipt {
  pub success:     bool,
  pub incident_id: IncidentId,
  pub message:     String,
  pub incident:    IncidentRecord,
}

/// `POST /incidents`: returns 201 + the stored incident.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewIncidentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IncidentStore,
{
  let incident = assess::report_incident(
    store.as_ref(),
    body.latitude,
    body.longitude,
    &body.incident_type,
    body.description.as_deref(),
  )
  .await?;

  let receipt = ReportReceipt {
    success:     true,
    incident_id: incident.id,
    message:     "Incident reported successfully".to_owned(),
    incident,
  };
  Ok((StatusCode::CREATED, Json(receipt)))
}

// ─── Near ────────────────────────────────────────────────────────────────────

/// `GET /incidents/near?latitude=..&longitude=..[&radius_km=1.0]`
pub async fn near<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PointParams>,
) -> Result<Json<Vec<NearbyIncident>>, ApiError>
where
  S: IncidentStore,
{
  let incidents = assess::incidents_near(
    store.as_ref(),
    params.latitude,
    params.longitude,
    params.radius_km,
  )
  .await?;
  Ok(Json(incidents))
}
