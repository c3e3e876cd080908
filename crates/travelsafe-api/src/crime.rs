//! Handler for `GET /crime`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Utc;
use travelsafe_core::{assess, crime::CrimeSignal, store::IncidentStore};

use crate::{PointParams, error::ApiError};

/// `GET /crime?latitude=..&longitude=..[&radius_km=1.0]`
///
/// Never fails on store errors; the fallback signal is returned instead,
/// tagged with `source: "fallback"`.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PointParams>,
) -> Result<Json<CrimeSignal>, ApiError>
where
  S: IncidentStore,
{
  let signal = assess::crime_at(
    store.as_ref(),
    params.latitude,
    params.longitude,
    params.radius_km,
    Utc::now(),
  )
  .await?;
  Ok(Json(signal))
}
