//! Handler for `POST /safety-score`.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use travelsafe_core::{
  assess::{self, SafetyQuery, SafetyReport},
  hazard::{self, HazardIndicators},
  store::IncidentStore,
  weather::WeatherInput,
};

use crate::error::ApiError;

/// JSON body accepted by `POST /safety-score`.
///
/// `image_analysis` is the vision collaborator's output. Omitting it, sending
/// `null` or `{}`, or a payload with `error` set all mean no usable photo.
/// `weather` accepts either a verdict or a raw observation.
#[derive(Debug, Deserialize)]
pub struct SafetyScoreBody {
  pub latitude:       f64,
  pub longitude:      f64,
  pub radius_km:      Option<f64>,
  #[serde(default, deserialize_with = "hazard::deserialize_reported")]
  pub image_analysis: Option<HazardIndicators>,
  pub weather:        Option<WeatherInput>,
}

/// `POST /safety-score`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<SafetyScoreBody>,
) -> Result<Json<SafetyReport>, ApiError>
where
  S: IncidentStore,
{
  let query = SafetyQuery::new(
    body.latitude,
    body.longitude,
    body.radius_km,
    body.image_analysis,
    body.weather.as_ref(),
  )?;
  let report = assess::assess(store.as_ref(), query, Utc::now()).await;
  Ok(Json(report))
}
