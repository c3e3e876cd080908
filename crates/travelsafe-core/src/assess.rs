//! Entry points for the request layer, expressed over any [`IncidentStore`].
//!
//! Input is validated here, before anything reaches the store. Crime data
//! degrades gracefully: if the store fails during a safety assessment, a
//! neutral [`CrimeSignal::fallback`] is used and the result says so.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  crime::{self, CrimeSignal},
  error::ServiceError,
  fusion::{self, SafetyScoreResult},
  hazard::HazardIndicators,
  incident::{IncidentRecord, NearbyIncident, NewIncident},
  location::{self, DEFAULT_RADIUS_KM, GeoPoint},
  store::IncidentStore,
  weather::{WeatherImpact, WeatherInput},
};

// ─── Incidents ───────────────────────────────────────────────────────────────

/// Validate and append a user report. Returns the stored record.
pub async fn report_incident<S>(
  store: &S,
  latitude: f64,
  longitude: f64,
  incident_type: &str,
  description: Option<&str>,
) -> Result<IncidentRecord, ServiceError<S::Error>>
where
  S: IncidentStore,
{
  let input = NewIncident::new(latitude, longitude, incident_type, description)?;
  let record = store.append(input).await.map_err(ServiceError::Storage)?;
  tracing::info!(
    id = %record.id,
    incident_type = %record.incident_type,
    "incident reported"
  );
  Ok(record)
}

/// Incidents within `radius_km` of a point, each with its distance attached.
pub async fn incidents_near<S>(
  store: &S,
  latitude: f64,
  longitude: f64,
  radius_km: f64,
) -> Result<Vec<NearbyIncident>, ServiceError<S::Error>>
where
  S: IncidentStore,
{
  let point = GeoPoint::new(latitude, longitude)?;
  let radius_km = location::validate_radius(radius_km)?;
  let nearby = crime::nearby(store, &point, radius_km)
    .await
    .map_err(ServiceError::Storage)?;
  Ok(nearby.incidents)
}

// ─── Crime ───────────────────────────────────────────────────────────────────

/// Aggregate crime around `point`, substituting the neutral fallback signal
/// if the store cannot be read.
pub async fn crime_signal<S>(
  store: &S,
  point: &GeoPoint,
  radius_km: f64,
  now: DateTime<Utc>,
) -> CrimeSignal
where
  S: IncidentStore,
{
  match crime::aggregate(store, point, radius_km, now).await {
    Ok(signal) => signal,
    Err(e) => {
      tracing::warn!(error = %e, "incident store unavailable, using fallback crime signal");
      CrimeSignal::fallback()
    }
  }
}

/// Validate raw coordinates and radius, then run [`crime_signal`].
pub async fn crime_at<S>(
  store: &S,
  latitude: f64,
  longitude: f64,
  radius_km: f64,
  now: DateTime<Utc>,
) -> Result<CrimeSignal>
where
  S: IncidentStore,
{
  let point = GeoPoint::new(latitude, longitude)?;
  let radius_km = location::validate_radius(radius_km)?;
  Ok(crime_signal(store, &point, radius_km, now).await)
}

// ─── Safety ──────────────────────────────────────────────────────────────────

/// A validated safety query.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyQuery {
  pub location:  GeoPoint,
  pub radius_km: f64,
  /// `None` when no photo was supplied.
  pub hazards:   Option<HazardIndicators>,
  pub weather:   WeatherImpact,
}

impl SafetyQuery {
  /// Validate raw request fields. A missing radius defaults to
  /// [`DEFAULT_RADIUS_KM`]; missing weather resolves to the collaborator's
  /// fallback.
  pub fn new(
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
    hazards: Option<HazardIndicators>,
    weather: Option<&WeatherInput>,
  ) -> Result<Self> {
    Ok(Self {
      location: GeoPoint::new(latitude, longitude)?,
      radius_km: location::validate_radius(radius_km.unwrap_or(DEFAULT_RADIUS_KM))?,
      hazards,
      weather: weather.map_or_else(WeatherImpact::fallback, WeatherInput::resolve),
    })
  }
}

/// A fused safety verdict together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
  #[serde(flatten)]
  pub score:       SafetyScoreResult,
  pub crime:       CrimeSignal,
  pub weather:     WeatherImpact,
  pub location:    GeoPoint,
  pub radius_km:   f64,
  pub assessed_at: DateTime<Utc>,
}

/// Aggregate crime for the query and fuse it with the image and weather
/// factors.
pub async fn assess<S>(store: &S, query: SafetyQuery, now: DateTime<Utc>) -> SafetyReport
where
  S: IncidentStore,
{
  let crime = crime_signal(store, &query.location, query.radius_km, now).await;
  let score = fusion::fuse(query.hazards.as_ref(), &query.weather, &crime);

  SafetyReport {
    score,
    crime,
    weather: query.weather,
    location: query.location,
    radius_km: query.radius_km,
    assessed_at: now,
  }
}
