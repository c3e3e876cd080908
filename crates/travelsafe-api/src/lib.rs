//! JSON REST API for TravelSafe.
//!
//! Exposes an axum [`Router`] backed by any
//! [`travelsafe_core::store::IncidentStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", travelsafe_api::api_router(store.clone()))
//! ```

pub mod crime;
pub mod error;
pub mod incidents;
pub mod safety;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use travelsafe_core::{location::DEFAULT_RADIUS_KM, store::IncidentStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: IncidentStore + 'static,
{
  Router::new()
    // Incidents
    .route("/incidents", post(incidents::create::<S>))
    .route("/incidents/near", get(incidents::near::<S>))
    // Crime
    .route("/crime", get(crime::handler::<S>))
    // Fusion
    .route("/safety-score", post(safety::handler::<S>))
    .with_state(store)
}

/// Query string shared by the point-and-radius lookups.
#[derive(Debug, Deserialize)]
pub struct PointParams {
  pub latitude:  f64,
  pub longitude: f64,
  #[serde(default = "default_radius")]
  pub radius_km: f64,
}

fn default_radius() -> f64 { DEFAULT_RADIUS_KM }
