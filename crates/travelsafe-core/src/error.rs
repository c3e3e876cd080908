//! Error types for `travelsafe-core`.

use thiserror::Error;

/// Input rejected before it reaches the aggregator or the store.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
  #[error("latitude must be a finite value in [-90, 90], got {0}")]
  InvalidLatitude(f64),

  #[error("longitude must be a finite value in [-180, 180], got {0}")]
  InvalidLongitude(f64),

  #[error("radius must be a finite, non-negative number of kilometres, got {0}")]
  InvalidRadius(f64),

  #[error("incident type must not be empty")]
  EmptyIncidentType,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a store-backed operation in [`crate::assess`]: either the input
/// was rejected up front, or the store itself failed.
#[derive(Debug, Error)]
pub enum ServiceError<E> {
  #[error(transparent)]
  InvalidInput(#[from] Error),

  #[error("storage failure: {0}")]
  Storage(#[source] E),
}
