//! The `IncidentStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `travelsafe-store-sqlite`). The aggregator and the HTTP layer depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  incident::{IncidentRecord, NewIncident, ScannedIncident},
  location::BoundingBox,
};

/// Abstraction over a durable, append-only incident log.
///
/// Records are never updated or deleted. Implementations must serialise
/// appends so that concurrent writers cannot lose records, and must bound
/// every call with a timeout rather than block indefinitely. Readers only
/// need to observe committed appends.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new incident and return the stored record.
  ///
  /// The store assigns the id (strictly increasing) and the `reported_at`
  /// timestamp. A failed append leaves earlier records untouched.
  fn append(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<IncidentRecord, Self::Error>> + Send + '_;

  /// Every stored row, in append order. Rows that cannot be decoded are
  /// yielded as `Err` so callers can skip them without failing the scan.
  fn query_all(
    &self,
  ) -> impl Future<Output = Result<Vec<ScannedIncident>, Self::Error>> + Send + '_;

  /// Rows whose coordinates fall inside `bbox`, in append order, plus any
  /// rows whose coordinates are missing or invalid. Undecodable rows that do
  /// have valid coordinates follow the same box filter as good ones.
  ///
  /// Callers still apply their own distance filter; this only narrows the
  /// scan.
  fn query_region(
    &self,
    bbox: BoundingBox,
  ) -> impl Future<Output = Result<Vec<ScannedIncident>, Self::Error>> + Send + '_;

  /// Total number of stored rows.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
