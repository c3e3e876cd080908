//! Incident records, the unit of the user-reported crime log.
//!
//! An incident is an immutable report pinned to a location. Records are only
//! ever appended; nothing in this workspace updates or deletes one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, location::GeoPoint};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned identifier. Strictly increasing in append order and never
/// reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct IncidentId(pub i64);

impl fmt::Display for IncidentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── IncidentRecord ──────────────────────────────────────────────────────────

/// A persisted incident report. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
  pub id:            IncidentId,
  pub latitude:      f64,
  pub longitude:     f64,
  /// Open category tag, e.g. `theft`, `assault`, `vandalism`.
  pub incident_type: String,
  pub description:   Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub reported_at:   DateTime<Utc>,
  /// Reserved for moderation; scoring ignores it.
  pub verified:      bool,
}

impl IncidentRecord {
  pub fn location(&self) -> GeoPoint {
    GeoPoint {
      latitude:  self.latitude,
      longitude: self.longitude,
    }
  }
}

// ─── NewIncident ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::IncidentStore::append`].
///
/// `id`, `reported_at` and `verified` are always set by the store; they are
/// not accepted from callers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
  pub location:      GeoPoint,
  pub incident_type: String,
  pub description:   Option<String>,
}

impl NewIncident {
  /// Validate raw report fields.
  ///
  /// The incident type is trimmed and must be non-empty; a blank description
  /// is stored as `None`.
  pub fn new(
    latitude: f64,
    longitude: f64,
    incident_type: &str,
    description: Option<&str>,
  ) -> Result<Self> {
    let location = GeoPoint::new(latitude, longitude)?;

    let incident_type = incident_type.trim();
    if incident_type.is_empty() {
      return Err(Error::EmptyIncidentType);
    }

    let description = description
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .map(str::to_owned);

    Ok(Self {
      location,
      incident_type: incident_type.to_owned(),
      description,
    })
  }
}

// ─── Query results ───────────────────────────────────────────────────────────

/// An incident returned by a radius query, annotated with its distance from
/// the query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyIncident {
  #[serde(flatten)]
  pub incident:    IncidentRecord,
  /// Geodesic distance in kilometres, rounded to two decimals.
  pub distance_km: f64,
}

impl NearbyIncident {
  pub fn new(incident: IncidentRecord, distance_km: f64) -> Self {
    Self {
      incident,
      distance_km: (distance_km * 100.0).round() / 100.0,
    }
  }
}

/// A stored row that could not be decoded into an [`IncidentRecord`], e.g.
/// one missing its coordinates or timestamp. Scans skip these instead of
/// failing.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedIncident {
  pub id:       Option<IncidentId>,
  /// Where the row was reported, if its coordinates are valid. Lets radius
  /// queries ignore broken rows that are nowhere near the query point.
  pub location: Option<GeoPoint>,
  pub reason:   String,
}

impl fmt::Display for MalformedIncident {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.id {
      Some(id) => write!(f, "malformed incident {id}: {}", self.reason),
      None => write!(f, "malformed incident ?: {}", self.reason),
    }
  }
}

impl std::error::Error for MalformedIncident {}

/// What a store scan yields per row.
pub type ScannedIncident = std::result::Result<IncidentRecord, MalformedIncident>;
