//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Decoding never fails the whole
//! scan: a row that cannot become an [`IncidentRecord`] is reported as a
//! [`MalformedIncident`] instead.

use chrono::{DateTime, Utc};
use travelsafe_core::{
  incident::{IncidentId, IncidentRecord, MalformedIncident, ScannedIncident},
  location::GeoPoint,
};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>, String> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| format!("unparsable reported_at {s:?}: {e}"))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every incident SELECT; matches [`RawIncident::from_row`].
pub const INCIDENT_COLUMNS: &str =
  "id, latitude, longitude, incident_type, description, reported_at, verified";

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub id:            i64,
  pub latitude:      Option<f64>,
  pub longitude:     Option<f64>,
  pub incident_type: Option<String>,
  pub description:   Option<String>,
  pub reported_at:   Option<String>,
  pub verified:      bool,
}

impl RawIncident {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      latitude:      row.get(1)?,
      longitude:     row.get(2)?,
      incident_type: row.get(3)?,
      description:   row.get(4)?,
      reported_at:   row.get(5)?,
      verified:      row.get(6)?,
    })
  }

  pub fn into_scanned(self) -> ScannedIncident {
    let id = IncidentId(self.id);
    let unlocated = |reason: String| MalformedIncident {
      id: Some(id),
      location: None,
      reason,
    };

    let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
      return Err(unlocated("missing coordinates".to_owned()));
    };
    let location = GeoPoint::new(latitude, longitude)
      .map_err(|e| unlocated(e.to_string()))?;

    // From here on the row can be placed on the map.
    let malformed = |reason: String| MalformedIncident {
      id: Some(id),
      location: Some(location),
      reason,
    };

    let reported_at = self
      .reported_at
      .as_deref()
      .ok_or_else(|| malformed("missing reported_at".to_owned()))
      .and_then(|s| decode_dt(s).map_err(malformed))?;

    let incident_type = self
      .incident_type
      .filter(|t| !t.trim().is_empty())
      .ok_or_else(|| malformed("missing incident_type".to_owned()))?;

    Ok(IncidentRecord {
      id,
      latitude: location.latitude,
      longitude: location.longitude,
      incident_type,
      description: self.description,
      reported_at,
      verified: self.verified,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw() -> RawIncident {
    RawIncident {
      id:            3,
      latitude:      Some(51.5),
      longitude:     Some(-0.12),
      incident_type: Some("theft".into()),
      description:   None,
      reported_at:   Some("2025-05-01T10:00:00+00:00".into()),
      verified:      false,
    }
  }

  #[test]
  fn decodes_complete_row() {
    let record = raw().into_scanned().unwrap();
    assert_eq!(record.id, IncidentId(3));
    assert_eq!(encode_dt(record.reported_at), "2025-05-01T10:00:00+00:00");
  }

  #[test]
  fn missing_fields_are_malformed() {
    let mut r = raw();
    r.latitude = None;
    let err = r.into_scanned().unwrap_err();
    assert_eq!(err.id, Some(IncidentId(3)));
    assert_eq!(err.location, None);
    assert_eq!(err.reason, "missing coordinates");

    let mut r = raw();
    r.reported_at = None;
    let err = r.into_scanned().unwrap_err();
    assert_eq!(err.reason, "missing reported_at");
    assert_eq!(err.location, GeoPoint::new(51.5, -0.12).ok());

    let mut r = raw();
    r.reported_at = Some("yesterday".into());
    assert!(r.into_scanned().unwrap_err().reason.contains("unparsable"));

    let mut r = raw();
    r.longitude = Some(400.0);
    let err = r.into_scanned().unwrap_err();
    assert!(err.reason.contains("longitude"));
    assert_eq!(err.location, None);
  }
}
