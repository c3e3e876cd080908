//! Crime aggregator. Turns the raw incident log into a bounded crime signal
//! for a point and radius.
//!
//! Every incident inside the radius adds a flat penalty regardless of its
//! category, and incidents from the last 30 days add a second penalty on top.
//! An empty neighbourhood is scored at a low but non-zero baseline since the
//! absence of reports is not evidence of zero risk.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  incident::{NearbyIncident, ScannedIncident},
  level::SafetyLevel,
  location::GeoPoint,
  store::IncidentStore,
};

/// Crime rate reported when no incidents fall inside the radius.
pub const BASELINE_CRIME_RATE: u8 = 10;

/// Crime rate substituted when the incident store cannot be read.
pub const FALLBACK_CRIME_RATE: u8 = 20;

/// Penalty per incident inside the radius.
pub const INCIDENT_PENALTY: u64 = 15;

/// Additional penalty per incident reported within [`RECENT_WINDOW_DAYS`].
pub const RECENT_PENALTY: u64 = 10;

pub const RECENT_WINDOW_DAYS: i64 = 30;

/// How many matched incidents are echoed back in [`CrimeSignal::sample`].
pub const SAMPLE_SIZE: usize = 5;

// ─── CrimeSignal ─────────────────────────────────────────────────────────────

/// Where a [`CrimeSignal`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
  /// Aggregated from user incident reports.
  UserReports,
  /// Neutral stand-in used because the store was unavailable.
  Fallback,
}

/// Normalised crime risk around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeSignal {
  /// `0..=100`; 0 means no risk.
  pub crime_rate:       u8,
  pub safety_level:     SafetyLevel,
  /// Incidents inside the radius reported within the last 30 days.
  pub recent_incidents: u32,
  /// All incidents inside the radius.
  pub total_incidents:  u32,
  /// Distinct incident types among the matched set, sorted.
  pub incident_types:   Vec<String>,
  pub source:           SignalSource,
  /// The first few matched incidents in store order.
  pub sample:           Vec<NearbyIncident>,
  /// Rows skipped because they could not be decoded.
  pub skipped_records:  u32,
}

impl CrimeSignal {
  /// The neutral signal substituted when incident data cannot be loaded.
  pub fn fallback() -> Self {
    Self {
      crime_rate:       FALLBACK_CRIME_RATE,
      safety_level:     SafetyLevel::Safe,
      recent_incidents: 0,
      total_incidents:  0,
      incident_types:   Vec::new(),
      source:           SignalSource::Fallback,
      sample:           Vec::new(),
      skipped_records:  0,
    }
  }
}

/// `min(100, 10 + 15 × total + 10 × recent)`, or the baseline when `total` is
/// zero.
pub fn crime_rate(total: u32, recent: u32) -> u8 {
  if total == 0 {
    return BASELINE_CRIME_RATE;
  }
  let rate = u64::from(BASELINE_CRIME_RATE)
    + INCIDENT_PENALTY * u64::from(total)
    + RECENT_PENALTY * u64::from(recent);
  rate.min(100) as u8
}

// ─── Radius filter ───────────────────────────────────────────────────────────

/// Incidents inside a radius, plus the number of undecodable rows skipped on
/// the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nearby {
  pub incidents: Vec<NearbyIncident>,
  pub skipped:   u32,
}

/// Keep the scanned rows within `radius_km` of `point`, preserving scan order.
///
/// Malformed rows are logged and skipped. Only those that fall inside the
/// radius, or that cannot be located at all, count towards
/// [`Nearby::skipped`], so the count does not depend on how wide the scan was.
pub fn within_radius<I>(scan: I, point: &GeoPoint, radius_km: f64) -> Nearby
where
  I: IntoIterator<Item = ScannedIncident>,
{
  let mut nearby = Nearby::default();
  for row in scan {
    match row {
      Ok(record) => {
        let distance = point.distance_km(&record.location());
        if distance <= radius_km {
          nearby.incidents.push(NearbyIncident::new(record, distance));
        }
      }
      Err(malformed) => {
        let relevant = malformed
          .location
          .is_none_or(|at| point.distance_km(&at) <= radius_km);
        if relevant {
          tracing::warn!(%malformed, "skipping malformed incident");
          nearby.skipped += 1;
        }
      }
    }
  }
  nearby
}

/// Load the rows around `point` and filter them to the radius.
///
/// Uses the store's region query when a bounding box can be formed and a full
/// scan otherwise; both produce the same result.
pub async fn nearby<S>(
  store: &S,
  point: &GeoPoint,
  radius_km: f64,
) -> Result<Nearby, S::Error>
where
  S: IncidentStore,
{
  let scan = match point.bounding_box(radius_km) {
    Some(bbox) => store.query_region(bbox).await?,
    None => store.query_all().await?,
  };
  Ok(within_radius(scan, point, radius_km))
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Score an already-filtered neighbourhood as of `now`.
pub fn summarize(nearby: Nearby, now: DateTime<Utc>) -> CrimeSignal {
  let cutoff = now - TimeDelta::days(RECENT_WINDOW_DAYS);

  let total = nearby.incidents.len() as u32;
  let recent = nearby
    .incidents
    .iter()
    .filter(|n| n.incident.reported_at > cutoff)
    .count() as u32;

  let incident_types: BTreeSet<&str> = nearby
    .incidents
    .iter()
    .map(|n| n.incident.incident_type.as_str())
    .collect();

  let crime_rate = crime_rate(total, recent);

  CrimeSignal {
    crime_rate,
    safety_level: SafetyLevel::from_crime_rate(crime_rate),
    recent_incidents: recent,
    total_incidents: total,
    incident_types: incident_types.into_iter().map(str::to_owned).collect(),
    source: SignalSource::UserReports,
    sample: nearby.incidents.into_iter().take(SAMPLE_SIZE).collect(),
    skipped_records: nearby.skipped,
  }
}

/// Aggregate the crime signal for `point` from `store`.
///
/// Store failures are returned as-is; substituting a fallback is the caller's
/// decision (see [`crate::assess::crime_signal`]).
pub async fn aggregate<S>(
  store: &S,
  point: &GeoPoint,
  radius_km: f64,
  now: DateTime<Utc>,
) -> Result<CrimeSignal, S::Error>
where
  S: IncidentStore,
{
  let nearby = nearby(store, point, radius_km).await?;
  Ok(summarize(nearby, now))
}
