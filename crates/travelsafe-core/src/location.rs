//! WGS-84 points, geodesic distance and the bounding boxes used to pre-filter
//! incident scans.

use ::geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Search radius used when a caller does not supply one.
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Lower bound on the length of one degree of latitude or longitude-at-the-
/// equator, in kilometres. Derived from the smallest radius of curvature of
/// the WGS-84 ellipsoid (the meridional radius at the equator, ~6335 km).
const MIN_KM_PER_DEGREE: f64 = 110.56;

/// Slack applied to bounding boxes so that rounding never excludes a point
/// that lies exactly on the radius.
const BOX_MARGIN: f64 = 1.01;

// ─── GeoPoint ────────────────────────────────────────────────────────────────

/// A validated position in WGS-84 decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub latitude:  f64,
  pub longitude: f64,
}

impl GeoPoint {
  /// Build a point, rejecting non-finite or out-of-range coordinates.
  pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
      return Err(Error::InvalidLatitude(latitude));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
      return Err(Error::InvalidLongitude(longitude));
    }
    Ok(Self { latitude, longitude })
  }

  /// Geodesic distance on the WGS-84 ellipsoid, in kilometres.
  pub fn distance_km(&self, other: &GeoPoint) -> f64 {
    Geodesic.distance(self.as_point(), other.as_point()) / 1000.0
  }

  /// A latitude/longitude box that contains every point within `radius_km`
  /// of `self`.
  ///
  /// Returns `None` when the box would wrap over a pole or across the
  /// antimeridian; callers then scan without a spatial pre-filter.
  pub fn bounding_box(&self, radius_km: f64) -> Option<BoundingBox> {
    let d_lat = radius_km / MIN_KM_PER_DEGREE * BOX_MARGIN;
    let min_latitude = self.latitude - d_lat;
    let max_latitude = self.latitude + d_lat;
    if min_latitude < -90.0 || max_latitude > 90.0 {
      return None;
    }

    // Parallels shrink towards the poles, so widen by the narrowest one the
    // circle can reach.
    let widest = min_latitude.abs().max(max_latitude.abs());
    let cos = widest.to_radians().cos();
    if cos <= f64::EPSILON {
      return None;
    }
    let d_lon = d_lat / cos;
    let min_longitude = self.longitude - d_lon;
    let max_longitude = self.longitude + d_lon;
    if min_longitude < -180.0 || max_longitude > 180.0 {
      return None;
    }

    Some(BoundingBox {
      min_latitude,
      max_latitude,
      min_longitude,
      max_longitude,
    })
  }

  // geo uses x = longitude, y = latitude.
  fn as_point(&self) -> Point<f64> { Point::new(self.longitude, self.latitude) }
}

/// Validate a search radius in kilometres.
pub fn validate_radius(radius_km: f64) -> Result<f64> {
  if !radius_km.is_finite() || radius_km < 0.0 {
    return Err(Error::InvalidRadius(radius_km));
  }
  Ok(radius_km)
}

// ─── BoundingBox ─────────────────────────────────────────────────────────────

/// An axis-aligned latitude/longitude box. Never wraps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub min_latitude:  f64,
  pub max_latitude:  f64,
  pub min_longitude: f64,
  pub max_longitude: f64,
}

impl BoundingBox {
  pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
    (self.min_latitude..=self.max_latitude).contains(&latitude)
      && (self.min_longitude..=self.max_longitude).contains(&longitude)
  }
}
