//! Human-readable risk buckets.
//!
//! The same five labels are produced by two independent threshold ladders:
//! one over a crime rate (higher is worse) and one over a safety score (higher
//! is better).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
  VerySafe,
  Safe,
  Moderate,
  Caution,
  Unsafe,
}

impl SafetyLevel {
  /// Bucket a crime rate in `0..=100`.
  pub fn from_crime_rate(crime_rate: u8) -> Self {
    match crime_rate {
      0..30 => Self::VerySafe,
      30..50 => Self::Safe,
      50..70 => Self::Moderate,
      70..85 => Self::Caution,
      _ => Self::Unsafe,
    }
  }

  /// Bucket a fused safety score in `1..=100`.
  pub fn from_safety_score(score: u8) -> Self {
    match score {
      80.. => Self::VerySafe,
      60.. => Self::Safe,
      40.. => Self::Moderate,
      20.. => Self::Caution,
      _ => Self::Unsafe,
    }
  }

  /// Whether the user should be warned.
  pub fn is_alert(&self) -> bool { matches!(self, Self::Caution | Self::Unsafe) }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::VerySafe => "very_safe",
      Self::Safe => "safe",
      Self::Moderate => "moderate",
      Self::Caution => "caution",
      Self::Unsafe => "unsafe",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn crime_rate_ladder() {
    assert_eq!(SafetyLevel::from_crime_rate(0), SafetyLevel::VerySafe);
    assert_eq!(SafetyLevel::from_crime_rate(29), SafetyLevel::VerySafe);
    assert_eq!(SafetyLevel::from_crime_rate(30), SafetyLevel::Safe);
    assert_eq!(SafetyLevel::from_crime_rate(49), SafetyLevel::Safe);
    assert_eq!(SafetyLevel::from_crime_rate(50), SafetyLevel::Moderate);
    assert_eq!(SafetyLevel::from_crime_rate(69), SafetyLevel::Moderate);
    assert_eq!(SafetyLevel::from_crime_rate(70), SafetyLevel::Caution);
    assert_eq!(SafetyLevel::from_crime_rate(84), SafetyLevel::Caution);
    assert_eq!(SafetyLevel::from_crime_rate(85), SafetyLevel::Unsafe);
    assert_eq!(SafetyLevel::from_crime_rate(100), SafetyLevel::Unsafe);
  }

  #[test]
  fn safety_score_ladder() {
    assert_eq!(SafetyLevel::from_safety_score(100), SafetyLevel::VerySafe);
    assert_eq!(SafetyLevel::from_safety_score(80), SafetyLevel::VerySafe);
    assert_eq!(SafetyLevel::from_safety_score(79), SafetyLevel::Safe);
    assert_eq!(SafetyLevel::from_safety_score(60), SafetyLevel::Safe);
    assert_eq!(SafetyLevel::from_safety_score(59), SafetyLevel::Moderate);
    assert_eq!(SafetyLevel::from_safety_score(40), SafetyLevel::Moderate);
    assert_eq!(SafetyLevel::from_safety_score(39), SafetyLevel::Caution);
    assert_eq!(SafetyLevel::from_safety_score(20), SafetyLevel::Caution);
    assert_eq!(SafetyLevel::from_safety_score(19), SafetyLevel::Unsafe);
    assert_eq!(SafetyLevel::from_safety_score(1), SafetyLevel::Unsafe);
  }

  #[test]
  fn only_caution_and_unsafe_alert() {
    assert!(!SafetyLevel::VerySafe.is_alert());
    assert!(!SafetyLevel::Safe.is_alert());
    assert!(!SafetyLevel::Moderate.is_alert());
    assert!(SafetyLevel::Caution.is_alert());
    assert!(SafetyLevel::Unsafe.is_alert());
  }

  #[test]
  fn serialises_as_snake_case() {
    assert_eq!(
      serde_json::to_string(&SafetyLevel::VerySafe).unwrap(),
      "\"very_safe\""
    );
    assert_eq!(SafetyLevel::VerySafe.as_str(), "very_safe");
  }
}
