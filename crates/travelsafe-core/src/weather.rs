//! Weather impact as reported by the weather collaborator.

use serde::{Deserialize, Serialize};

/// Visibility below this many kilometres is treated as hazardous.
const MIN_SAFE_VISIBILITY_KM: f64 = 1.0;

/// Wind above this many metres per second is treated as hazardous.
const MAX_SAFE_WIND_SPEED: f64 = 15.0;

/// Conditions that always count against travel safety.
const HAZARDOUS_CONDITIONS: &[&str] = &["rain", "storm", "snow", "fog"];

/// Direction in which current weather moves travel safety.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SafetyImpact {
  Negative,
  #[default]
  Neutral,
  Positive,
}

/// The weather collaborator's verdict. It always produces one, falling back to
/// [`WeatherImpact::fallback`] when its upstream is unavailable.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct WeatherImpact {
  pub safety_impact: SafetyImpact,
}

impl WeatherImpact {
  pub fn new(safety_impact: SafetyImpact) -> Self { Self { safety_impact } }

  /// What the collaborator reports when it cannot reach its data source.
  pub fn fallback() -> Self { Self::new(SafetyImpact::Neutral) }
}

/// A raw observation, for collaborators that hand over conditions rather than
/// a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
  /// Main condition label, e.g. `clear`, `rain`, `fog`.
  pub condition:     String,
  pub visibility_km: f64,
  /// Metres per second.
  pub wind_speed:    f64,
}

impl WeatherConditions {
  /// Classify the observation. Hazardous conditions win first, then poor
  /// visibility, then high wind; anything else is neutral.
  pub fn impact(&self) -> WeatherImpact {
    let condition = self.condition.trim().to_ascii_lowercase();
    let negative = HAZARDOUS_CONDITIONS.contains(&condition.as_str())
      || self.visibility_km < MIN_SAFE_VISIBILITY_KM
      || self.wind_speed > MAX_SAFE_WIND_SPEED;

    if negative {
      WeatherImpact::new(SafetyImpact::Negative)
    } else {
      WeatherImpact::new(SafetyImpact::Neutral)
    }
  }
}

/// Either form a weather collaborator may hand over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherInput {
  Impact(WeatherImpact),
  Conditions(WeatherConditions),
}

impl WeatherInput {
  pub fn resolve(&self) -> WeatherImpact {
    match self {
      Self::Impact(impact) => *impact,
      Self::Conditions(conditions) => conditions.impact(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn conditions(condition: &str, visibility_km: f64, wind_speed: f64) -> WeatherConditions {
    WeatherConditions {
      condition: condition.into(),
      visibility_km,
      wind_speed,
    }
  }

  #[test]
  fn hazardous_conditions_are_negative() {
    for c in ["rain", "Storm", "snow", " fog "] {
      assert_eq!(
        conditions(c, 10.0, 2.0).impact().safety_impact,
        SafetyImpact::Negative,
        "{c}"
      );
    }
  }

  #[test]
  fn low_visibility_or_high_wind_is_negative() {
    assert_eq!(
      conditions("clear", 0.5, 2.0).impact().safety_impact,
      SafetyImpact::Negative
    );
    assert_eq!(
      conditions("clouds", 10.0, 15.5).impact().safety_impact,
      SafetyImpact::Negative
    );
  }

  #[test]
  fn boundaries_are_neutral() {
    assert_eq!(
      conditions("clear", 1.0, 15.0).impact().safety_impact,
      SafetyImpact::Neutral
    );
  }

  #[test]
  fn fallback_is_neutral() {
    assert_eq!(WeatherImpact::fallback().safety_impact, SafetyImpact::Neutral);
  }

  #[test]
  fn input_accepts_either_shape() {
    let impact: WeatherInput =
      serde_json::from_str(r#"{"safety_impact":"positive"}"#).unwrap();
    assert_eq!(impact.resolve().safety_impact, SafetyImpact::Positive);

    let raw: WeatherInput = serde_json::from_str(
      r#"{"condition":"snow","visibility_km":4.0,"wind_speed":3.0}"#,
    )
    .unwrap();
    assert_eq!(raw.resolve().safety_impact, SafetyImpact::Negative);
  }
}
