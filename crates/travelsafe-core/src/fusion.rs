//! Score fusion: combines image, weather and crime factors into one bounded
//! safety score.
//!
//! The factors are folded in one at a time, each as a linear blend against the
//! running score, starting from a neutral 50:
//!
//! | Step   | Running score keeps | Factor weight |
//! |--------|---------------------|---------------|
//! | image  | 0.60                | 0.40          |
//! | weather| 0.75                | 0.25          |
//! | crime  | 0.60                | 0.40          |
//!
//! Because each blend is relative to the running score, the last factor
//! (crime) dominates the outcome. The alert thresholds were tuned against this
//! exact arithmetic, so it is not a conventional weighted average and must not
//! be rewritten as one.

use serde::{Deserialize, Serialize};

use crate::{
  crime::CrimeSignal,
  hazard::{Condition, HazardIndicators, HazardSeverity},
  level::SafetyLevel,
  weather::{SafetyImpact, WeatherImpact},
};

const NEUTRAL_SCORE: f64 = 50.0;

const IMAGE_KEEP: f64 = 0.6;
const IMAGE_WEIGHT: f64 = 0.4;
const WEATHER_KEEP: f64 = 0.75;
const WEATHER_WEIGHT: f64 = 0.25;
const CRIME_KEEP: f64 = 0.6;
const CRIME_WEIGHT: f64 = 0.4;

/// Lowest image factor. Non-zero so that a fully hazardous photo remains
/// distinguishable from "no photo" in the breakdown.
pub const MIN_IMAGE_SCORE: i32 = 5;

/// Penalty per flagged road hazard when the collaborator reported no severity.
const PER_HAZARD_PENALTY: i32 = 8;

/// Extra penalty when the collaborator says travel is unsafe but its severity
/// does not already reflect that.
const UNSAFE_VERDICT_PENALTY: i32 = 15;

// ─── Result types ────────────────────────────────────────────────────────────

/// Per-factor scores before blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
  /// `None` when no photo was analysed.
  pub image_analysis: Option<u8>,
  pub weather:        u8,
  pub crime_data:     u8,
}

/// The fused safety verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyScoreResult {
  /// `1..=100`; 1 is maximally unsafe. Never 0.
  pub safety_score: u8,
  pub safety_level: SafetyLevel,
  /// Set whenever the level is caution or unsafe.
  pub alert:        bool,
  pub breakdown:    Breakdown,
}

// ─── Factors ─────────────────────────────────────────────────────────────────

/// Score a photo's hazard indicators on `5..=100`.
pub fn image_score(indicators: &HazardIndicators) -> u8 {
  let mut score: i32 = 50;
  let severity = indicators.hazard_severity;

  score -= match severity {
    HazardSeverity::Critical => 40,
    HazardSeverity::High => 30,
    HazardSeverity::Moderate => 20,
    HazardSeverity::Low => 12,
    HazardSeverity::None => {
      PER_HAZARD_PENALTY * i32::from(indicators.road_hazards.count())
    }
  };

  // A moderate-or-worse severity already encodes the unsafe verdict.
  if !indicators.travel_safe
    && matches!(severity, HazardSeverity::None | HazardSeverity::Low)
  {
    score -= UNSAFE_VERDICT_PENALTY;
  }

  score += match indicators.lighting {
    Condition::Good => 10,
    Condition::Moderate => 3,
    Condition::Poor => -3,
  };

  if indicators.people_present {
    score += 5;
  }

  score += match indicators.cleanliness {
    Condition::Good => 5,
    Condition::Moderate => 2,
    Condition::Poor => -2,
  };

  score.clamp(MIN_IMAGE_SCORE, 100) as u8
}

pub fn weather_score(weather: &WeatherImpact) -> u8 {
  match weather.safety_impact {
    SafetyImpact::Negative => 30,
    SafetyImpact::Neutral => 50,
    SafetyImpact::Positive => 70,
  }
}

/// Inverted crime rate: lower crime gives a higher score.
pub fn crime_score(crime: &CrimeSignal) -> u8 { 100u8.saturating_sub(crime.crime_rate) }

fn blend(score: f64, keep: f64, factor: u8, weight: f64) -> f64 {
  score * keep + f64::from(factor) * weight
}

// ─── Fusion ──────────────────────────────────────────────────────────────────

/// Fuse the three signals. Pure: identical inputs give identical outputs.
///
/// `hazards` is `None` when no photo was supplied; the image step is then
/// skipped entirely rather than scored as neutral.
pub fn fuse(
  hazards: Option<&HazardIndicators>,
  weather: &WeatherImpact,
  crime: &CrimeSignal,
) -> SafetyScoreResult {
  let mut score = NEUTRAL_SCORE;

  let image = hazards.map(image_score);
  if let Some(image) = image {
    score = blend(score, IMAGE_KEEP, image, IMAGE_WEIGHT);
  }

  let weather = weather_score(weather);
  score = blend(score, WEATHER_KEEP, weather, WEATHER_WEIGHT);

  let crime = crime_score(crime);
  score = blend(score, CRIME_KEEP, crime, CRIME_WEIGHT);

  let safety_score = (score.trunc() as i64).clamp(1, 100) as u8;
  let safety_level = SafetyLevel::from_safety_score(safety_score);

  tracing::debug!(
    ?image,
    weather,
    crime,
    safety_score,
    level = safety_level.as_str(),
    "fused safety score"
  );

  SafetyScoreResult {
    safety_score,
    safety_level,
    alert: safety_level.is_alert(),
    breakdown: Breakdown {
      image_analysis: image,
      weather,
      crime_data: crime,
    },
  }
}
