//! Hazard indicators produced by the image-analysis collaborator.
//!
//! How these are derived from pixels is not this crate's concern; the fusion
//! engine only consumes the record below. Every field has a serde default that
//! mirrors what the collaborator assumes when it omits a key.

use serde::{Deserialize, Deserializer, Serialize};

/// How dangerous the road condition in an image appears.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HazardSeverity {
  #[default]
  None,
  Low,
  Moderate,
  High,
  Critical,
}

/// Three-step ordinal used for lighting and cleanliness.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
  Good,
  #[default]
  Moderate,
  Poor,
}

/// Road hazards detected in the image.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(default)]
pub struct RoadHazards {
  pub construction_roadwork: bool,
  pub water_flooding:        bool,
  pub obstacles_debris:      bool,
  pub poor_road_condition:   bool,
  pub traffic_hazards:       bool,
}

impl RoadHazards {
  /// Number of hazard kinds flagged.
  pub fn count(&self) -> u8 {
    [
      self.construction_roadwork,
      self.water_flooding,
      self.obstacles_debris,
      self.poor_road_condition,
      self.traffic_hazards,
    ]
    .into_iter()
    .filter(|flag| *flag)
    .count() as u8
  }
}

/// The hazard-analysis record for a single photograph.
///
/// An absent record (no photo supplied) is represented by `None` at the call
/// site and is never substituted with `HazardIndicators::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardIndicators {
  pub road_hazards:       RoadHazards,
  pub hazard_severity:    HazardSeverity,
  pub lighting:           Condition,
  pub people_present:     bool,
  pub cleanliness:        Condition,
  /// The collaborator's own verdict on whether travel is safe.
  pub travel_safe:        bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hazard_description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub safety_notes:       Option<String>,
}

impl Default for HazardIndicators {
  fn default() -> Self {
    Self {
      road_hazards:       RoadHazards::default(),
      hazard_severity:    HazardSeverity::None,
      lighting:           Condition::Moderate,
      people_present:     false,
      cleanliness:        Condition::Moderate,
      travel_safe:        true,
      hazard_description: None,
      safety_notes:       None,
    }
  }
}

// ─── Collaborator payload ────────────────────────────────────────────────────

/// The vision collaborator's payload as sent over the wire. Every key is
/// optional, and a failed analysis carries `error`.
#[derive(Debug, Deserialize)]
struct VisionReport {
  road_hazards:       Option<RoadHazards>,
  hazard_severity:    Option<HazardSeverity>,
  lighting:           Option<Condition>,
  people_present:     Option<bool>,
  cleanliness:        Option<Condition>,
  travel_safe:        Option<bool>,
  hazard_description: Option<String>,
  safety_notes:       Option<String>,
  error:              Option<String>,
}

impl VisionReport {
  /// Indicators to score, or `None` when the analysis failed or produced no
  /// indicators at all.
  fn into_indicators(self) -> Option<HazardIndicators> {
    if let Some(error) = &self.error {
      tracing::warn!(%error, "image analysis failed, scoring without it");
      return None;
    }

    let empty = self.road_hazards.is_none()
      && self.hazard_severity.is_none()
      && self.lighting.is_none()
      && self.people_present.is_none()
      && self.cleanliness.is_none()
      && self.travel_safe.is_none();
    if empty {
      return None;
    }

    let defaults = HazardIndicators::default();
    Some(HazardIndicators {
      road_hazards:       self.road_hazards.unwrap_or(defaults.road_hazards),
      hazard_severity:    self.hazard_severity.unwrap_or(defaults.hazard_severity),
      lighting:           self.lighting.unwrap_or(defaults.lighting),
      people_present:     self.people_present.unwrap_or(defaults.people_present),
      cleanliness:        self.cleanliness.unwrap_or(defaults.cleanliness),
      travel_safe:        self.travel_safe.unwrap_or(defaults.travel_safe),
      hazard_description: self.hazard_description,
      safety_notes:       self.safety_notes,
    })
  }
}

/// Deserialize an optional vision payload for use with
/// `#[serde(default, deserialize_with = "...")]`.
///
/// `null`, `{}` and any payload carrying `error` all yield `None`, so a
/// failed analysis is excluded from scoring instead of counting as a neutral
/// photo.
pub fn deserialize_reported<'de, D>(
  deserializer: D,
) -> Result<Option<HazardIndicators>, D::Error>
where
  D: Deserializer<'de>,
{
  let report = Option::<VisionReport>::deserialize(deserializer)?;
  Ok(report.and_then(VisionReport::into_indicators))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts_flagged_hazards() {
    let hazards = RoadHazards {
      construction_roadwork: true,
      water_flooding: true,
      traffic_hazards: true,
      ..RoadHazards::default()
    };
    assert_eq!(hazards.count(), 3);
    assert_eq!(RoadHazards::default().count(), 0);
  }

  #[test]
  fn missing_keys_take_collaborator_defaults() {
    let parsed: HazardIndicators =
      serde_json::from_str(r#"{"hazard_severity":"high","road_hazards":{"water_flooding":true}}"#)
        .unwrap();
    assert_eq!(parsed.hazard_severity, HazardSeverity::High);
    assert!(parsed.road_hazards.water_flooding);
    assert!(!parsed.road_hazards.construction_roadwork);
    assert_eq!(parsed.lighting, Condition::Moderate);
    assert_eq!(parsed.cleanliness, Condition::Moderate);
    assert!(parsed.travel_safe);
    assert!(!parsed.people_present);
  }

  #[test]
  fn severity_uses_lowercase_labels() {
    let json = serde_json::to_string(&HazardSeverity::Critical).unwrap();
    assert_eq!(json, "\"critical\"");
    let parsed: HazardSeverity = serde_json::from_str("\"none\"").unwrap();
    assert_eq!(parsed, HazardSeverity::None);
  }

  #[derive(Debug, Deserialize)]
  struct Request {
    #[serde(default, deserialize_with = "deserialize_reported")]
    image_analysis: Option<HazardIndicators>,
  }

  fn image_analysis(json: &str) -> Option<HazardIndicators> {
    serde_json::from_str::<Request>(json).unwrap().image_analysis
  }

  #[test]
  fn absent_null_and_empty_reports_are_no_photo() {
    assert_eq!(image_analysis("{}"), None);
    assert_eq!(image_analysis(r#"{"image_analysis":null}"#), None);
    assert_eq!(image_analysis(r#"{"image_analysis":{}}"#), None);
  }

  #[test]
  fn failed_analysis_is_no_photo() {
    assert_eq!(
      image_analysis(r#"{"image_analysis":{"error":"vision model unavailable"}}"#),
      None
    );
    assert_eq!(
      image_analysis(
        r#"{"image_analysis":{"hazard_severity":"low","error":"Could not decode image"}}"#
      ),
      None
    );
  }

  #[test]
  fn partial_report_fills_defaults() {
    let parsed =
      image_analysis(r#"{"image_analysis":{"lighting":"good","error":null}}"#).unwrap();
    assert_eq!(
      parsed,
      HazardIndicators {
        lighting: Condition::Good,
        ..HazardIndicators::default()
      }
    );
  }
}
