use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// ---------------------------------------------------------------------------
/// Facility Type
/// ---------------------------------------------------------------------------

/// Coarse facility category, derived from the two-letter id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FacilityType {
  #[serde(rename = "Turf Field")]
  TurfField,
  #[serde(rename = "Basketball Court")]
  BasketballCourt,
  #[serde(rename = "Dome Zone")]
  DomeZone,
  #[serde(rename = "Specialty Area")]
  SpecialtyArea,
}

impl FacilityType {
  pub const ALL: [FacilityType; 4] = [
    FacilityType::TurfField,
    FacilityType::BasketballCourt,
    FacilityType::DomeZone,
    FacilityType::SpecialtyArea,
  ];

  /// Strict prefix lookup: TF, BC, DZ. None for anything else.
  pub fn from_known_prefix(facility_id: &str) -> Option<Self> {
    match facility_id.get(..2) {
      Some("TF") => Some(FacilityType::TurfField),
      Some("BC") => Some(FacilityType::BasketballCourt),
      Some("DZ") => Some(FacilityType::DomeZone),
      _ => None,
    }
  }

  /// Permissive lookup: unknown prefixes land in Specialty Area
  pub fn from_prefix(facility_id: &str) -> Self {
    Self::from_known_prefix(facility_id).unwrap_or(FacilityType::SpecialtyArea)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      FacilityType::TurfField => "Turf Field",
      FacilityType::BasketballCourt => "Basketball Court",
      FacilityType::DomeZone => "Dome Zone",
      FacilityType::SpecialtyArea => "Specialty Area",
    }
  }

  /// Key used for the per-type sections of the facility breakdown
  pub fn group_key(&self) -> &'static str {
    match self {
      FacilityType::TurfField => "turf_fields",
      FacilityType::BasketballCourt => "basketball_courts",
      FacilityType::DomeZone => "dome_zones",
      FacilityType::SpecialtyArea => "specialty_areas",
    }
  }
}

impl std::fmt::Display for FacilityType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for FacilityType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    FacilityType::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| format!("Unknown facility type: {}", s))
  }
}

/// ---------------------------------------------------------------------------
/// Facilities and Tiers
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityProfile {
  pub id: String,
  pub name: String,
  pub facility_type: FacilityType,
  pub sports: Vec<String>,
}

impl FacilityProfile {
  pub fn offers(&self, sport: &str) -> bool {
    self.sports.iter().any(|s| s == sport)
  }
}

/// Tier demand override for a span of hours (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaytimeAdjustment {
  pub start_hour: u8,
  pub end_hour: u8,
  pub demand_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipTier {
  pub name: String,
  pub demand_multiplier: f64,
  pub rate_multiplier: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub daytime: Option<DaytimeAdjustment>,
}

impl MembershipTier {
  /// Demand multiplier for a given hour, honoring the daytime override
  pub fn demand_multiplier_at(&self, hour: u8) -> f64 {
    match self.daytime {
      Some(adj) if (adj.start_hour..=adj.end_hour).contains(&hour) => adj.demand_multiplier,
      _ => self.demand_multiplier,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Catalog Input Shape
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
  pub open: u8,
  pub close: u8,
}

impl OperatingHours {
  pub fn hours(&self) -> RangeInclusive<u8> {
    self.open..=self.close
  }
}

impl Default for OperatingHours {
  fn default() -> Self {
    Self { open: 6, close: 22 }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySpec {
  pub id: String,
  pub name: String,
  pub sports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
  pub demand_multiplier: f64,
  pub rate_multiplier: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub daytime: Option<DaytimeAdjustment>,
}

/// Raw catalog as supplied by the host (JSON file or built-in table).
///
/// - `facilities`: group name -> facilities in that group
/// - `tiers`: tier name -> multipliers
/// - `rates`: facility type display name -> sport -> hourly rate, with a
///   `"default"` sport key per type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSpec {
  pub facilities: BTreeMap<String, Vec<FacilitySpec>>,
  pub tiers: BTreeMap<String, TierSpec>,
  pub rates: BTreeMap<String, BTreeMap<String, f64>>,
  #[serde(default = "default_season_sensitive_sports")]
  pub season_sensitive_sports: Vec<String>,
  /// Sports whose facilities get the prime-time training boost
  #[serde(default = "default_elite_training_sports")]
  pub elite_training_sports: Vec<String>,
  /// Sports reported together as the wellness trend
  #[serde(default = "default_wellness_sports")]
  pub wellness_sports: Vec<String>,
  #[serde(default)]
  pub entry_tier: Option<String>,
  #[serde(default)]
  pub operating_hours: OperatingHours,
  #[serde(default = "default_global_rate")]
  pub global_default_rate: f64,
}

fn default_season_sensitive_sports() -> Vec<String> {
  vec!["Lacrosse".to_string()]
}

fn default_elite_training_sports() -> Vec<String> {
  vec!["Elite Training".to_string()]
}

fn default_wellness_sports() -> Vec<String> {
  ["Fitness", "Yoga", "Therapy"].iter().map(|s| s.to_string()).collect()
}

fn default_global_rate() -> f64 {
  50.0
}
