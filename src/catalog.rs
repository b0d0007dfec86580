//! Reference catalog: facilities, sports, membership tiers and the rate table
//!
//! Loaded once per process and shared read-only. Structural problems are
//! rejected at construction; lookups afterwards are permissive and fall back
//! to documented defaults instead of failing.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::models::{
  CatalogSpec, DaytimeAdjustment, FacilityProfile, FacilitySpec, FacilityType, MembershipTier,
  OperatingHours, TierSpec,
};

/// Sport key holding a facility type's fallback rate
pub const DEFAULT_RATE_KEY: &str = "default";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum CatalogError {
  #[error("Failed to read catalog: {0}")]
  Io(String),

  #[error("Failed to parse catalog: {0}")]
  Parse(String),

  #[error("Invalid catalog: {0}")]
  Invalid(String),

  #[error("Unknown facility type in rate table: {0}")]
  UnknownFacilityType(String),
}

impl From<std::io::Error> for CatalogError {
  fn from(e: std::io::Error) -> Self {
    CatalogError::Io(e.to_string())
  }
}

impl From<serde_json::Error> for CatalogError {
  fn from(e: serde_json::Error) -> Self {
    CatalogError::Parse(e.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Reference Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCatalog {
  facilities: Vec<FacilityProfile>,
  tiers: Vec<MembershipTier>,
  rates: BTreeMap<FacilityType, BTreeMap<String, f64>>,
  global_default_rate: f64,
  season_sensitive_sports: Vec<String>,
  elite_training_sports: Vec<String>,
  wellness_sports: Vec<String>,
  entry_tier: String,
  operating_hours: OperatingHours,
}

impl ReferenceCatalog {
  /// Validate a raw spec and build the catalog from it
  pub fn from_spec(spec: CatalogSpec) -> Result<Self, CatalogError> {
    validate(&spec)?;
    Ok(Self::assemble(spec))
  }

  pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
    let spec: CatalogSpec = serde_json::from_str(json)?;
    Self::from_spec(spec)
  }

  /// Load a catalog from a JSON file
  pub fn load(path: &Path) -> Result<Self, CatalogError> {
    let json = std::fs::read_to_string(path)?;
    let catalog = Self::from_json_str(&json)?;
    log::info!(
      "catalog_path={} facilities={} tiers={}",
      path.display(),
      catalog.facilities.len(),
      catalog.tiers.len()
    );
    Ok(catalog)
  }

  /// The built-in facility complex: four turf fields, four courts,
  /// three dome zones and three specialty areas
  pub fn nxs_default() -> Self {
    Self::assemble(builtin_spec())
  }

  fn assemble(spec: CatalogSpec) -> Self {
    let mut facilities = Vec::new();
    for group in spec.facilities.values() {
      for f in group {
        if FacilityType::from_known_prefix(&f.id).is_none() {
          log::warn!(
            "facility_id={} unknown id prefix, treating as {}",
            f.id,
            FacilityType::SpecialtyArea
          );
        }
        facilities.push(FacilityProfile {
          id: f.id.clone(),
          name: f.name.clone(),
          facility_type: FacilityType::from_prefix(&f.id),
          sports: f.sports.clone(),
        });
      }
    }

    let tiers: Vec<MembershipTier> = spec
      .tiers
      .iter()
      .map(|(name, t)| MembershipTier {
        name: name.clone(),
        demand_multiplier: t.demand_multiplier,
        rate_multiplier: t.rate_multiplier,
        daytime: t.daytime,
      })
      .collect();

    // Rate table keys were checked by validate(); anything unparsable is skipped
    let rates = spec
      .rates
      .iter()
      .filter_map(|(key, sports)| key.parse::<FacilityType>().ok().map(|t| (t, sports.clone())))
      .collect();

    let entry_tier = spec.entry_tier.clone().unwrap_or_else(|| lowest_rate_tier(&tiers));

    Self {
      facilities,
      tiers,
      rates,
      global_default_rate: spec.global_default_rate,
      season_sensitive_sports: spec.season_sensitive_sports,
      elite_training_sports: spec.elite_training_sports,
      wellness_sports: spec.wellness_sports,
      entry_tier,
      operating_hours: spec.operating_hours,
    }
  }

  pub fn facilities(&self) -> &[FacilityProfile] {
    &self.facilities
  }

  pub fn facilities_of_type(&self, facility_type: FacilityType) -> Vec<&FacilityProfile> {
    self
      .facilities
      .iter()
      .filter(|f| f.facility_type == facility_type)
      .collect()
  }

  pub fn facility(&self, facility_id: &str) -> Option<&FacilityProfile> {
    self.facilities.iter().find(|f| f.id == facility_id)
  }

  /// Facility category from the id prefix. Unknown prefixes are Specialty Area.
  pub fn facility_type_of(&self, facility_id: &str) -> FacilityType {
    FacilityType::from_prefix(facility_id)
  }

  pub fn tiers(&self) -> &[MembershipTier] {
    &self.tiers
  }

  pub fn tier(&self, name: &str) -> Option<&MembershipTier> {
    self.tiers.iter().find(|t| t.name == name)
  }

  /// Tier used for the beginner-programs rule
  pub fn entry_tier(&self) -> &str {
    &self.entry_tier
  }

  pub fn operating_hours(&self) -> OperatingHours {
    self.operating_hours
  }

  pub fn season_sensitive_sports(&self) -> &[String] {
    &self.season_sensitive_sports
  }

  pub fn is_season_sensitive(&self, sport: &str) -> bool {
    self.season_sensitive_sports.iter().any(|s| s == sport)
  }

  pub fn is_elite_training(&self, sport: &str) -> bool {
    self.elite_training_sports.iter().any(|s| s == sport)
  }

  pub fn elite_training_sports(&self) -> &[String] {
    &self.elite_training_sports
  }

  pub fn is_wellness(&self, sport: &str) -> bool {
    self.wellness_sports.iter().any(|s| s == sport)
  }

  pub fn wellness_sports(&self) -> &[String] {
    &self.wellness_sports
  }

  /// Every distinct sport offered anywhere, in catalog order
  pub fn sports(&self) -> Vec<&str> {
    let mut seen = HashSet::new();
    self
      .facilities
      .iter()
      .flat_map(|f| f.sports.iter())
      .filter(|s| seen.insert(s.as_str()))
      .map(|s| s.as_str())
      .collect()
  }

  /// Hourly rate for a sport at a facility type.
  ///
  /// Resolution: exact sport -> facility type `"default"` -> global default.
  pub fn sport_rate(&self, facility_type: FacilityType, sport: &str) -> f64 {
    let Some(table) = self.rates.get(&facility_type) else {
      return self.global_default_rate;
    };
    table
      .get(sport)
      .or_else(|| table.get(DEFAULT_RATE_KEY))
      .copied()
      .unwrap_or(self.global_default_rate)
  }

  /// Rate multiplier for a tier, 1.0 when the tier is unknown
  pub fn tier_rate_multiplier(&self, tier: &str) -> f64 {
    self.tier(tier).map(|t| t.rate_multiplier).unwrap_or(1.0)
  }

  /// Effective hourly rate: sport rate scaled by the tier's rate multiplier
  pub fn base_rate(&self, facility_type: FacilityType, sport: &str, tier: &str) -> f64 {
    self.sport_rate(facility_type, sport) * self.tier_rate_multiplier(tier)
  }
}

fn lowest_rate_tier(tiers: &[MembershipTier]) -> String {
  tiers
    .iter()
    .min_by(|a, b| {
      a.rate_multiplier
        .partial_cmp(&b.rate_multiplier)
        .unwrap_or(std::cmp::Ordering::Equal)
    })
    .map(|t| t.name.clone())
    .unwrap_or_default()
}

/// ---------------------------------------------------------------------------
/// Validation
/// ---------------------------------------------------------------------------

fn check_multiplier(what: &str, value: f64) -> Result<(), CatalogError> {
  if value.is_finite() && value >= 0.0 {
    Ok(())
  } else {
    Err(CatalogError::Invalid(format!("{} must be a non-negative number, got {}", what, value)))
  }
}

fn check_hours(what: &str, start: u8, end: u8) -> Result<(), CatalogError> {
  if start <= end && end <= 23 {
    Ok(())
  } else {
    Err(CatalogError::Invalid(format!("{} hours {}..={} out of range", what, start, end)))
  }
}

fn validate(spec: &CatalogSpec) -> Result<(), CatalogError> {
  if spec.tiers.is_empty() {
    return Err(CatalogError::Invalid("no membership tiers defined".into()));
  }

  check_hours("operating", spec.operating_hours.open, spec.operating_hours.close)?;
  check_multiplier("global default rate", spec.global_default_rate)?;

  let mut ids = HashSet::new();
  let mut names = HashSet::new();
  for f in spec.facilities.values().flatten() {
    if f.id.trim().is_empty() {
      return Err(CatalogError::Invalid(format!("facility '{}' has an empty id", f.name)));
    }
    if !ids.insert(f.id.as_str()) {
      return Err(CatalogError::Invalid(format!("duplicate facility id {}", f.id)));
    }
    // Aggregates and alerts key facilities by display name
    if !names.insert(f.name.as_str()) {
      return Err(CatalogError::Invalid(format!("duplicate facility name {}", f.name)));
    }
    if f.sports.is_empty() {
      return Err(CatalogError::Invalid(format!("facility {} lists no sports", f.id)));
    }
  }

  for (name, tier) in &spec.tiers {
    check_multiplier(&format!("{} demand multiplier", name), tier.demand_multiplier)?;
    check_multiplier(&format!("{} rate multiplier", name), tier.rate_multiplier)?;
    if let Some(adj) = tier.daytime {
      check_hours(&format!("{} daytime", name), adj.start_hour, adj.end_hour)?;
      check_multiplier(&format!("{} daytime multiplier", name), adj.demand_multiplier)?;
    }
  }

  for (key, sports) in &spec.rates {
    if key.parse::<FacilityType>().is_err() {
      return Err(CatalogError::UnknownFacilityType(key.clone()));
    }
    for (sport, rate) in sports {
      check_multiplier(&format!("{} / {} rate", key, sport), *rate)?;
    }
  }

  if let Some(entry) = &spec.entry_tier {
    if !spec.tiers.contains_key(entry) {
      return Err(CatalogError::Invalid(format!("entry tier {} is not a defined tier", entry)));
    }
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Built-in Catalog
/// ---------------------------------------------------------------------------

fn facility(id: &str, name: &str, sports: &[&str]) -> FacilitySpec {
  FacilitySpec {
    id: id.to_string(),
    name: name.to_string(),
    sports: sports.iter().map(|s| s.to_string()).collect(),
  }
}

fn tier(demand: f64, rate: f64, daytime: Option<DaytimeAdjustment>) -> TierSpec {
  TierSpec {
    demand_multiplier: demand,
    rate_multiplier: rate,
    daytime,
  }
}

fn rate_row(rows: &[(&str, f64)]) -> BTreeMap<String, f64> {
  rows.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Raw spec behind `ReferenceCatalog::nxs_default()`
pub fn builtin_spec() -> CatalogSpec {
  let mut facilities = BTreeMap::new();
  facilities.insert(
    "turf_fields".to_string(),
    vec![
      facility("TF001", "Turf Field A", &["Soccer", "Football", "Lacrosse", "Field Hockey"]),
      facility("TF002", "Turf Field B", &["Soccer", "Lacrosse", "Rugby", "Multi-Sport"]),
      facility("TF003", "Turf Field C", &["Football", "Lacrosse", "Soccer Training"]),
      facility("TF004", "Turf Field D", &["Soccer", "Lacrosse", "Ultimate Frisbee"]),
    ],
  );
  facilities.insert(
    "basketball_courts".to_string(),
    vec![
      facility("BC001", "Championship Court", &["Basketball", "Volleyball", "Badminton"]),
      facility("BC002", "Tournament Court", &["Basketball", "Volleyball", "Tennis"]),
      facility("BC003", "Training Court", &["Basketball", "Pickleball", "Multi-Sport"]),
      facility("BC004", "Community Court", &["Basketball", "Recreational", "Youth"]),
    ],
  );
  facilities.insert(
    "dome_zones".to_string(),
    vec![
      facility("DZ001", "Dome Zone 1", &["Baseball", "Softball", "Cricket"]),
      facility("DZ002", "Dome Zone 2", &["Softball", "T-Ball", "Training"]),
      facility("DZ003", "Player Lab", &["Elite Training", "Performance", "Assessment"]),
    ],
  );
  facilities.insert(
    "specialty_areas".to_string(),
    vec![
      facility("SA001", "Walking Track", &["Walking", "Running", "Fitness"]),
      facility("SA002", "Wellness Center", &["Fitness", "Yoga", "Therapy"]),
      facility("SA003", "Esports Arena", &["Gaming", "Streaming", "Competition"]),
    ],
  );

  let mut tiers = BTreeMap::new();
  tiers.insert("Venture North Club".to_string(), tier(1.6, 1.5, None));
  tiers.insert("All-Access".to_string(), tier(1.2, 1.2, None));
  tiers.insert(
    "Family Plan".to_string(),
    tier(
      1.1,
      0.9,
      Some(DaytimeAdjustment {
        start_hour: 9,
        end_hour: 15,
        demand_multiplier: 0.9,
      }),
    ),
  );
  tiers.insert("Basic Member".to_string(), tier(0.7, 0.8, None));
  tiers.insert("Community Advantage".to_string(), tier(0.5, 0.6, None));

  let mut rates = BTreeMap::new();
  rates.insert(
    "Turf Field".to_string(),
    rate_row(&[("Lacrosse", 120.0), ("Soccer", 95.0), ("Football", 110.0), ("default", 85.0)]),
  );
  rates.insert(
    "Basketball Court".to_string(),
    rate_row(&[("Basketball", 75.0), ("Volleyball", 65.0), ("default", 55.0)]),
  );
  rates.insert(
    "Dome Zone".to_string(),
    rate_row(&[("Elite Training", 200.0), ("Baseball", 150.0), ("default", 130.0)]),
  );
  rates.insert(
    "Specialty Area".to_string(),
    rate_row(&[("Fitness", 45.0), ("Gaming", 60.0), ("default", 35.0)]),
  );

  CatalogSpec {
    facilities,
    tiers,
    rates,
    season_sensitive_sports: vec!["Lacrosse".to_string()],
    elite_training_sports: vec!["Elite Training".to_string()],
    wellness_sports: vec!["Fitness".to_string(), "Yoga".to_string(), "Therapy".to_string()],
    entry_tier: Some("Basic Member".to_string()),
    operating_hours: OperatingHours::default(),
    global_default_rate: 50.0,
  }
}
