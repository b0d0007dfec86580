//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - A small reference catalog
//! - Mock record factories
//! - Seeded random sources and session configs
//! - Helper assertions

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use crate::catalog::ReferenceCatalog;
use crate::config::DashboardConfig;
use crate::models::{
  CatalogSpec, DayCategory, FacilitySpec, FacilityType, OperatingHours, TierSpec, TimeCategory,
  UsageRecord,
};
use crate::projection::{day_name, is_prime_time, is_weekend, WEEK};
use crate::seasonality::Season;

/// ---------------------------------------------------------------------------
/// Catalog Fixtures
/// ---------------------------------------------------------------------------

/// Four facilities, two tiers, Lacrosse as the season-sensitive sport.
/// Small enough that projections stay fast in tests.
pub fn mock_catalog() -> ReferenceCatalog {
  let facility = |id: &str, name: &str, sports: &[&str]| FacilitySpec {
    id: id.to_string(),
    name: name.to_string(),
    sports: sports.iter().map(|s| s.to_string()).collect(),
  };

  let mut facilities = BTreeMap::new();
  facilities.insert(
    "turf_fields".to_string(),
    vec![
      facility("TF001", "North Field", &["Soccer", "Lacrosse"]),
      facility("TF002", "South Field", &["Lacrosse"]),
    ],
  );
  facilities.insert(
    "basketball_courts".to_string(),
    vec![facility("BC001", "Main Court", &["Basketball", "Volleyball"])],
  );
  facilities.insert(
    "specialty_areas".to_string(),
    vec![facility("SA001", "Track", &["Fitness"])],
  );

  let mut tiers = BTreeMap::new();
  tiers.insert(
    "Basic Member".to_string(),
    TierSpec {
      demand_multiplier: 0.7,
      rate_multiplier: 0.8,
      daytime: None,
    },
  );
  tiers.insert(
    "All-Access".to_string(),
    TierSpec {
      demand_multiplier: 1.2,
      rate_multiplier: 1.2,
      daytime: None,
    },
  );

  let mut rates = BTreeMap::new();
  rates.insert(
    "Turf Field".to_string(),
    BTreeMap::from([
      ("Lacrosse".to_string(), 120.0),
      ("Soccer".to_string(), 95.0),
      ("default".to_string(), 85.0),
    ]),
  );
  rates.insert(
    "Basketball Court".to_string(),
    BTreeMap::from([("Basketball".to_string(), 75.0), ("default".to_string(), 55.0)]),
  );

  let spec = CatalogSpec {
    facilities,
    tiers,
    rates,
    season_sensitive_sports: vec!["Lacrosse".to_string()],
    elite_training_sports: vec!["Elite Training".to_string()],
    wellness_sports: vec!["Fitness".to_string(), "Yoga".to_string()],
    entry_tier: Some("Basic Member".to_string()),
    operating_hours: OperatingHours { open: 6, close: 22 },
    global_default_rate: 50.0,
  };

  ReferenceCatalog::from_spec(spec).expect("Mock catalog should be valid")
}

/// ---------------------------------------------------------------------------
/// Record Factories
/// ---------------------------------------------------------------------------

/// A Monday 12:00 weekday record with the given usage.
/// Facility name is `"<id> Facility"`, revenue is half the usage.
pub fn mock_record(facility_id: &str, sport: &str, tier: &str, usage: u8) -> UsageRecord {
  UsageRecord {
    day: "Monday".to_string(),
    day_index: 0,
    hour: 12,
    facility_id: facility_id.to_string(),
    facility_name: format!("{} Facility", facility_id),
    facility_type: FacilityType::from_prefix(facility_id),
    sport: sport.to_string(),
    member_tier: tier.to_string(),
    usage_percentage: usage,
    revenue_estimate: usage as f64 * 0.5,
    is_prime_time: false,
    is_weekend: false,
    is_season_sensitive: sport == "Lacrosse",
    season: Season::Spring,
    time_category: TimeCategory::OffPeak,
    day_category: DayCategory::Weekday,
  }
}

/// One Basic Member record per day at 08:00, 12:00 and 19:00, all with the
/// same usage
pub fn mock_records_for_facility(facility_id: &str, sport: &str, usage: u8) -> Vec<UsageRecord> {
  let mut records = Vec::new();

  for (day_index, day) in WEEK.iter().enumerate() {
    let day_index = day_index as u8;
    for hour in [8u8, 12, 19] {
      let mut r = mock_record(facility_id, sport, "Basic Member", usage);
      r.day = day_name(*day).to_string();
      r.day_index = day_index;
      r.hour = hour;
      r.is_prime_time = is_prime_time(hour);
      r.is_weekend = is_weekend(day_index);
      r.time_category = TimeCategory::from_prime_time(r.is_prime_time);
      r.day_category = DayCategory::from_weekend(r.is_weekend);
      records.push(r);
    }
  }

  records
}

/// ---------------------------------------------------------------------------
/// Randomness and Config
/// ---------------------------------------------------------------------------

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
  ChaCha8Rng::seed_from_u64(seed)
}

/// Reproducible April session config
pub fn seeded_config(seed: u64) -> DashboardConfig {
  DashboardConfig {
    seed: Some(seed),
    month: Some(4),
    ..DashboardConfig::default()
  }
}

/// ---------------------------------------------------------------------------
/// Assertions
/// ---------------------------------------------------------------------------

/// Assert that two floating point values are approximately equal
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_catalog_is_consistent() {
    let catalog = mock_catalog();

    assert_eq!(catalog.facilities().len(), 4);
    assert_eq!(catalog.entry_tier(), "Basic Member");
    assert!(catalog.is_season_sensitive("Lacrosse"));
  }

  #[test]
  fn test_mock_records_cover_week() {
    let records = mock_records_for_facility("TF001", "Lacrosse", 60);

    assert_eq!(records.len(), 21);
    assert_eq!(records.iter().filter(|r| r.is_weekend).count(), 6);
    assert_eq!(records.iter().filter(|r| r.is_prime_time).count(), 14);
    assert!(records.iter().all(|r| r.is_season_sensitive));
  }
}
