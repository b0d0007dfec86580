//! Demand projection: per-slot usage and revenue estimates
//!
//! Every (day, hour, facility, tier, sport) combination gets a usage figure
//! built from a fixed baseline, time-of-week boosts, at most one sport rule,
//! the tier multiplier and a bounded random perturbation. The random source
//! is always supplied by the caller.

use chrono::Weekday;
use rand::Rng;
use std::ops::RangeInclusive;

use crate::catalog::ReferenceCatalog;
use crate::models::{DayCategory, FacilityProfile, MembershipTier, TimeCategory, UsageRecord};
use crate::seasonality::{Season, SeasonalityResolver};

pub const BASE_USAGE: f64 = 25.0;
pub const PRIME_TIME_BOOST: f64 = 45.0;
pub const WEEKEND_BOOST: f64 = 25.0;
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 15.0;
pub const USAGE_FLOOR: f64 = 5.0;
pub const USAGE_CEILING: f64 = 100.0;

/// Morning and evening peaks
pub const PRIME_TIME_WINDOWS: [RangeInclusive<u8>; 2] = [7..=10, 18..=21];

/// Canonical week order, index 0 = Monday
pub const WEEK: [Weekday; 7] = [
  Weekday::Mon,
  Weekday::Tue,
  Weekday::Wed,
  Weekday::Thu,
  Weekday::Fri,
  Weekday::Sat,
  Weekday::Sun,
];

pub fn day_name(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

pub fn is_prime_time(hour: u8) -> bool {
  PRIME_TIME_WINDOWS.iter().any(|w| w.contains(&hour))
}

pub fn is_weekend(day_index: u8) -> bool {
  day_index >= 5
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

/// ---------------------------------------------------------------------------
/// Sport Rules
/// ---------------------------------------------------------------------------

/// Sport-specific demand adjustment keyed on what a facility offers.
/// Evaluated in `SPORT_RULES` order and only the first match applies, so a
/// facility's rule is the same for every sport booked on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportRule {
  /// Evening league play, 18:00-21:00
  Basketball,
  /// Soccer and football after school, 16:00-20:00
  FieldSports,
  /// Seasonal multiplier plus a 17:00-19:00 practice peak
  SeasonSensitive,
  /// Elite training during prime time
  EliteTraining,
}

pub const SPORT_RULES: [SportRule; 4] = [
  SportRule::Basketball,
  SportRule::FieldSports,
  SportRule::SeasonSensitive,
  SportRule::EliteTraining,
];

impl SportRule {
  pub fn matches(&self, facility: &FacilityProfile, catalog: &ReferenceCatalog) -> bool {
    match self {
      SportRule::Basketball => facility.offers("Basketball"),
      SportRule::FieldSports => facility.offers("Soccer") || facility.offers("Football"),
      SportRule::SeasonSensitive => facility.sports.iter().any(|s| catalog.is_season_sensitive(s)),
      SportRule::EliteTraining => facility.sports.iter().any(|s| catalog.is_elite_training(s)),
    }
  }

  pub fn multiplier(&self, hour: u8, season_multiplier: f64) -> f64 {
    match self {
      SportRule::Basketball if (18..=21).contains(&hour) => 1.4,
      SportRule::FieldSports if (16..=20).contains(&hour) => 1.3,
      SportRule::SeasonSensitive if (17..=19).contains(&hour) => season_multiplier * 1.2,
      SportRule::SeasonSensitive => season_multiplier,
      SportRule::EliteTraining if is_prime_time(hour) => 1.6,
      _ => 1.0,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Projector
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DemandProjector<'a> {
  catalog: &'a ReferenceCatalog,
  season: Season,
  season_multiplier: f64,
  noise_amplitude: f64,
}

impl<'a> DemandProjector<'a> {
  /// Projector for a calendar month (1-12) using the standard season table
  pub fn new(catalog: &'a ReferenceCatalog, month: u32) -> Self {
    Self::with_resolver(catalog, &SeasonalityResolver::standard(), month)
  }

  pub fn with_resolver(catalog: &'a ReferenceCatalog, resolver: &SeasonalityResolver, month: u32) -> Self {
    let (season, season_multiplier) = resolver.season_for(month);
    Self {
      catalog,
      season,
      season_multiplier,
      noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
    }
  }

  /// Override the perturbation amplitude. Zero disables the random term.
  pub fn with_noise(mut self, amplitude: f64) -> Self {
    self.noise_amplitude = if amplitude.is_finite() { amplitude.abs() } else { 0.0 };
    self
  }

  pub fn season(&self) -> Season {
    self.season
  }

  pub fn season_multiplier(&self) -> f64 {
    self.season_multiplier
  }

  /// First sport rule that claims the facility, if any
  pub fn rule_for(&self, facility: &FacilityProfile) -> Option<SportRule> {
    SPORT_RULES.into_iter().find(|r| r.matches(facility, self.catalog))
  }

  /// Usage before the random term, rounding and clamping
  pub fn baseline_usage(
    &self,
    day_index: u8,
    hour: u8,
    facility: &FacilityProfile,
    tier: &MembershipTier,
  ) -> f64 {
    let mut usage = BASE_USAGE;

    if is_prime_time(hour) {
      usage += PRIME_TIME_BOOST;
    }
    if is_weekend(day_index) {
      usage += WEEKEND_BOOST;
    }

    if let Some(rule) = self.rule_for(facility) {
      usage *= rule.multiplier(hour, self.season_multiplier);
    }

    usage * tier.demand_multiplier_at(hour)
  }

  /// Generate the full record set. Output depends only on the catalog, the
  /// season and the state of `rng`.
  pub fn project<R: Rng>(&self, rng: &mut R) -> Vec<UsageRecord> {
    let hours = self.catalog.operating_hours().hours();
    let mut records = Vec::new();

    for (day_index, day) in WEEK.iter().enumerate() {
      let day_index = day_index as u8;
      for hour in hours.clone() {
        for facility in self.catalog.facilities() {
          for tier in self.catalog.tiers() {
            let baseline = self.baseline_usage(day_index, hour, facility, tier);
            for sport in &facility.sports {
              let noise = if self.noise_amplitude > 0.0 {
                rng.gen_range(-self.noise_amplitude..=self.noise_amplitude)
              } else {
                0.0
              };
              let usage = (baseline + noise).round().clamp(USAGE_FLOOR, USAGE_CEILING) as u8;
              records.push(self.record(*day, day_index, hour, facility, tier, sport, usage));
            }
          }
        }
      }
    }

    log::debug!(
      "records={} season={} season_multiplier={}",
      records.len(),
      self.season,
      self.season_multiplier
    );
    records
  }

  #[allow(clippy::too_many_arguments)]
  fn record(
    &self,
    day: Weekday,
    day_index: u8,
    hour: u8,
    facility: &FacilityProfile,
    tier: &MembershipTier,
    sport: &str,
    usage: u8,
  ) -> UsageRecord {
    let base_rate = self.catalog.base_rate(facility.facility_type, sport, &tier.name);
    let revenue = round_to((usage as f64 * base_rate / 100.0).max(0.0), 2);
    let prime = is_prime_time(hour);
    let weekend = is_weekend(day_index);

    UsageRecord {
      day: day_name(day).to_string(),
      day_index,
      hour,
      facility_id: facility.id.clone(),
      facility_name: facility.name.clone(),
      facility_type: facility.facility_type,
      sport: sport.to_string(),
      member_tier: tier.name.clone(),
      usage_percentage: usage,
      revenue_estimate: revenue,
      is_prime_time: prime,
      is_weekend: weekend,
      is_season_sensitive: self.catalog.is_season_sensitive(sport),
      season: self.season,
      time_category: TimeCategory::from_prime_time(prime),
      day_category: DayCategory::from_weekend(weekend),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::models::FacilityType;
  use crate::test_utils::{mock_catalog, seeded_rng};

  fn basic_member(catalog: &ReferenceCatalog) -> &MembershipTier {
    catalog.tier("Basic Member").expect("built-in tier")
  }

  fn facility<'c>(catalog: &'c ReferenceCatalog, id: &str) -> &'c FacilityProfile {
    catalog.facility(id).expect("facility exists")
  }

  fn find_slot<'r>(records: &'r [UsageRecord], day_index: u8, hour: u8, id: &str, sport: &str) -> &'r UsageRecord {
    records
      .iter()
      .find(|r| {
        r.day_index == day_index
          && r.hour == hour
          && r.facility_id == id
          && r.member_tier == "Basic Member"
          && r.sport == sport
      })
      .expect("slot exists")
  }

  #[test]
  fn test_records_respect_bounds() {
    // Arrange
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let mut rng = seeded_rng(7);

    // Act
    let records = projector.project(&mut rng);

    // Assert
    assert!(!records.is_empty());
    for r in &records {
      assert!(
        (5..=100).contains(&r.usage_percentage),
        "usage {} out of range for {} {}",
        r.usage_percentage,
        r.facility_id,
        r.hour
      );
      assert!(r.revenue_estimate >= 0.0, "negative revenue {}", r.revenue_estimate);
    }
  }

  #[test]
  fn test_record_count_covers_every_combination() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);

    let records = projector.project(&mut seeded_rng(1));

    let sports_per_tier: usize = catalog.facilities().iter().map(|f| f.sports.len()).sum();
    let hours = catalog.operating_hours().hours().count();
    assert_eq!(records.len(), 7 * hours * catalog.tiers().len() * sports_per_tier);
  }

  #[test]
  fn test_projection_is_reproducible_with_same_seed() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 10);

    let first = projector.project(&mut seeded_rng(42));
    let second = projector.project(&mut seeded_rng(42));
    let other = projector.project(&mut seeded_rng(43));

    assert_eq!(first, second);
    assert_ne!(first, other);
  }

  #[test]
  fn test_wednesday_evening_on_basketball_court() {
    // Arrange
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let tier = basic_member(&catalog);
    let court = facility(&catalog, "BC001");

    // Act: (25 + 45) * 1.4 * 0.7
    let baseline = projector.baseline_usage(2, 19, court, tier);

    // Assert
    assert_approx_eq!(baseline, 68.6, 1e-9);
    assert!(is_prime_time(19));
    assert!(!is_weekend(2));

    // Without noise the record is the rounded baseline
    let records = projector.with_noise(0.0).project(&mut seeded_rng(0));
    let slot = find_slot(&records, 2, 19, "BC001", "Basketball");
    assert_eq!(slot.day, "Wednesday");
    assert_eq!(slot.usage_percentage, 69);
    assert!(slot.is_prime_time);
    assert!(!slot.is_weekend);
    assert_eq!(slot.time_category, TimeCategory::PrimeTime);
    assert_eq!(slot.day_category, DayCategory::Weekday);
    // 69 * (75 * 0.8) / 100
    assert_approx_eq!(slot.revenue_estimate, 41.4, 1e-9);
  }

  #[test]
  fn test_rule_follows_facility_not_booked_sport() {
    // Arrange
    let catalog = ReferenceCatalog::nxs_default();
    let records = DemandProjector::new(&catalog, 4)
      .with_noise(0.0)
      .project(&mut seeded_rng(0));

    // Act
    let volleyball = find_slot(&records, 2, 19, "BC001", "Volleyball");
    let lacrosse = find_slot(&records, 2, 17, "TF001", "Lacrosse");
    let field_hockey = find_slot(&records, 2, 17, "TF001", "Field Hockey");

    // Assert: volleyball on a basketball court gets the evening boost
    assert_eq!(volleyball.usage_percentage, 69);
    // Turf A offers soccer, so every sport there gets 25 * 1.3 * 0.7
    assert_eq!(lacrosse.usage_percentage, 23);
    assert_eq!(field_hockey.usage_percentage, 23);
    // Sport still drives the rate: 23 * (120 * 0.8) / 100
    assert_approx_eq!(lacrosse.revenue_estimate, 22.08, 1e-9);
  }

  #[test]
  fn test_season_rule_on_lacrosse_only_field() {
    // Arrange: South Field lists Lacrosse and nothing else
    let catalog = mock_catalog();
    let projector = DemandProjector::new(&catalog, 4);
    let tier = catalog.tier("All-Access").expect("mock tier");
    let field = facility(&catalog, "TF002");

    // Act
    let rule = projector.rule_for(field);

    // Assert
    assert_eq!(projector.season(), Season::Spring);
    assert_eq!(rule, Some(SportRule::SeasonSensitive));
    // Off-peak weekday: 25 * 1.5 * 1.2 (tier)
    assert_approx_eq!(projector.baseline_usage(0, 13, field, tier), 45.0, 1e-9);
    // Practice window: 25 * 1.5 * 1.2 (rule) * 1.2 (tier)
    assert_approx_eq!(projector.baseline_usage(0, 17, field, tier), 54.0, 1e-9);

    // North Field also offers Soccer, which outranks the season rule
    assert_eq!(
      projector.rule_for(facility(&catalog, "TF001")),
      Some(SportRule::FieldSports)
    );
  }

  #[test]
  fn test_field_sports_window() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let tier = basic_member(&catalog);
    let field = facility(&catalog, "TF003");

    assert_eq!(projector.rule_for(field), Some(SportRule::FieldSports));

    // Inside 16-20
    assert_approx_eq!(projector.baseline_usage(0, 16, field, tier), 25.0 * 1.3 * 0.7, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 19, field, tier), 70.0 * 1.3 * 0.7, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 20, field, tier), 70.0 * 1.3 * 0.7, 1e-9);
    // Outside: prime time at 21 is unboosted, midday is plain
    assert_approx_eq!(projector.baseline_usage(0, 21, field, tier), 49.0, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 15, field, tier), 17.5, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 12, field, tier), 17.5, 1e-9);
  }

  #[test]
  fn test_elite_training_prime_time_only() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let tier = basic_member(&catalog);
    let lab = facility(&catalog, "DZ003");

    assert_eq!(projector.rule_for(lab), Some(SportRule::EliteTraining));

    // Both prime-time windows: 70 * 1.6 * 0.7
    assert_approx_eq!(projector.baseline_usage(0, 8, lab, tier), 78.4, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 20, lab, tier), 78.4, 1e-9);
    // Off-peak is untouched
    assert_approx_eq!(projector.baseline_usage(0, 12, lab, tier), 17.5, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 17, lab, tier), 17.5, 1e-9);
  }

  #[test]
  fn test_rule_priority_order() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let tier = basic_member(&catalog);

    // Arrange: a court that also hosts lacrosse
    let hybrid = FacilityProfile {
      id: "BC010".to_string(),
      name: "Hybrid Court".to_string(),
      facility_type: FacilityType::BasketballCourt,
      sports: vec!["Lacrosse".to_string(), "Basketball".to_string()],
    };

    // Basketball outranks the season rule regardless of list order
    assert_eq!(projector.rule_for(&hybrid), Some(SportRule::Basketball));
    // 17:00 is outside the basketball window and no seasonal factor applies
    assert_approx_eq!(projector.baseline_usage(0, 17, &hybrid, tier), 17.5, 1e-9);

    assert_eq!(projector.rule_for(facility(&catalog, "BC004")), Some(SportRule::Basketball));
    assert_eq!(projector.rule_for(facility(&catalog, "TF004")), Some(SportRule::FieldSports));
    assert_eq!(SPORT_RULES[0], SportRule::Basketball);
    assert_eq!(SPORT_RULES[3], SportRule::EliteTraining);
  }

  #[test]
  fn test_uncovered_facility_gets_only_time_boosts() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let tier = basic_member(&catalog);
    let arena = facility(&catalog, "SA003");

    assert_eq!(projector.rule_for(arena), None);
    assert_eq!(projector.rule_for(facility(&catalog, "DZ001")), None);

    // Saturday prime time: (25 + 45 + 25) * 0.7
    assert_approx_eq!(projector.baseline_usage(5, 8, arena, tier), 66.5, 1e-9);
  }

  #[test]
  fn test_family_plan_daytime_multiplier() {
    let catalog = ReferenceCatalog::nxs_default();
    let projector = DemandProjector::new(&catalog, 4);
    let family = catalog.tier("Family Plan").expect("built-in tier");
    let wellness = facility(&catalog, "SA002");

    assert_approx_eq!(projector.baseline_usage(0, 12, wellness, family), 25.0 * 0.9, 1e-9);
    assert_approx_eq!(projector.baseline_usage(0, 16, wellness, family), 25.0 * 1.1, 1e-9);
  }

  #[test]
  fn test_season_is_consistent_across_run() {
    let catalog = ReferenceCatalog::nxs_default();
    let records = DemandProjector::new(&catalog, 1).project(&mut seeded_rng(5));

    assert!(records.iter().all(|r| r.season == Season::Winter));
    assert!(records
      .iter()
      .all(|r| r.is_season_sensitive == (r.sport == "Lacrosse")));
  }

  #[test]
  fn test_round_to() {
    assert_eq!(round_to(41.456, 2), 41.46);
    assert_eq!(round_to(72.25, 1), 72.3);
    assert_eq!(round_to(3.0, 0), 3.0);
  }
}
