//! Per-facility-type and per-sport breakdowns, plus the efficiency ranking
//!
//! These feed the export payload and the dashboard's drill-down views.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregation::{aggregate, mean_where, revenue_where, AggFn, BucketEntry, GroupBy, Measure};
use crate::catalog::ReferenceCatalog;
use crate::models::{FacilityType, UsageRecord};
use crate::projection::round_to;
use crate::seasonality::Season;

/// Hourly mean below which a season-sport hour counts as underutilized
pub const UNDERUTILIZED_HOUR_USAGE: f64 = 40.0;
/// Entry-tier mean below which introductory programs are suggested
pub const ENTRY_TIER_TARGET_USAGE: f64 = 30.0;

/// ---------------------------------------------------------------------------
/// Facility Type Breakdown
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityTypeBreakdown {
  pub facility_type: FacilityType,
  pub total_usage: Option<f64>,
  pub sport_breakdown: BTreeMap<String, f64>,
  pub facility_usage: BTreeMap<String, f64>,
  /// Hour -> mean usage, in hour order
  pub peak_times: Vec<BucketEntry>,
  pub prime_time_usage: Option<f64>,
  /// Weekend mean minus weekday mean
  pub weekend_boost: Option<f64>,
  pub revenue_potential: BTreeMap<String, f64>,
  /// Mean usage of elite-training sports booked on this type
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub elite_training_usage: Option<f64>,
  /// Mean usage across the wellness sports booked on this type
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub wellness_trends: Option<f64>,
  /// Season-sensitive sports booked on this type
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub season_sport_focus: BTreeMap<String, SeasonSportFocus>,
}

/// Usage profile of one season-sensitive sport within a facility type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSportFocus {
  pub average_usage: f64,
  /// Three busiest hours, busiest first
  pub peak_hours: Vec<BucketEntry>,
  pub seasonal_impact: Season,
}

impl SeasonSportFocus {
  fn compute(subset: &[UsageRecord], sport: &str) -> Option<Self> {
    let records: Vec<UsageRecord> = subset.iter().filter(|r| r.sport == sport).cloned().collect();
    let first = records.first()?;
    Some(Self {
      average_usage: mean_where(&records, |_| true)?,
      peak_hours: aggregate(&records, GroupBy::Hour, Measure::Usage, AggFn::TopN(3)).entries,
      seasonal_impact: first.season,
    })
  }
}

impl FacilityTypeBreakdown {
  pub fn compute(records: &[UsageRecord], facility_type: FacilityType, catalog: &ReferenceCatalog) -> Self {
    let subset: Vec<UsageRecord> = records
      .iter()
      .filter(|r| r.facility_type == facility_type)
      .cloned()
      .collect();

    let weekend_boost = match (
      mean_where(&subset, |r| r.is_weekend),
      mean_where(&subset, |r| !r.is_weekend),
    ) {
      (Some(we), Some(wd)) => Some(we - wd),
      _ => None,
    };

    Self {
      facility_type,
      total_usage: mean_where(&subset, |_| true),
      sport_breakdown: aggregate(&subset, GroupBy::Sport, Measure::Usage, AggFn::Mean).to_map(),
      facility_usage: aggregate(&subset, GroupBy::Facility, Measure::Usage, AggFn::Mean).to_map(),
      peak_times: aggregate(&subset, GroupBy::Hour, Measure::Usage, AggFn::Mean).entries,
      prime_time_usage: mean_where(&subset, |r| r.is_prime_time),
      weekend_boost,
      revenue_potential: aggregate(&subset, GroupBy::Facility, Measure::Revenue, AggFn::Sum).to_map(),
      elite_training_usage: mean_where(&subset, |r| catalog.is_elite_training(&r.sport)),
      wellness_trends: mean_where(&subset, |r| catalog.is_wellness(&r.sport)),
      season_sport_focus: catalog
        .season_sensitive_sports()
        .iter()
        .filter_map(|sport| SeasonSportFocus::compute(&subset, sport).map(|f| (sport.clone(), f)))
        .collect(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Seasonal Sport Analysis
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportRevenue {
  pub total_revenue: f64,
  pub average_per_session: f64,
  pub by_facility: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalSportAnalysis {
  pub sport: String,
  pub average_usage: f64,
  pub season: Season,
  pub facility_preferences: BTreeMap<String, f64>,
  pub peak_days: Vec<BucketEntry>,
  pub peak_hours: Vec<BucketEntry>,
  pub tier_usage: BTreeMap<String, f64>,
  pub revenue: SportRevenue,
  pub growth_opportunities: Vec<String>,
}

impl SeasonalSportAnalysis {
  /// None when the sport has no records
  pub fn compute(records: &[UsageRecord], sport: &str, entry_tier: &str) -> Option<Self> {
    let subset: Vec<UsageRecord> = records.iter().filter(|r| r.sport == sport).cloned().collect();
    let first = subset.first()?;
    let average_usage = mean_where(&subset, |_| true)?;
    let total_revenue = revenue_where(&subset, |_| true);

    Some(Self {
      sport: sport.to_string(),
      average_usage,
      season: first.season,
      facility_preferences: aggregate(&subset, GroupBy::Facility, Measure::Usage, AggFn::Mean).to_map(),
      peak_days: aggregate(&subset, GroupBy::Day, Measure::Usage, AggFn::TopN(3)).entries,
      peak_hours: aggregate(&subset, GroupBy::Hour, Measure::Usage, AggFn::TopN(3)).entries,
      tier_usage: aggregate(&subset, GroupBy::Tier, Measure::Usage, AggFn::Mean).to_map(),
      revenue: SportRevenue {
        total_revenue,
        average_per_session: total_revenue / subset.len() as f64,
        by_facility: aggregate(&subset, GroupBy::Facility, Measure::Revenue, AggFn::Sum).to_map(),
      },
      growth_opportunities: growth_opportunities(&subset, sport, entry_tier),
    })
  }
}

/// Programming ideas for a season-sensitive sport, from its own records only
pub fn growth_opportunities(records: &[UsageRecord], sport: &str, entry_tier: &str) -> Vec<String> {
  let mut opportunities = Vec::new();
  let sport_lc = sport.to_lowercase();

  let quiet_hours = aggregate(records, GroupBy::Hour, Measure::Usage, AggFn::Mean)
    .entries
    .iter()
    .filter(|e| e.value < UNDERUTILIZED_HOUR_USAGE)
    .count();
  if quiet_hours > 0 {
    opportunities.push(format!(
      "Expand {} programs during {} underutilized hours",
      sport_lc, quiet_hours
    ));
  }

  // A tier with no records at all counts as zero engagement
  let entry_usage = mean_where(records, |r| r.member_tier == entry_tier).unwrap_or(0.0);
  if entry_usage < ENTRY_TIER_TARGET_USAGE {
    opportunities.push(format!(
      "Target {}s with introductory {} programs",
      entry_tier, sport_lc
    ));
  }

  if let (Some(weekend), Some(weekday)) = (
    mean_where(records, |r| r.is_weekend),
    mean_where(records, |r| !r.is_weekend),
  ) {
    if weekend < weekday {
      opportunities.push(format!("Develop weekend {} leagues and tournaments", sport_lc));
    }
  }

  opportunities
}

/// ---------------------------------------------------------------------------
/// Combined Breakdown
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityBreakdown {
  /// Keyed by facility group ("turf_fields", "basketball_courts", ...)
  #[serde(flatten)]
  pub by_type: BTreeMap<String, FacilityTypeBreakdown>,
  pub season_sports: BTreeMap<String, SeasonalSportAnalysis>,
}

impl FacilityBreakdown {
  pub fn compute(records: &[UsageRecord], catalog: &ReferenceCatalog) -> Self {
    let present: BTreeSet<FacilityType> = records.iter().map(|r| r.facility_type).collect();

    let by_type = present
      .into_iter()
      .map(|t| (t.group_key().to_string(), FacilityTypeBreakdown::compute(records, t, catalog)))
      .collect();

    let season_sports = catalog
      .season_sensitive_sports()
      .iter()
      .filter_map(|sport| {
        SeasonalSportAnalysis::compute(records, sport, catalog.entry_tier()).map(|a| (sport.clone(), a))
      })
      .collect();

    Self { by_type, season_sports }
  }

  pub fn facility_type(&self, facility_type: FacilityType) -> Option<&FacilityTypeBreakdown> {
    self.by_type.get(facility_type.group_key())
  }
}

/// ---------------------------------------------------------------------------
/// Efficiency Ranking
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityEfficiency {
  pub facility_name: String,
  pub average_usage: f64,
  pub total_revenue: f64,
  /// Number of distinct tiers booking the facility
  pub tier_diversity: usize,
  pub score: f64,
}

/// Rank facilities by a blend of usage (40%), revenue share of the best
/// facility (40%) and tier diversity share of the most diverse (20%).
pub fn facility_efficiency(records: &[UsageRecord]) -> Vec<FacilityEfficiency> {
  let mut stats: BTreeMap<&str, (f64, usize, f64, BTreeSet<&str>)> = BTreeMap::new();
  for r in records {
    let entry = stats
      .entry(r.facility_name.as_str())
      .or_insert((0.0, 0, 0.0, BTreeSet::new()));
    entry.0 += r.usage();
    entry.1 += 1;
    entry.2 += r.revenue_estimate;
    entry.3.insert(r.member_tier.as_str());
  }

  let max_revenue = stats.values().map(|s| s.2).fold(0.0, f64::max);
  let max_diversity = stats.values().map(|s| s.3.len()).max().unwrap_or(0);

  let mut ranking: Vec<FacilityEfficiency> = stats
    .into_iter()
    .map(|(name, (usage_sum, count, revenue, tiers))| {
      let average_usage = usage_sum / count as f64;
      let revenue_share = if max_revenue > 0.0 { revenue / max_revenue * 100.0 } else { 0.0 };
      let diversity_share = if max_diversity > 0 {
        tiers.len() as f64 / max_diversity as f64 * 100.0
      } else {
        0.0
      };

      FacilityEfficiency {
        facility_name: name.to_string(),
        average_usage,
        total_revenue: revenue,
        tier_diversity: tiers.len(),
        score: round_to(average_usage * 0.4 + revenue_share * 0.4 + diversity_share * 0.2, 1),
      }
    })
    .collect();

  ranking.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
  ranking
}
