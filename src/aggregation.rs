//! Multi-dimensional aggregation over a projected record set
//!
//! Every function here is a pure derivation. Empty input yields empty
//! buckets and `None` means, never NaN.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::ReferenceCatalog;
use crate::models::UsageRecord;
use crate::projection::{day_name, WEEK};

/// ---------------------------------------------------------------------------
/// Grouping Primitives
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
  Sport,
  /// Facility display name
  Facility,
  FacilityType,
  Hour,
  /// Day name, always Monday..Sunday
  Day,
  Tier,
  TimeCategory,
  DayCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
  Usage,
  Revenue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggFn {
  Mean,
  Sum,
  Count,
  /// Groups ranked by mean, highest first, truncated to N
  TopN(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
  pub label: String,
  pub value: f64,
  /// Number of records in the group
  pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
  pub group_by: GroupBy,
  pub measure: Measure,
  pub agg_fn: AggFn,
  pub entries: Vec<BucketEntry>,
}

impl AggregateBucket {
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, label: &str) -> Option<f64> {
    self.entries.iter().find(|e| e.label == label).map(|e| e.value)
  }

  pub fn labels(&self) -> Vec<&str> {
    self.entries.iter().map(|e| e.label.as_str()).collect()
  }

  /// Highest-valued entry, first one on ties
  pub fn max_entry(&self) -> Option<&BucketEntry> {
    self.entries.iter().fold(None, |best: Option<&BucketEntry>, e| match best {
      Some(b) if b.value >= e.value => Some(b),
      _ => Some(e),
    })
  }

  pub fn to_map(&self) -> BTreeMap<String, f64> {
    self.entries.iter().map(|e| (e.label.clone(), e.value)).collect()
  }
}

/// Sort key plus display label. Numeric dimensions sort by their ordinal,
/// everything else alphabetically.
fn group_key(record: &UsageRecord, group_by: GroupBy) -> (u32, String) {
  match group_by {
    GroupBy::Sport => (0, record.sport.clone()),
    GroupBy::Facility => (0, record.facility_name.clone()),
    GroupBy::FacilityType => (0, record.facility_type.as_str().to_string()),
    GroupBy::Hour => (record.hour as u32, record.hour.to_string()),
    GroupBy::Day => (record.day_index as u32, record.day.clone()),
    GroupBy::Tier => (0, record.member_tier.clone()),
    GroupBy::TimeCategory => (0, record.time_category.as_str().to_string()),
    GroupBy::DayCategory => (0, record.day_category.as_str().to_string()),
  }
}

fn measure_of(record: &UsageRecord, measure: Measure) -> f64 {
  match measure {
    Measure::Usage => record.usage(),
    Measure::Revenue => record.revenue_estimate,
  }
}

/// Group `records` and reduce each group with `agg_fn`
pub fn aggregate(records: &[UsageRecord], group_by: GroupBy, measure: Measure, agg_fn: AggFn) -> AggregateBucket {
  let mut groups: BTreeMap<(u32, String), (f64, usize)> = BTreeMap::new();
  for r in records {
    let slot = groups.entry(group_key(r, group_by)).or_insert((0.0, 0));
    slot.0 += measure_of(r, measure);
    slot.1 += 1;
  }

  let mut entries: Vec<BucketEntry> = groups
    .into_iter()
    .map(|((_, label), (sum, count))| {
      let value = match agg_fn {
        AggFn::Sum => sum,
        AggFn::Count => count as f64,
        AggFn::Mean | AggFn::TopN(_) => sum / count as f64,
      };
      BucketEntry {
        label,
        value,
        records: count,
      }
    })
    .collect();

  if let AggFn::TopN(n) = agg_fn {
    // Stable sort keeps canonical order among equal values
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(n);
  }

  AggregateBucket {
    group_by,
    measure,
    agg_fn,
    entries,
  }
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
  let (sum, count) = values
    .into_iter()
    .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
  if count == 0 {
    None
  } else {
    Some(sum / count as f64)
  }
}

/// Mean usage over the records matching `predicate`
pub fn mean_where<F>(records: &[UsageRecord], predicate: F) -> Option<f64>
where
  F: Fn(&UsageRecord) -> bool,
{
  mean(records.iter().filter(|r| predicate(r)).map(|r| r.usage()))
}

pub fn revenue_where<F>(records: &[UsageRecord], predicate: F) -> f64
where
  F: Fn(&UsageRecord) -> bool,
{
  records.iter().filter(|r| predicate(r)).map(|r| r.revenue_estimate).sum()
}

/// ---------------------------------------------------------------------------
/// Dashboard Aggregates
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSportStats {
  pub sport: String,
  pub mean_usage: Option<f64>,
  pub sessions: usize,
}

/// Everything the insight rules read, computed in one pass over the records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAggregates {
  pub total_sessions: usize,
  pub overall_mean: Option<f64>,
  pub prime_time_mean: Option<f64>,
  pub weekend_mean: Option<f64>,
  pub weekday_mean: Option<f64>,
  /// Weekend mean minus weekday mean
  pub weekend_boost: Option<f64>,
  pub total_revenue: f64,
  pub entry_tier: String,
  pub entry_tier_mean: Option<f64>,
  pub season_sports: Vec<SeasonSportStats>,
  pub facility_means: AggregateBucket,
  pub hourly_means: AggregateBucket,
}

impl DashboardAggregates {
  pub fn compute(records: &[UsageRecord], catalog: &ReferenceCatalog) -> Self {
    let entry_tier = catalog.entry_tier().to_string();
    let weekend_mean = mean_where(records, |r| r.is_weekend);
    let weekday_mean = mean_where(records, |r| !r.is_weekend);

    let weekend_boost = match (weekend_mean, weekday_mean) {
      (Some(we), Some(wd)) => Some(we - wd),
      _ => None,
    };

    let season_sports = catalog
      .season_sensitive_sports()
      .iter()
      .map(|sport| SeasonSportStats {
        sport: sport.clone(),
        mean_usage: mean_where(records, |r| &r.sport == sport),
        sessions: records.iter().filter(|r| &r.sport == sport).count(),
      })
      .collect();

    Self {
      total_sessions: records.len(),
      overall_mean: mean_where(records, |_| true),
      prime_time_mean: mean_where(records, |r| r.is_prime_time),
      weekend_mean,
      weekday_mean,
      weekend_boost,
      total_revenue: revenue_where(records, |_| true),
      entry_tier_mean: mean_where(records, |r| r.member_tier == entry_tier),
      entry_tier,
      season_sports,
      facility_means: aggregate(records, GroupBy::Facility, Measure::Usage, AggFn::Mean),
      hourly_means: aggregate(records, GroupBy::Hour, Measure::Usage, AggFn::Mean),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.total_sessions == 0
  }

  pub fn hour_mean(&self, hour: u8) -> Option<f64> {
    self.hourly_means.get(&hour.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Heatmap
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "sport", rename_all = "snake_case")]
pub enum HeatmapMode {
  /// Mean usage
  Overview,
  /// Mean usage for one sport
  Sport(String),
  /// Summed revenue
  Revenue,
  /// Mean usage over prime-time slots
  PrimeTime,
}

/// Hour x day matrix. `values[row][col]` is hour `hours[row]` on `days[col]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
  pub mode: HeatmapMode,
  pub days: Vec<String>,
  pub hours: Vec<u8>,
  pub values: Vec<Vec<f64>>,
}

impl HeatmapGrid {
  pub fn value(&self, hour: u8, day_index: usize) -> Option<f64> {
    let row = self.hours.iter().position(|h| *h == hour)?;
    self.values.get(row)?.get(day_index).copied()
  }

  pub fn is_empty(&self) -> bool {
    self.hours.is_empty()
  }
}

/// Pivot records into an hour x day grid. Columns are always Monday..Sunday;
/// cells with no records are 0.
pub fn heatmap_grid(records: &[UsageRecord], mode: HeatmapMode) -> HeatmapGrid {
  let selected: Vec<&UsageRecord> = records
    .iter()
    .filter(|r| match &mode {
      HeatmapMode::Sport(sport) => &r.sport == sport,
      HeatmapMode::PrimeTime => r.is_prime_time,
      HeatmapMode::Overview | HeatmapMode::Revenue => true,
    })
    .collect();

  let mut cells: BTreeMap<(u8, u8), (f64, usize)> = BTreeMap::new();
  for r in &selected {
    let value = match mode {
      HeatmapMode::Revenue => r.revenue_estimate,
      _ => r.usage(),
    };
    let cell = cells.entry((r.hour, r.day_index)).or_insert((0.0, 0));
    cell.0 += value;
    cell.1 += 1;
  }

  let mut hours: Vec<u8> = cells.keys().map(|(h, _)| *h).collect();
  hours.dedup();

  let values = hours
    .iter()
    .map(|hour| {
      (0..WEEK.len() as u8)
        .map(|day| match cells.get(&(*hour, day)) {
          Some((sum, _)) if mode == HeatmapMode::Revenue => *sum,
          Some((sum, count)) => sum / *count as f64,
          None => 0.0,
        })
        .collect()
    })
    .collect();

  HeatmapGrid {
    mode,
    days: WEEK.iter().map(|d| day_name(*d).to_string()).collect(),
    hours,
    values,
  }
}
