use serde::{Deserialize, Serialize};

use crate::models::FacilityType;
use crate::seasonality::Season;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeCategory {
  #[serde(rename = "Prime Time")]
  PrimeTime,
  #[serde(rename = "Off-Peak")]
  OffPeak,
}

impl TimeCategory {
  pub fn from_prime_time(is_prime_time: bool) -> Self {
    if is_prime_time {
      TimeCategory::PrimeTime
    } else {
      TimeCategory::OffPeak
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      TimeCategory::PrimeTime => "Prime Time",
      TimeCategory::OffPeak => "Off-Peak",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCategory {
  Weekday,
  Weekend,
}

impl DayCategory {
  pub fn from_weekend(is_weekend: bool) -> Self {
    if is_weekend {
      DayCategory::Weekend
    } else {
      DayCategory::Weekday
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      DayCategory::Weekday => "Weekday",
      DayCategory::Weekend => "Weekend",
    }
  }
}

/// One projected slot: (day, hour, facility, tier, sport) with its usage and revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
  /// Day name, Monday..Sunday
  pub day: String,
  /// 0 = Monday .. 6 = Sunday
  pub day_index: u8,
  pub hour: u8,
  pub facility_id: String,
  pub facility_name: String,
  pub facility_type: FacilityType,
  pub sport: String,
  pub member_tier: String,
  /// Always within [5, 100]
  pub usage_percentage: u8,
  /// Dollars, rounded to cents, never negative
  pub revenue_estimate: f64,
  pub is_prime_time: bool,
  pub is_weekend: bool,
  pub is_season_sensitive: bool,
  pub season: Season,
  pub time_category: TimeCategory,
  pub day_category: DayCategory,
}

impl UsageRecord {
  pub fn usage(&self) -> f64 {
    self.usage_percentage as f64
  }
}
