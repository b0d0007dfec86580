//! Calendar month -> season mapping for season-sensitive sports
//!
//! Only sports listed as season-sensitive in the catalog pick up the
//! multiplier; everything else ignores it.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
  Spring,
  Summer,
  Fall,
  Winter,
}

impl Season {
  pub fn as_str(&self) -> &'static str {
    match self {
      Season::Spring => "Spring",
      Season::Summer => "Summer",
      Season::Fall => "Fall",
      Season::Winter => "Winter",
    }
  }
}

impl std::fmt::Display for Season {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfile {
  pub season: Season,
  pub months: [u32; 3],
  pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityResolver {
  profiles: Vec<SeasonProfile>,
  fallback: Season,
}

impl Default for SeasonalityResolver {
  fn default() -> Self {
    Self::standard()
  }
}

impl SeasonalityResolver {
  /// Lacrosse-style calendar: spring peak, strong fall, light summer, winter lull
  pub fn standard() -> Self {
    Self {
      profiles: vec![
        SeasonProfile { season: Season::Spring, months: [3, 4, 5], multiplier: 1.5 },
        SeasonProfile { season: Season::Fall, months: [9, 10, 11], multiplier: 1.3 },
        SeasonProfile { season: Season::Summer, months: [6, 7, 8], multiplier: 0.8 },
        SeasonProfile { season: Season::Winter, months: [12, 1, 2], multiplier: 0.4 },
      ],
      fallback: Season::Spring,
    }
  }

  /// Season and multiplier for a month (1-12). Months outside the table
  /// resolve to the fallback season.
  pub fn season_for(&self, month: u32) -> (Season, f64) {
    let season = self
      .profiles
      .iter()
      .find(|p| p.months.contains(&month))
      .map(|p| p.season)
      .unwrap_or(self.fallback);
    (season, self.multiplier(season))
  }

  /// Season for the current local month
  pub fn current(&self) -> (Season, f64) {
    self.season_for(chrono::Local::now().month())
  }

  pub fn multiplier(&self, season: Season) -> f64 {
    self
      .profiles
      .iter()
      .find(|p| p.season == season)
      .map(|p| p.multiplier)
      .unwrap_or(1.0)
  }

  pub fn profiles(&self) -> &[SeasonProfile] {
    &self.profiles
  }
}
