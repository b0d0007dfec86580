pub mod dashboard;
pub mod export;

use chrono::{DateTime, Local};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::ReferenceCatalog;
use crate::config::DashboardConfig;
use crate::models::{FacilityType, UsageRecord};
use crate::projection::DemandProjector;
use crate::seasonality::Season;

/// ---------------------------------------------------------------------------
/// Session State
/// ---------------------------------------------------------------------------

/// Per-caller dashboard state: the shared catalog, a private random source
/// and the current record set. Hosts serving several callers give each its
/// own session.
#[derive(Debug)]
pub struct DashboardSession {
  catalog: Arc<ReferenceCatalog>,
  config: DashboardConfig,
  rng: ChaCha8Rng,
  records: Vec<UsageRecord>,
  season: Season,
  generated_at: DateTime<Local>,
}

impl DashboardSession {
  /// Create a session and generate its first record set
  pub fn new(catalog: Arc<ReferenceCatalog>, config: DashboardConfig) -> Self {
    let rng = match config.seed {
      Some(seed) => ChaCha8Rng::seed_from_u64(seed),
      None => ChaCha8Rng::from_entropy(),
    };

    let mut session = Self {
      catalog,
      config,
      rng,
      records: Vec::new(),
      season: Season::Spring,
      generated_at: Local::now(),
    };
    session.refresh();
    session
  }

  /// Regenerate the record set, replacing the previous one wholesale
  pub fn refresh(&mut self) -> usize {
    let projector = DemandProjector::new(&self.catalog, self.config.effective_month());
    self.records = projector.project(&mut self.rng);
    self.season = projector.season();
    self.generated_at = Local::now();

    log::info!(
      "records={} season={} generated_at={}",
      self.records.len(),
      self.season,
      self.generated_at.to_rfc3339()
    );
    self.records.len()
  }

  pub fn catalog(&self) -> &ReferenceCatalog {
    &self.catalog
  }

  pub fn config(&self) -> &DashboardConfig {
    &self.config
  }

  pub fn records(&self) -> &[UsageRecord] {
    &self.records
  }

  pub fn season(&self) -> Season {
    self.season
  }

  pub fn generated_at(&self) -> DateTime<Local> {
    self.generated_at
  }

  /// Records passing the filter, cloned out of the session
  pub fn filtered(&self, filter: &UsageFilter) -> Vec<UsageRecord> {
    filter.apply(&self.records)
  }
}

/// ---------------------------------------------------------------------------
/// Filtering
/// ---------------------------------------------------------------------------

/// Read-only selection over the record set. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageFilter {
  #[serde(default)]
  pub facility_type: Option<FacilityType>,
  #[serde(default)]
  pub sport: Option<String>,
  #[serde(default)]
  pub tier: Option<String>,
}

impl UsageFilter {
  pub fn all() -> Self {
    Self::default()
  }

  pub fn matches(&self, record: &UsageRecord) -> bool {
    self.facility_type.map_or(true, |t| record.facility_type == t)
      && self.sport.as_deref().map_or(true, |s| record.sport == s)
      && self.tier.as_deref().map_or(true, |t| record.member_tier == t)
  }

  pub fn apply(&self, records: &[UsageRecord]) -> Vec<UsageRecord> {
    records.iter().filter(|r| self.matches(r)).cloned().collect()
  }
}
