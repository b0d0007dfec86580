use serde::{Deserialize, Serialize};

use crate::aggregation::{heatmap_grid, DashboardAggregates, HeatmapGrid, HeatmapMode, SeasonSportStats};
use crate::breakdown::{facility_efficiency, FacilityBreakdown, FacilityEfficiency};
use crate::commands::{DashboardSession, UsageFilter};
use crate::insights::{InsightEngine, InsightReport};
use crate::models::{Insight, UsageRecord};
use crate::seasonality::Season;

/// Headline numbers for the metrics row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
  pub total_sessions: usize,
  pub average_usage: Option<f64>,
  pub prime_time_usage: Option<f64>,
  pub weekend_boost: Option<f64>,
  pub total_revenue: f64,
  pub season: Season,
  pub season_sports: Vec<SeasonSportStats>,
}

fn check_hour(hour: Option<u8>) -> Result<(), String> {
  match hour {
    Some(h) if h > 23 => Err(format!("Failed to derive insights: invalid hour {}", h)),
    _ => Ok(()),
  }
}

/// Regenerate the session's record set
pub fn refresh_data(session: &mut DashboardSession) -> Result<usize, String> {
  Ok(session.refresh())
}

pub fn get_usage_records(session: &DashboardSession, filter: &UsageFilter) -> Result<Vec<UsageRecord>, String> {
  Ok(session.filtered(filter))
}

pub fn get_key_metrics(session: &DashboardSession, filter: &UsageFilter) -> Result<KeyMetrics, String> {
  let records = session.filtered(filter);
  let aggregates = DashboardAggregates::compute(&records, session.catalog());

  Ok(KeyMetrics {
    total_sessions: aggregates.total_sessions,
    average_usage: aggregates.overall_mean,
    prime_time_usage: aggregates.prime_time_mean,
    weekend_boost: aggregates.weekend_boost,
    total_revenue: aggregates.total_revenue,
    season: session.season(),
    season_sports: aggregates.season_sports,
  })
}

pub fn get_heatmap(
  session: &DashboardSession,
  filter: &UsageFilter,
  mode: HeatmapMode,
) -> Result<HeatmapGrid, String> {
  Ok(heatmap_grid(&session.filtered(filter), mode))
}

pub fn get_facility_breakdown(
  session: &DashboardSession,
  filter: &UsageFilter,
) -> Result<FacilityBreakdown, String> {
  Ok(FacilityBreakdown::compute(&session.filtered(filter), session.catalog()))
}

pub fn get_facility_efficiency(
  session: &DashboardSession,
  filter: &UsageFilter,
) -> Result<Vec<FacilityEfficiency>, String> {
  Ok(facility_efficiency(&session.filtered(filter)))
}

pub fn get_insights(
  session: &DashboardSession,
  filter: &UsageFilter,
  current_hour: Option<u8>,
) -> Result<InsightReport, String> {
  check_hour(current_hour)?;

  let records = session.filtered(filter);
  let aggregates = DashboardAggregates::compute(&records, session.catalog());
  let engine = match current_hour {
    Some(hour) => InsightEngine::new().at_hour(hour),
    None => InsightEngine::new(),
  };

  Ok(engine.derive(&aggregates, session.catalog()))
}

/// Alerts capped at the configured display limit
pub fn get_top_alerts(
  session: &DashboardSession,
  filter: &UsageFilter,
  current_hour: Option<u8>,
) -> Result<Vec<Insight>, String> {
  let report = get_insights(session, filter, current_hour)?;
  Ok(
    report
      .top_alerts(session.config().alert_limit)
      .into_iter()
      .cloned()
      .collect(),
  )
}
