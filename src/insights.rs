//! Threshold rules turning dashboard aggregates into alerts and recommendations
//!
//! The engine reports every finding. Display limits are applied by the
//! caller through `InsightReport::top_alerts`.

use serde::{Deserialize, Serialize};

use crate::aggregation::DashboardAggregates;
use crate::catalog::ReferenceCatalog;
use crate::models::{Insight, InsightCategory, Priority};

/// ---------------------------------------------------------------------------
/// Thresholds
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
  /// Overall mean below this suggests promotional campaigns
  pub promotional_below: f64,
  /// Prime-time mean above this suggests dynamic pricing
  pub dynamic_pricing_above: f64,
  pub season_sport_high: f64,
  pub season_sport_low: f64,
  pub entry_tier_low: f64,
  pub facility_low: f64,
  pub facility_monitor: f64,
  pub facility_capacity: f64,
  /// Evening hours checked by the high-demand alert (inclusive)
  pub high_demand_start_hour: u8,
  pub high_demand_end_hour: u8,
  pub high_demand_usage: f64,
  pub revenue_opportunity: f64,
}

impl Default for InsightThresholds {
  fn default() -> Self {
    Self {
      promotional_below: 70.0,
      dynamic_pricing_above: 90.0,
      season_sport_high: 80.0,
      season_sport_low: 40.0,
      entry_tier_low: 30.0,
      facility_low: 40.0,
      facility_monitor: 75.0,
      facility_capacity: 85.0,
      high_demand_start_hour: 18,
      high_demand_end_hour: 21,
      high_demand_usage: 85.0,
      revenue_opportunity: 5000.0,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Report
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
  /// Stable-sorted by priority, High first. Never empty.
  pub insights: Vec<Insight>,
}

impl InsightReport {
  pub fn alerts(&self) -> Vec<&Insight> {
    self.insights.iter().filter(|i| i.is_alert()).collect()
  }

  pub fn recommendations(&self) -> Vec<&Insight> {
    self.insights.iter().filter(|i| !i.is_alert()).collect()
  }

  /// Alerts truncated to a display limit
  pub fn top_alerts(&self, limit: usize) -> Vec<&Insight> {
    self.insights.iter().filter(|i| i.is_alert()).take(limit).collect()
  }

  pub fn recommendation_messages(&self) -> Vec<String> {
    self.recommendations().into_iter().map(|i| i.message.clone()).collect()
  }

  pub fn len(&self) -> usize {
    self.insights.len()
  }

  pub fn is_empty(&self) -> bool {
    self.insights.is_empty()
  }
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
  thresholds: InsightThresholds,
  current_hour: Option<u8>,
}

impl InsightEngine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_thresholds(mut self, thresholds: InsightThresholds) -> Self {
    self.thresholds = thresholds;
    self
  }

  /// Wall-clock hour used by the high-demand alert
  pub fn at_hour(mut self, hour: u8) -> Self {
    self.current_hour = Some(hour);
    self
  }

  pub fn thresholds(&self) -> &InsightThresholds {
    &self.thresholds
  }

  pub fn derive(&self, aggregates: &DashboardAggregates, catalog: &ReferenceCatalog) -> InsightReport {
    let mut insights = self.alerts(aggregates, catalog);
    insights.extend(self.recommendations(aggregates, catalog));

    if !insights.iter().any(|i| i.is_alert()) {
      insights.push(Insight::alert(
        Priority::Info,
        InsightCategory::Status,
        "All Systems Optimal",
        "No critical alerts - facilities operating within normal parameters".to_string(),
        "Continue monitoring for optimization opportunities",
      ));
    }

    insights.sort_by_key(|i| i.priority);

    log::debug!(
      "sessions={} alerts={} recommendations={}",
      aggregates.total_sessions,
      insights.iter().filter(|i| i.is_alert()).count(),
      insights.iter().filter(|i| !i.is_alert()).count()
    );

    InsightReport { insights }
  }

  fn alerts(&self, agg: &DashboardAggregates, catalog: &ReferenceCatalog) -> Vec<Insight> {
    let t = &self.thresholds;
    let mut alerts = Vec::new();

    // Evening rush, only meaningful when a wall-clock hour was supplied
    if let Some(hour) = self.current_hour {
      if (t.high_demand_start_hour..=t.high_demand_end_hour).contains(&hour)
        && agg.hour_mean(hour).is_some_and(|m| m > t.high_demand_usage)
      {
        alerts.push(Insight::alert(
          Priority::High,
          InsightCategory::Demand,
          "High Demand Alert",
          "Prime time capacity near maximum - consider overflow planning".to_string(),
          "Activate backup facilities or implement waitlist system",
        ));
      }
    }

    for stats in &agg.season_sports {
      if !catalog.is_season_sensitive(&stats.sport) {
        continue;
      }
      if stats.mean_usage.is_some_and(|m| m > t.season_sport_high) {
        let sport_lc = stats.sport.to_lowercase();
        alerts.push(
          Insight::alert(
            Priority::Medium,
            InsightCategory::Demand,
            &format!("{} Demand Alert", stats.sport),
            format!("High {} demand detected - expansion opportunity", sport_lc),
            &format!("Consider adding {}-specific programming or field time", sport_lc),
          )
          .about(&stats.sport),
        );
      }
    }

    if agg.total_revenue > t.revenue_opportunity {
      alerts.push(Insight::alert(
        Priority::Medium,
        InsightCategory::Revenue,
        "Revenue Opportunity",
        "High revenue potential identified in current usage patterns".to_string(),
        "Optimize pricing for peak demand periods",
      ));
    }

    for entry in &agg.facility_means.entries {
      let (facility, usage) = (entry.label.as_str(), entry.value);

      if usage < t.facility_low {
        alerts.push(
          Insight::alert(
            Priority::Low,
            InsightCategory::Utilization,
            "Low Utilization Alert",
            format!("{} showing low utilization ({:.1}%)", facility, usage),
            "Review programming or consider alternative uses",
          )
          .about(facility),
        );
      } else if usage > t.facility_capacity {
        alerts.push(
          Insight::alert(
            Priority::High,
            InsightCategory::Capacity,
            "Capacity Alert",
            format!("{} at {:.1}% utilization", facility, usage),
            "Consider expansion or schedule optimization",
          )
          .about(facility),
        );
      } else if usage > t.facility_monitor {
        alerts.push(
          Insight::alert(
            Priority::Medium,
            InsightCategory::Capacity,
            "Monitoring Alert",
            format!("{} at {:.1}% utilization", facility, usage),
            "Monitor for peak time conflicts",
          )
          .about(facility),
        );
      }
    }

    alerts
  }

  fn recommendations(&self, agg: &DashboardAggregates, catalog: &ReferenceCatalog) -> Vec<Insight> {
    let t = &self.thresholds;
    let mut recs = Vec::new();

    if agg.overall_mean.is_some_and(|m| m < t.promotional_below) {
      recs.push(Insight::recommendation(
        Priority::Medium,
        InsightCategory::Utilization,
        format!(
          "Overall utilization below {}% - consider promotional campaigns",
          t.promotional_below
        ),
      ));
    }

    if agg.prime_time_mean.is_some_and(|m| m > t.dynamic_pricing_above) {
      recs.push(Insight::recommendation(
        Priority::High,
        InsightCategory::Pricing,
        format!(
          "Prime time over {}% utilized - implement dynamic pricing",
          t.dynamic_pricing_above
        ),
      ));
    }

    for stats in &agg.season_sports {
      if !catalog.is_season_sensitive(&stats.sport) {
        continue;
      }
      let Some(mean) = stats.mean_usage else {
        continue;
      };
      let sport_lc = stats.sport.to_lowercase();

      if mean > t.season_sport_high {
        recs.push(
          Insight::recommendation(
            Priority::Medium,
            InsightCategory::Programming,
            format!("High {} demand - consider adding more field time slots", sport_lc),
          )
          .about(&stats.sport),
        );
      } else if mean < t.season_sport_low {
        recs.push(
          Insight::recommendation(
            Priority::Low,
            InsightCategory::Programming,
            format!("Low {} utilization - develop youth programs and clinics", sport_lc),
          )
          .about(&stats.sport),
        );
      }
    }

    if let (Some(weekend), Some(weekday)) = (agg.weekend_mean, agg.weekday_mean) {
      if weekend < weekday {
        recs.push(Insight::recommendation(
          Priority::Low,
          InsightCategory::Programming,
          "Weekend usage below weekday - create weekend events and tournaments".to_string(),
        ));
      }
    }

    if agg.entry_tier_mean.is_some_and(|m| m < t.entry_tier_low) {
      recs.push(
        Insight::recommendation(
          Priority::Low,
          InsightCategory::Engagement,
          format!(
            "Low {} engagement - offer beginner programs and discounts",
            agg.entry_tier
          ),
        )
        .about(&agg.entry_tier),
      );
    }

    recs
  }
}
