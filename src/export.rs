//! JSON export of the current analysis
//!
//! The document shape is consumed verbatim by download buttons downstream:
//! `{summary, facility_breakdown, recommendations}`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::aggregation::DashboardAggregates;
use crate::breakdown::FacilityBreakdown;
use crate::insights::InsightReport;

#[derive(Debug, thiserror::Error, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ExportError {
  #[error("IO error: {0}")]
  Io(String),

  #[error("Serialization error: {0}")]
  Serialize(String),
}

impl From<std::io::Error> for ExportError {
  fn from(e: std::io::Error) -> Self {
    ExportError::Io(e.to_string())
  }
}

impl From<serde_json::Error> for ExportError {
  fn from(e: serde_json::Error) -> Self {
    ExportError::Serialize(e.to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
  pub total_sessions: usize,
  /// None when there were no sessions
  pub average_usage: Option<f64>,
  pub total_revenue: f64,
  /// ISO 8601, local time
  pub analysis_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
  pub summary: ExportSummary,
  pub facility_breakdown: FacilityBreakdown,
  pub recommendations: Vec<String>,
}

impl ExportReport {
  pub fn build(
    aggregates: &DashboardAggregates,
    breakdown: FacilityBreakdown,
    insights: &InsightReport,
    now: DateTime<Local>,
  ) -> Self {
    Self {
      summary: ExportSummary {
        total_sessions: aggregates.total_sessions,
        average_usage: aggregates.overall_mean,
        total_revenue: aggregates.total_revenue,
        analysis_timestamp: now.to_rfc3339(),
      },
      facility_breakdown: breakdown,
      recommendations: insights.recommendation_messages(),
    }
  }

  pub fn to_json(&self) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.json`
pub fn export_file_name(prefix: &str, now: DateTime<Local>) -> String {
  format!("{}_{}.json", prefix, now.format("%Y%m%d_%H%M%S"))
}

/// Write the report into `dir` and return the path written
pub fn write_report(
  report: &ExportReport,
  dir: &Path,
  prefix: &str,
  now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
  std::fs::create_dir_all(dir)?;
  let path = dir.join(export_file_name(prefix, now));
  std::fs::write(&path, report.to_json()?)?;

  log::info!(
    "export_path={} sessions={} recommendations={}",
    path.display(),
    report.summary.total_sessions,
    report.recommendations.len()
  );
  Ok(path)
}
