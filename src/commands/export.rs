use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::aggregation::DashboardAggregates;
use crate::breakdown::FacilityBreakdown;
use crate::commands::{DashboardSession, UsageFilter};
use crate::export::{write_report, ExportReport};
use crate::insights::InsightEngine;

/// Build the export document for the filtered records
pub fn build_export(
  session: &DashboardSession,
  filter: &UsageFilter,
  now: DateTime<Local>,
) -> Result<ExportReport, String> {
  let records = session.filtered(filter);
  let aggregates = DashboardAggregates::compute(&records, session.catalog());
  let insights = InsightEngine::new().derive(&aggregates, session.catalog());
  let breakdown = FacilityBreakdown::compute(&records, session.catalog());

  Ok(ExportReport::build(&aggregates, breakdown, &insights, now))
}

/// Write the analysis JSON into the configured export directory
pub fn export_analysis(
  session: &DashboardSession,
  filter: &UsageFilter,
  now: DateTime<Local>,
) -> Result<PathBuf, String> {
  let report = build_export(session, filter, now)?;
  let config = session.config();

  write_report(&report, &config.export_dir, &config.export_prefix, now)
    .map_err(|e| format!("Failed to export analysis: {}", e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{mock_catalog, seeded_config};
  use std::sync::Arc;

  #[test]
  fn test_export_analysis_writes_into_configured_dir() {
    // Arrange
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = seeded_config(5);
    config.export_dir = dir.path().to_path_buf();
    config.export_prefix = "nightly".to_string();
    let session = DashboardSession::new(Arc::new(mock_catalog()), config);

    // Act
    let path = export_analysis(&session, &UsageFilter::all(), Local::now()).expect("export succeeds");

    // Assert
    assert!(path.starts_with(dir.path()));
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
    assert!(name.starts_with("nightly_"), "unexpected file name {}", name);
    assert!(name.ends_with(".json"));

    let json: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).expect("valid JSON");
    assert_eq!(
      json["summary"]["total_sessions"].as_u64(),
      Some(session.records().len() as u64)
    );
  }

  #[test]
  fn test_export_failure_is_reported_as_string() {
    // Arrange: export dir is an existing regular file
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let mut config = seeded_config(5);
    config.export_dir = file.path().to_path_buf();
    let session = DashboardSession::new(Arc::new(mock_catalog()), config);

    // Act
    let result = export_analysis(&session, &UsageFilter::all(), Local::now());

    // Assert
    let err = result.unwrap_err();
    assert!(err.starts_with("Failed to export analysis"), "unexpected error {}", err);
  }
}
