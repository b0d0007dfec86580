pub mod aggregation;
pub mod breakdown;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod export;
pub mod insights;
pub mod models;
pub mod projection;
pub mod seasonality;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use catalog::ReferenceCatalog;
use commands::DashboardSession;
use config::DashboardConfig;

/// Load configuration and the catalog, then open a session with its first
/// record set generated. The host installs the logger before calling this.
pub fn init() -> Result<DashboardSession, String> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = DashboardConfig::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

  let catalog = match &config.catalog_path {
    Some(path) => ReferenceCatalog::load(path).map_err(|e| format!("Failed to load catalog: {}", e))?,
    None => ReferenceCatalog::nxs_default(),
  };

  log::info!(
    "facilities={} tiers={} month={} seeded={}",
    catalog.facilities().len(),
    catalog.tiers().len(),
    config.effective_month(),
    config.seed.is_some()
  );

  Ok(DashboardSession::new(Arc::new(catalog), config))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::builtin_spec;
  use crate::config::{
    ENV_ALERT_LIMIT, ENV_CATALOG_PATH, ENV_EXPORT_DIR, ENV_EXPORT_PREFIX, ENV_MONTH, ENV_SEED,
  };
  use crate::seasonality::Season;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_init_loads_catalog_from_env_path() {
    // Arrange: built-in catalog with the specialty areas removed
    let mut spec = builtin_spec();
    spec.facilities.remove("specialty_areas");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, serde_json::to_string(&spec).unwrap()).unwrap();
    let path_str = path.to_str().expect("utf-8 path");

    temp_env::with_vars(
      [
        (ENV_CATALOG_PATH, Some(path_str)),
        (ENV_SEED, Some("11")),
        (ENV_MONTH, Some("7")),
        (ENV_ALERT_LIMIT, None),
        (ENV_EXPORT_DIR, None),
        (ENV_EXPORT_PREFIX, None),
      ],
      || {
        // Act
        let session = init().expect("init succeeds");

        // Assert
        assert_eq!(session.catalog().facilities().len(), 11);
        assert!(session.catalog().facility("SA001").is_none());
        assert_eq!(session.config().catalog_path.as_deref(), Some(path.as_path()));
        assert_eq!(session.season(), Season::Summer);
        assert!(!session.records().is_empty());
      },
    );
  }

  #[test]
  #[serial]
  fn test_init_reports_missing_catalog_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.json");
    let missing_str = missing.to_str().expect("utf-8 path");

    temp_env::with_vars(
      [
        (ENV_CATALOG_PATH, Some(missing_str)),
        (ENV_SEED, Some("11")),
        (ENV_MONTH, None),
        (ENV_ALERT_LIMIT, None),
        (ENV_EXPORT_DIR, None),
        (ENV_EXPORT_PREFIX, None),
      ],
      || {
        let err = init().unwrap_err();
        assert!(
          err.starts_with("Failed to load catalog: Failed to read catalog"),
          "unexpected error {}",
          err
        );
      },
    );
  }

  #[test]
  #[serial]
  fn test_init_falls_back_to_builtin_catalog() {
    temp_env::with_vars(
      [
        (ENV_CATALOG_PATH, None::<&str>),
        (ENV_SEED, Some("3")),
        (ENV_MONTH, Some("4")),
        (ENV_ALERT_LIMIT, None),
        (ENV_EXPORT_DIR, None),
        (ENV_EXPORT_PREFIX, None),
      ],
      || {
        let session = init().expect("init succeeds");
        assert_eq!(session.catalog(), &ReferenceCatalog::nxs_default());
      },
    );
  }
}
