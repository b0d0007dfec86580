use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const ENV_SEED: &str = "DEMAND_SEED";
pub const ENV_MONTH: &str = "DEMAND_MONTH";
pub const ENV_ALERT_LIMIT: &str = "DEMAND_ALERT_LIMIT";
pub const ENV_EXPORT_DIR: &str = "DEMAND_EXPORT_DIR";
pub const ENV_EXPORT_PREFIX: &str = "DEMAND_EXPORT_PREFIX";
pub const ENV_CATALOG_PATH: &str = "DEMAND_CATALOG_PATH";

const DEFAULT_ALERT_LIMIT: usize = 5;
const DEFAULT_EXPORT_PREFIX: &str = "nxs_heatmap_analysis";

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value}")]
  Invalid { var: String, value: String },
}

/// Session settings, read from the environment (and `.env`) at startup
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
  /// Fixed seed for reproducible projections; entropy when None
  pub seed: Option<u64>,
  /// Month override for season resolution; current month when None
  pub month: Option<u32>,
  pub alert_limit: usize,
  pub export_dir: PathBuf,
  pub export_prefix: String,
  /// JSON catalog file; built-in catalog when None
  pub catalog_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
  fn default() -> Self {
    Self {
      seed: None,
      month: None,
      alert_limit: DEFAULT_ALERT_LIMIT,
      export_dir: PathBuf::from("."),
      export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
      catalog_path: None,
    }
  }
}

impl DashboardConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let month = parse_var::<u32>(ENV_MONTH)?;
    if let Some(m) = month {
      if !(1..=12).contains(&m) {
        return Err(invalid(ENV_MONTH, &m.to_string()));
      }
    }

    Ok(Self {
      seed: parse_var(ENV_SEED)?,
      month,
      alert_limit: parse_var(ENV_ALERT_LIMIT)?.unwrap_or(defaults.alert_limit),
      export_dir: non_empty_var(ENV_EXPORT_DIR)
        .map(PathBuf::from)
        .unwrap_or(defaults.export_dir),
      export_prefix: non_empty_var(ENV_EXPORT_PREFIX).unwrap_or(defaults.export_prefix),
      catalog_path: non_empty_var(ENV_CATALOG_PATH).map(PathBuf::from),
    })
  }

  /// Month used for season resolution
  pub fn effective_month(&self) -> u32 {
    use chrono::Datelike;
    self.month.unwrap_or_else(|| chrono::Local::now().month())
  }
}

fn invalid(var: &str, value: &str) -> ConfigError {
  log::warn!("config_var={} value={} unparsable", var, value);
  ConfigError::Invalid {
    var: var.to_string(),
    value: value.to_string(),
  }
}

fn non_empty_var(var: &str) -> Option<String> {
  env::var(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
  match non_empty_var(var) {
    Some(raw) => raw.parse::<T>().map(Some).map_err(|_| invalid(var, &raw)),
    None => Ok(None),
  }
}
