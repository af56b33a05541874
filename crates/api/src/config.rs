//! Service configuration from environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

use tallyerp_reporting::ReportingConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reporting config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `INVOICE_SNAPSHOT_PATH`: JSON `{ "<tenant uuid>": [invoice, ...] }`.
    pub invoice_snapshot_path: Option<PathBuf>,
    /// `REPORTING_CONFIG_PATH`: JSON `ReportingConfig`, partial documents allowed.
    pub reporting_config_path: Option<PathBuf>,
    /// `DEFAULT_LOOKBACK_MONTHS`: report start when the caller gives none.
    pub default_lookback_months: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            invoice_snapshot_path: None,
            reporting_config_path: None,
            default_lookback_months: DEFAULT_LOOKBACK_MONTHS,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_lookback_months = match non_empty("DEFAULT_LOOKBACK_MONTHS") {
            None => DEFAULT_LOOKBACK_MONTHS,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "DEFAULT_LOOKBACK_MONTHS is not a whole number; using {DEFAULT_LOOKBACK_MONTHS}"
                );
                DEFAULT_LOOKBACK_MONTHS
            }),
        };

        Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            invoice_snapshot_path: non_empty("INVOICE_SNAPSHOT_PATH").map(PathBuf::from),
            reporting_config_path: non_empty("REPORTING_CONFIG_PATH").map(PathBuf::from),
            default_lookback_months,
        }
    }

    /// Built-in defaults unless `REPORTING_CONFIG_PATH` is set.
    pub fn load_reporting_config(&self) -> Result<ReportingConfig, ConfigError> {
        match &self.reporting_config_path {
            Some(path) => read_reporting_config(path),
            None => Ok(ReportingConfig::default()),
        }
    }
}

fn read_reporting_config(path: &Path) -> Result<ReportingConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
