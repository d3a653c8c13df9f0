//! Regime classifier configuration parsing from environment variables.

use super::parse_var;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Regime environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeEnvConfig {
    /// Directory holding one `<TICKER>.csv` per ticker
    pub data_dir: PathBuf,
    pub cache_ttl_minutes: i64,
    pub check_breadth: bool,
}

impl Default for RegimeEnvConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_ttl_minutes: 60,
            check_breadth: false,
        }
    }
}

impl RegimeEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cache_ttl_minutes =
            parse_var(&lookup, "REGIME_CACHE_TTL_MINUTES", defaults.cache_ttl_minutes)?;
        if cache_ttl_minutes <= 0 {
            anyhow::bail!(
                "Invalid REGIME_CACHE_TTL_MINUTES: {}. Must be positive",
                cache_ttl_minutes
            );
        }

        Ok(Self {
            data_dir: lookup("REGIME_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            cache_ttl_minutes,
            check_breadth: parse_var(&lookup, "REGIME_CHECK_BREADTH", defaults.check_breadth)?,
        })
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cache_ttl_minutes)
    }
}
