//! Configuration module for featurelab.
//!
//! Settings come from environment variables (a `.env` file is loaded by the
//! binary through `dotenvy`) or from a TOML file, organized by concern:
//! feature building and regime classification.

mod feature_config;
mod regime_config;

pub use feature_config::FeatureConfig;
pub use regime_config::RegimeEnvConfig;

use anyhow::{Context, Result};
use std::str::FromStr;

/// Reads `key` through `lookup`, falling back to `default` when unset.
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}
