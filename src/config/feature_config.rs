//! Feature pipeline configuration.

use super::parse_var;
use crate::domain::errors::FeatureError;
use crate::domain::ml::target::{TargetMethod, TargetSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Settings for one feature build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub n_lags: usize,
    pub include_extended_indicators: bool,
    /// Features reported by the correlation ranking
    pub top_n: usize,
    pub target: TargetSpec,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            n_lags: 5,
            include_extended_indicators: true,
            top_n: 20,
            target: TargetSpec::default(),
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.n_lags == 0 {
            return Err(FeatureError::InvalidParameter {
                name: "n_lags",
                reason: "must be >= 1, got 0".to_string(),
            });
        }
        self.target.validate()
    }

    /// Load from environment variables, defaulting anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let method = match lookup("TARGET_METHOD") {
            Some(raw) => raw
                .parse::<TargetMethod>()
                .context("Failed to parse TARGET_METHOD")?,
            None => defaults.target.method,
        };

        let config = Self {
            n_lags: parse_var(&lookup, "FEATURE_N_LAGS", defaults.n_lags)?,
            include_extended_indicators: parse_var(
                &lookup,
                "FEATURE_EXTENDED_INDICATORS",
                defaults.include_extended_indicators,
            )?,
            top_n: parse_var(&lookup, "FEATURE_TOP_N", defaults.top_n)?,
            target: TargetSpec {
                horizon: parse_var(&lookup, "TARGET_HORIZON", defaults.target.horizon)?,
                threshold: parse_var(&lookup, "TARGET_THRESHOLD", defaults.target.threshold)?,
                method,
            },
        };
        config.validate().context("Invalid feature config")?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse feature config")?;
        config.validate().context("Invalid feature config")?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}
