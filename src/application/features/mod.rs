//! Feature engineering pipeline
//!
//! Turns an OHLCV table into a wide feature table in fixed stages:
//! technical indicators, price, volume, lagged and trend features, then the
//! forward-looking target. Every stage is a pure function over a
//! [`FeatureTable`]; [`FeatureEngineer`] chains them by value.

pub mod batch;
pub mod lagged;
pub mod price;
pub mod selection;
pub mod target;
pub mod technical;
pub mod trend;
pub mod volume;

pub use batch::{TickerFeatures, build_feature_tables};
pub use selection::{FeatureCorrelation, correlation_with_target, feature_names, pearson};

use crate::config::FeatureConfig;
use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::market::ohlcv::OhlcvTable;
use crate::domain::ml::target::{LabelDistribution, TargetSpec};
use crate::domain::validation::data_quality::BarValidator;
use tracing::{debug, info, warn};

/// Stage-by-stage feature builder over one ticker's history.
///
/// ```ignore
/// let table = FeatureEngineer::new(&ohlcv)
///     .add_technical_indicators()?
///     .add_price_features()?
///     .create_target(&TargetSpec::default())?
///     .features(true);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    table: FeatureTable,
    config: FeatureConfig,
    label_distribution: Option<LabelDistribution>,
}

impl FeatureEngineer {
    pub fn new(ohlcv: &OhlcvTable) -> Self {
        Self::from_parts(ohlcv, FeatureConfig::default())
    }

    pub fn with_config(ohlcv: &OhlcvTable, config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self::from_parts(ohlcv, config))
    }

    fn from_parts(ohlcv: &OhlcvTable, config: FeatureConfig) -> Self {
        let inconsistent = BarValidator::inconsistent_rows(ohlcv);
        if !inconsistent.is_empty() {
            warn!(
                "{}: {} bars with inconsistent OHLC values",
                ohlcv.symbol(),
                inconsistent.len()
            );
        }

        Self {
            table: FeatureTable::from_ohlcv(ohlcv),
            config,
            label_distribution: None,
        }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    fn apply<F>(self, stage: F) -> Result<Self, FeatureError>
    where
        F: FnOnce(FeatureTable, &FeatureConfig) -> Result<FeatureTable, FeatureError>,
    {
        let Self {
            table,
            config,
            label_distribution,
        } = self;
        let table = stage(table, &config)?;
        Ok(Self {
            table,
            config,
            label_distribution,
        })
    }

    pub fn add_technical_indicators(self) -> Result<Self, FeatureError> {
        self.apply(|table, config| {
            technical::technical_indicators(table, config.include_extended_indicators)
        })
    }

    pub fn add_price_features(self) -> Result<Self, FeatureError> {
        self.apply(|table, _| price::price_features(table))
    }

    pub fn add_volume_features(self) -> Result<Self, FeatureError> {
        self.apply(|table, _| volume::volume_features(table))
    }

    pub fn add_lagged_features(self, n_lags: usize) -> Result<Self, FeatureError> {
        self.apply(|table, _| lagged::lagged_features(table, n_lags))
    }

    pub fn add_trend_features(self) -> Result<Self, FeatureError> {
        self.apply(|table, _| trend::trend_features(table))
    }

    pub fn create_target(self, spec: &TargetSpec) -> Result<Self, FeatureError> {
        let (table, label_distribution) = target::create_target(self.table, spec)?;
        Ok(Self {
            table,
            config: self.config,
            label_distribution,
        })
    }

    /// Runs every stage with the engineer's configuration
    pub fn build_all_features(self) -> Result<Self, FeatureError> {
        info!("Building all features for {}", self.table.symbol());
        let n_lags = self.config.n_lags;
        let target = self.config.target;

        let engineer = self
            .add_technical_indicators()?
            .add_price_features()?
            .add_volume_features()?
            .add_lagged_features(n_lags)?
            .add_trend_features()?
            .create_target(&target)?;

        info!(
            "All features built: {} columns, {} rows",
            engineer.table.width(),
            engineer.table.len()
        );
        Ok(engineer)
    }

    /// The table built so far, optionally without rows holding any
    /// undefined cell.
    pub fn features(&self, drop_undefined: bool) -> FeatureTable {
        if !drop_undefined {
            return self.table.clone();
        }
        let clean = self.table.drop_undefined_rows();
        debug!(
            "Dropped {} rows with undefined values, {} remaining",
            self.table.len() - clean.len(),
            clean.len()
        );
        clean
    }

    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    pub fn into_table(self) -> FeatureTable {
        self.table
    }

    pub fn feature_names(&self) -> Vec<String> {
        selection::feature_names(&self.table)
    }

    pub fn correlation_with_target(
        &self,
        top_n: usize,
    ) -> Result<Vec<FeatureCorrelation>, FeatureError> {
        selection::correlation_with_target(&self.table, top_n)
    }

    /// Label counts from the last classification target, if any
    pub fn label_distribution(&self) -> Option<&LabelDistribution> {
        self.label_distribution.as_ref()
    }
}
