use super::FeatureEngineer;
use crate::config::FeatureConfig;
use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::market::ohlcv::OhlcvTable;
use rayon::prelude::*;
use tracing::{info, warn};

/// Feature build outcome for one ticker
#[derive(Debug)]
pub struct TickerFeatures {
    pub symbol: String,
    pub result: Result<FeatureTable, FeatureError>,
}

/// Builds every feature stage for each table in parallel.
///
/// Results keep the input order; a failing ticker does not affect the others.
pub fn build_feature_tables(tables: &[OhlcvTable], config: &FeatureConfig) -> Vec<TickerFeatures> {
    info!("Building features for {} tickers", tables.len());

    let results: Vec<TickerFeatures> = tables
        .par_iter()
        .map(|ohlcv| TickerFeatures {
            symbol: ohlcv.symbol().to_string(),
            result: FeatureEngineer::with_config(ohlcv, config.clone())
                .and_then(FeatureEngineer::build_all_features)
                .map(FeatureEngineer::into_table),
        })
        .collect();

    for failed in results.iter().filter(|r| r.result.is_err()) {
        if let Err(e) = &failed.result {
            warn!("Feature build failed for {}: {}", failed.symbol, e);
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::features::test_support::sample_ohlcv;
    use crate::domain::ml::feature_registry::{expected_feature_columns, is_feature_column};

    #[test]
    fn test_batch_keeps_input_order() {
        let config = FeatureConfig::default();
        let tables = vec![sample_ohlcv("AAA", 260), sample_ohlcv("BBB", 30)];
        let results = build_feature_tables(&tables, &config);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "AAA");
        assert_eq!(results[1].symbol, "BBB");

        let table = results[0].result.as_ref().unwrap();
        assert_eq!(table.len(), 260);
        let names: Vec<String> = table
            .column_names()
            .filter(|n| is_feature_column(n))
            .map(str::to_string)
            .collect();
        assert_eq!(names, expected_feature_columns(config.n_lags, true));
        // short history still builds with the long windows undefined
        let short = results[1].result.as_ref().unwrap();
        assert!(short.column("SMA_200").unwrap().is_all_undefined());
    }

    #[test]
    fn test_empty_batch() {
        assert!(build_feature_tables(&[], &FeatureConfig::default()).is_empty());
    }
}
