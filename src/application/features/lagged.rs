use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use tracing::info;

/// Close, Returns and Volume shifted back by `1..=n_lags` rows.
///
/// Needs the `Returns` column from the price stage.
pub fn lagged_features(table: FeatureTable, n_lags: usize) -> Result<FeatureTable, FeatureError> {
    if n_lags == 0 {
        return Err(FeatureError::InvalidParameter {
            name: "n_lags",
            reason: "must be >= 1, got 0".to_string(),
        });
    }
    info!("Adding {} lagged features...", n_lags);

    let close = table.require("Close")?.clone();
    let returns = table.require("Returns")?.clone();
    let volume = table.require("Volume")?.clone();

    let columns: Vec<_> = (1..=n_lags)
        .flat_map(|i| {
            [
                (format!("Close_lag_{}", i), close.lag(i)),
                (format!("Returns_lag_{}", i), returns.lag(i)),
                (format!("Volume_lag_{}", i), volume.lag(i)),
            ]
        })
        .collect();

    table.with_columns(columns)
}
