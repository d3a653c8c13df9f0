use super::technical::RawColumns;
use crate::application::indicators::{momentum, roc};
use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::market::series::Series;
use tracing::info;

const VOLATILITY_WINDOWS: [usize; 4] = [5, 10, 20, 30];
const MOMENTUM_PERIODS: [usize; 3] = [5, 10, 20];

/// Returns, realized volatility, momentum and intraday range features
pub fn price_features(table: FeatureTable) -> Result<FeatureTable, FeatureError> {
    info!("Adding price features...");
    let RawColumns {
        open,
        high,
        low,
        close,
        ..
    } = RawColumns::from_table(&table)?;

    let returns = close.pct_change(1);
    let prev_close = close.lag(1);
    let log_returns = close.zip_with_opt(&prev_close, |now, prev| {
        if prev == 0.0 {
            None
        } else {
            Some((now / prev).ln())
        }
    })?;

    let mut columns: Vec<(String, Series)> = Vec::with_capacity(18);
    for window in VOLATILITY_WINDOWS {
        columns.push((format!("Volatility_{}", window), returns.rolling_std(window)?));
    }
    for period in MOMENTUM_PERIODS {
        columns.push((format!("Momentum_{}", period), momentum(&close, period)?));
    }
    for period in MOMENTUM_PERIODS {
        columns.push((format!("ROC_{}", period), roc(&close, period)?));
    }

    let hl_range = high.try_sub(&low)?;
    let hl_pct = hl_range.try_div(&close)?;
    let close_position = close.try_sub(&low)?.try_div(&hl_range)?;
    let gap = open.try_sub(&prev_close)?;
    let gap_pct = gap.try_div(&prev_close)?;
    let range_vs_avg = hl_range.try_div(&hl_range.rolling_mean(20)?)?;

    columns.extend([
        ("HL_Range".to_string(), hl_range),
        ("HL_Pct".to_string(), hl_pct),
        ("Close_Position".to_string(), close_position),
        ("Gap".to_string(), gap),
        ("Gap_Pct".to_string(), gap_pct),
        ("Range_vs_Avg".to_string(), range_vs_avg),
    ]);

    table
        .with_column("Returns", returns)?
        .with_column("Log_Returns", log_returns)?
        .with_columns(columns)
}
