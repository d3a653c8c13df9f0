use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::market::series::Series;
use tracing::info;

/// 1.0 while `fast` is above `slow`, 0.0 otherwise; undefined while either is
fn crossover(fast: &Series, slow: &Series) -> Result<Series, FeatureError> {
    Ok(fast.zip_with(slow, |f, s| f64::from(u8::from(f > s)))?)
}

/// Relative distance of `close` from `average`
fn distance(close: &Series, average: &Series) -> Result<Series, FeatureError> {
    Ok(close.try_sub(average)?.try_div(average)?)
}

/// Crossovers, distance from moving averages and 20-row trend strength.
///
/// Needs `SMA_20`, `SMA_50` and `SMA_200` from the technical stage.
pub fn trend_features(table: FeatureTable) -> Result<FeatureTable, FeatureError> {
    info!("Adding trend features...");
    let close = table.require("Close")?.clone();
    let sma_20 = table.require("SMA_20")?.clone();
    let sma_50 = table.require("SMA_50")?.clone();
    let sma_200 = table.require("SMA_200")?.clone();

    let strength = close.rolling(20, |window| {
        let first = window[0];
        let last = window[window.len() - 1];
        Some(if first == 0.0 { 0.0 } else { (last - first) / first })
    })?;

    table.with_columns([
        ("SMA_Cross_20_50", crossover(&sma_20, &sma_50)?),
        ("SMA_Cross_50_200", crossover(&sma_50, &sma_200)?),
        ("Price_vs_SMA20", distance(&close, &sma_20)?),
        ("Price_vs_SMA50", distance(&close, &sma_50)?),
        ("Trend_Strength", strength),
    ])
}
