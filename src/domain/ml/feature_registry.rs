/// Raw price columns every feature table starts with.
pub const RAW_COLUMNS: &[&str] = &["Open", "High", "Low", "Close", "Volume"];

pub const TARGET: &str = "Target";
pub const FUTURE_RETURNS: &str = "Future_Returns";

/// Columns that are never model inputs: raw prices and anything derived from
/// future values.
pub const NON_FEATURE_COLUMNS: &[&str] = &[
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    TARGET,
    FUTURE_RETURNS,
];

pub const CORE_INDICATOR_COLUMNS: &[&str] = &[
    "SMA_10",
    "SMA_20",
    "SMA_50",
    "SMA_200",
    "EMA_12",
    "EMA_26",
    "RSI_14",
    "RSI_7",
    "MACD",
    "MACD_Signal",
    "MACD_Hist",
    "BB_Upper",
    "BB_Middle",
    "BB_Lower",
    "BB_Width",
    "BB_Position",
    "ATR_14",
    "STOCH_K",
    "STOCH_D",
    "OBV",
    "CCI_20",
    "Williams_R",
    "ADX",
    "Plus_DI",
    "Minus_DI",
];

pub const EXTENDED_INDICATOR_COLUMNS: &[&str] = &[
    "MFI_14",
    "CMF_20",
    "VWAP",
    "KC_Upper",
    "KC_Middle",
    "KC_Lower",
    "DC_Upper",
    "DC_Middle",
    "DC_Lower",
    "Ichimoku_Conversion",
    "Ichimoku_Base",
    "Ichimoku_Span_A",
    "Ichimoku_Span_B",
    "Squeeze_On",
    "Squeeze_Momentum",
    "SuperTrend",
    "SuperTrend_Direction",
];

pub const PRICE_FEATURE_COLUMNS: &[&str] = &[
    "Returns",
    "Log_Returns",
    "Volatility_5",
    "Volatility_10",
    "Volatility_20",
    "Volatility_30",
    "Momentum_5",
    "Momentum_10",
    "Momentum_20",
    "ROC_5",
    "ROC_10",
    "ROC_20",
    "HL_Range",
    "HL_Pct",
    "Close_Position",
    "Gap",
    "Gap_Pct",
    "Range_vs_Avg",
];

pub const VOLUME_FEATURE_COLUMNS: &[&str] = &[
    "Volume_SMA_5",
    "Volume_SMA_10",
    "Volume_SMA_20",
    "Volume_Ratio_5",
    "Volume_Ratio_20",
    "Volume_ROC_5",
    "PV_Trend",
];

pub const TREND_FEATURE_COLUMNS: &[&str] = &[
    "SMA_Cross_20_50",
    "SMA_Cross_50_200",
    "Price_vs_SMA20",
    "Price_vs_SMA50",
    "Trend_Strength",
];

/// Columns the lag stage adds for lags `1..=n_lags`, in insertion order.
pub fn lagged_columns(n_lags: usize) -> Vec<String> {
    (1..=n_lags)
        .flat_map(|i| {
            [
                format!("Close_lag_{}", i),
                format!("Returns_lag_{}", i),
                format!("Volume_lag_{}", i),
            ]
        })
        .collect()
}

pub fn is_feature_column(name: &str) -> bool {
    !NON_FEATURE_COLUMNS.contains(&name)
}

/// Every feature column produced by a full build, in pipeline order.
pub fn expected_feature_columns(n_lags: usize, extended: bool) -> Vec<String> {
    let mut names: Vec<String> = CORE_INDICATOR_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .collect();
    if extended {
        names.extend(EXTENDED_INDICATOR_COLUMNS.iter().map(|s| s.to_string()));
    }
    names.extend(PRICE_FEATURE_COLUMNS.iter().map(|s| s.to_string()));
    names.extend(VOLUME_FEATURE_COLUMNS.iter().map(|s| s.to_string()));
    names.extend(lagged_columns(n_lags));
    names.extend(TREND_FEATURE_COLUMNS.iter().map(|s| s.to_string()));
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lagged_column_order() {
        let names = lagged_columns(2);
        assert_eq!(
            names,
            vec![
                "Close_lag_1",
                "Returns_lag_1",
                "Volume_lag_1",
                "Close_lag_2",
                "Returns_lag_2",
                "Volume_lag_2"
            ]
        );
    }

    #[test]
    fn test_reserved_columns_are_not_features() {
        for name in NON_FEATURE_COLUMNS {
            assert!(!is_feature_column(name));
        }
        assert!(is_feature_column("RSI_14"));
    }

    #[test]
    fn test_expected_columns_have_no_duplicates() {
        let names = expected_feature_columns(5, true);
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
        assert_eq!(names.len(), 25 + 17 + 18 + 7 + 15 + 5);
    }
}
