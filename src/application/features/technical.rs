use crate::application::indicators::{
    IchimokuParams, adx, atr, band_position, bollinger_bands, cci, cmf, donchian_channels, ema,
    ichimoku, keltner_channels, macd, mfi, obv, rsi, sma, squeeze_momentum, stochastic,
    supertrend, vwap, williams_r,
};
use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::market::series::Series;
use tracing::info;

/// Raw OHLCV columns cloned out of a table so stages can consume it afterwards
pub(crate) struct RawColumns {
    pub open: Series,
    pub high: Series,
    pub low: Series,
    pub close: Series,
    pub volume: Series,
}

impl RawColumns {
    pub fn from_table(table: &FeatureTable) -> Result<Self, FeatureError> {
        Ok(Self {
            open: table.require("Open")?.clone(),
            high: table.require("High")?.clone(),
            low: table.require("Low")?.clone(),
            close: table.require("Close")?.clone(),
            volume: table.require("Volume")?.clone(),
        })
    }
}

/// Adds the core indicator set and, when `include_extended` is set, the
/// extended volume/channel/trend indicators.
pub fn technical_indicators(
    table: FeatureTable,
    include_extended: bool,
) -> Result<FeatureTable, FeatureError> {
    info!("Adding technical indicators...");
    let raw = RawColumns::from_table(&table)?;
    let mut columns = core_indicators(&raw)?;
    if include_extended {
        columns.extend(extended_indicators(&raw)?);
    }
    table.with_columns(columns)
}

fn core_indicators(raw: &RawColumns) -> Result<Vec<(&'static str, Series)>, FeatureError> {
    let RawColumns {
        high,
        low,
        close,
        volume,
        ..
    } = raw;

    let macd = macd(close, 12, 26, 9)?;
    let bb = bollinger_bands(close, 20, 2.0)?;
    let bb_position = band_position(close, &bb)?;
    let stoch = stochastic(high, low, close, 14, 3)?;
    let adx = adx(high, low, close, 14)?;

    Ok(vec![
        ("SMA_10", sma(close, 10)?),
        ("SMA_20", sma(close, 20)?),
        ("SMA_50", sma(close, 50)?),
        ("SMA_200", sma(close, 200)?),
        ("EMA_12", ema(close, 12)?),
        ("EMA_26", ema(close, 26)?),
        ("RSI_14", rsi(close, 14)?),
        ("RSI_7", rsi(close, 7)?),
        ("MACD", macd.line),
        ("MACD_Signal", macd.signal),
        ("MACD_Hist", macd.histogram),
        ("BB_Upper", bb.upper),
        ("BB_Middle", bb.middle),
        ("BB_Lower", bb.lower),
        ("BB_Width", bb.width),
        ("BB_Position", bb_position),
        ("ATR_14", atr(high, low, close, 14)?),
        ("STOCH_K", stoch.k),
        ("STOCH_D", stoch.d),
        ("OBV", obv(close, volume)?),
        ("CCI_20", cci(high, low, close, 20)?),
        ("Williams_R", williams_r(high, low, close, 14)?),
        ("ADX", adx.adx),
        ("Plus_DI", adx.plus_di),
        ("Minus_DI", adx.minus_di),
    ])
}

fn extended_indicators(raw: &RawColumns) -> Result<Vec<(&'static str, Series)>, FeatureError> {
    let RawColumns {
        high,
        low,
        close,
        volume,
        ..
    } = raw;

    let kc = keltner_channels(high, low, close, 20, 10, 2.0)?;
    let dc = donchian_channels(high, low, 20)?;
    let ichi = ichimoku(high, low, IchimokuParams::default())?;
    let squeeze = squeeze_momentum(high, low, close, 20, 20)?;
    let st = supertrend(high, low, close, 10, 3.0)?;

    Ok(vec![
        ("MFI_14", mfi(high, low, close, volume, 14)?),
        ("CMF_20", cmf(high, low, close, volume, 20)?),
        ("VWAP", vwap(high, low, close, volume)?),
        ("KC_Upper", kc.upper),
        ("KC_Middle", kc.middle),
        ("KC_Lower", kc.lower),
        ("DC_Upper", dc.upper),
        ("DC_Middle", dc.middle),
        ("DC_Lower", dc.lower),
        ("Ichimoku_Conversion", ichi.conversion),
        ("Ichimoku_Base", ichi.base),
        ("Ichimoku_Span_A", ichi.span_a),
        ("Ichimoku_Span_B", ichi.span_b),
        ("Squeeze_On", squeeze.on),
        ("Squeeze_Momentum", squeeze.momentum),
        ("SuperTrend", st.value),
        ("SuperTrend_Direction", st.direction),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::features::test_support::sample_table;
    use crate::domain::ml::feature_registry::{
        CORE_INDICATOR_COLUMNS, EXTENDED_INDICATOR_COLUMNS, RAW_COLUMNS,
    };

    #[test]
    fn test_core_columns_in_order() {
        let table = technical_indicators(sample_table(250), false).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        let expected: Vec<&str> = RAW_COLUMNS
            .iter()
            .chain(CORE_INDICATOR_COLUMNS)
            .copied()
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_extended_columns_follow_core() {
        let table = technical_indicators(sample_table(250), true).unwrap();
        assert_eq!(
            table.width(),
            RAW_COLUMNS.len() + CORE_INDICATOR_COLUMNS.len() + EXTENDED_INDICATOR_COLUMNS.len()
        );
        assert!(table.has_column("SuperTrend_Direction"));
    }

    #[test]
    fn test_sma_200_warmup() {
        let table = technical_indicators(sample_table(250), false).unwrap();
        assert_eq!(
            table.column("SMA_200").unwrap().first_defined_index(),
            Some(199)
        );
        assert_eq!(table.column("EMA_12").unwrap().first_defined_index(), Some(0));
    }

    #[test]
    fn test_empty_table() {
        let table = technical_indicators(sample_table(0), true).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("RSI_14"));
    }
}
