use super::moving_average::ema;
use super::volatility::true_range;
use super::{aligned_len, ensure_window};
use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;

/// MACD line, signal line and histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Average Directional Index with its directional indicators
#[derive(Debug, Clone, PartialEq)]
pub struct Adx {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuParams {
    pub conversion: usize,
    pub base: usize,
    pub span_b: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            conversion: 9,
            base: 26,
            span_b: 52,
            displacement: 26,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ichimoku {
    pub conversion: Series,
    pub base: Series,
    pub span_a: Series,
    pub span_b: Series,
}

/// MACD = EMA(fast) - EMA(slow); signal = EMA(MACD, signal); histogram = MACD - signal
pub fn macd(
    data: &Series,
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<Macd, IndicatorError> {
    ensure_window("macd_fast", fast)?;
    ensure_window("macd_slow", slow)?;
    ensure_window("macd_signal", signal)?;

    let line = ema(data, fast)?.try_sub(&ema(data, slow)?)?;
    let signal = ema(&line, signal)?;
    let histogram = line.try_sub(&signal)?;
    Ok(Macd {
        line,
        signal,
        histogram,
    })
}

/// Average Directional Index.
///
/// +DM is the rise of the high and -DM the fall of the low from the previous
/// row, each floored at zero. Both are smoothed with a rolling mean over
/// `window`, as is the true range:
/// DI = 100 * mean(DM) / mean(TR), DX = 100 * |DI+ - DI-| / (DI+ + DI-),
/// ADX = mean(DX). Zero denominators leave the cell undefined.
pub fn adx(
    high: &Series,
    low: &Series,
    close: &Series,
    window: usize,
) -> Result<Adx, IndicatorError> {
    ensure_window("adx", window)?;
    aligned_len(&[high, low, close])?;

    let plus_dm = high.diff().map(|d| d.max(0.0));
    let minus_dm = low.diff().map(|d| (-d).max(0.0));
    let smoothed_tr = true_range(high, low, close)?.rolling_mean(window)?;

    let plus_di = plus_dm
        .rolling_mean(window)?
        .try_div(&smoothed_tr)?
        .scale(100.0);
    let minus_di = minus_dm
        .rolling_mean(window)?
        .try_div(&smoothed_tr)?
        .scale(100.0);

    let dx = plus_di.zip_with_opt(&minus_di, |plus, minus| {
        let sum = plus + minus;
        if sum == 0.0 {
            None
        } else {
            Some(100.0 * (plus - minus).abs() / sum)
        }
    })?;
    let adx = dx.rolling_mean(window)?;

    Ok(Adx {
        adx,
        plus_di,
        minus_di,
    })
}

fn midpoint(high: &Series, low: &Series, window: usize) -> Result<Series, IndicatorError> {
    Ok(high
        .rolling_max(window)?
        .try_add(&low.rolling_min(window)?)?
        .scale(0.5))
}

/// Ichimoku cloud. Both spans are displaced forward, so every cell only uses
/// data available at that row.
pub fn ichimoku(
    high: &Series,
    low: &Series,
    params: IchimokuParams,
) -> Result<Ichimoku, IndicatorError> {
    ensure_window("ichimoku_conversion", params.conversion)?;
    ensure_window("ichimoku_base", params.base)?;
    ensure_window("ichimoku_span_b", params.span_b)?;
    aligned_len(&[high, low])?;

    let conversion = midpoint(high, low, params.conversion)?;
    let base = midpoint(high, low, params.base)?;
    let span_a = conversion.try_add(&base)?.scale(0.5).lag(params.displacement);
    let span_b = midpoint(high, low, params.span_b)?.lag(params.displacement);

    Ok(Ichimoku {
        conversion,
        base,
        span_a,
        span_b,
    })
}
