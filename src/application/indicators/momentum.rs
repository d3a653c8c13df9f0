use super::{aligned_len, ensure_window, strength_index, typical_price};
use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;

/// Stochastic oscillator lines
#[derive(Debug, Clone, PartialEq)]
pub struct Stochastic {
    pub k: Series,
    pub d: Series,
}

/// Relative Strength Index.
///
/// Rolling means of gains and loss magnitudes of the one-step change,
/// scaled by `100 - 100 / (1 + gain / loss)`. A zero average loss reads as 100,
/// including the 0/0 case: a window with no price change at all (flat price)
/// also reports 100.
/// The first defined value is at index `window` (needs `window` deltas).
pub fn rsi(data: &Series, window: usize) -> Result<Series, IndicatorError> {
    ensure_window("rsi", window)?;
    let delta = data.diff();
    let gains = delta.map(|d| d.max(0.0)).rolling_mean(window)?;
    let losses = delta.map(|d| (-d).max(0.0)).rolling_mean(window)?;
    gains.zip_with(&losses, strength_index)
}

/// Rate of change in percent: `100 * (x - x[t-w]) / x[t-w]`
pub fn roc(data: &Series, window: usize) -> Result<Series, IndicatorError> {
    ensure_window("roc", window)?;
    data.zip_with_opt(&data.lag(window), |now, base| {
        if base == 0.0 {
            None
        } else {
            Some(100.0 * (now - base) / base)
        }
    })
}

/// Price difference over `periods` rows: `x - x[t-n]`
pub fn momentum(data: &Series, periods: usize) -> Result<Series, IndicatorError> {
    ensure_window("momentum", periods)?;
    data.try_sub(&data.lag(periods))
}

/// Stochastic oscillator: `%K = 100 * (C - LL) / (HH - LL)`, `%D = SMA(%K)`.
///
/// `%K` is undefined when the `k_window` range is flat.
pub fn stochastic(
    high: &Series,
    low: &Series,
    close: &Series,
    k_window: usize,
    d_window: usize,
) -> Result<Stochastic, IndicatorError> {
    ensure_window("stochastic_k", k_window)?;
    ensure_window("stochastic_d", d_window)?;
    aligned_len(&[high, low, close])?;

    let lowest_low = low.rolling_min(k_window)?;
    let highest_high = high.rolling_max(k_window)?;
    let k = close
        .try_sub(&lowest_low)?
        .try_div(&highest_high.try_sub(&lowest_low)?)?
        .scale(100.0);
    let d = k.rolling_mean(d_window)?;
    Ok(Stochastic { k, d })
}

/// Williams %R: `-100 * (HH - C) / (HH - LL)`, undefined on a flat range
pub fn williams_r(
    high: &Series,
    low: &Series,
    close: &Series,
    window: usize,
) -> Result<Series, IndicatorError> {
    ensure_window("williams_r", window)?;
    aligned_len(&[high, low, close])?;

    let highest_high = high.rolling_max(window)?;
    let lowest_low = low.rolling_min(window)?;
    Ok(highest_high
        .try_sub(close)?
        .try_div(&highest_high.try_sub(&lowest_low)?)?
        .scale(-100.0))
}

/// Commodity Channel Index.
///
/// `(TP - SMA(TP)) / (0.015 * mean absolute deviation of TP)`; undefined when
/// the deviation is zero.
pub fn cci(
    high: &Series,
    low: &Series,
    close: &Series,
    window: usize,
) -> Result<Series, IndicatorError> {
    ensure_window("cci", window)?;
    let tp = typical_price(high, low, close)?;
    let sma_tp = tp.rolling_mean(window)?;
    let mean_deviation = tp.rolling(window, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        Some(w.iter().map(|x| (x - mean).abs()).sum::<f64>() / w.len() as f64)
    })?;
    tp.try_sub(&sma_tp)?.try_div(&mean_deviation.scale(0.015))
}

/// Money Flow Index: RSI computed on volume-weighted typical price.
///
/// Flow counts as positive when the typical price rose from the previous row
/// and negative when it fell. A zero negative flow reads as 100, so a window
/// where the typical price never moves (no flow either way) also reports 100.
pub fn mfi(
    high: &Series,
    low: &Series,
    close: &Series,
    volume: &Series,
    window: usize,
) -> Result<Series, IndicatorError> {
    ensure_window("mfi", window)?;
    let len = aligned_len(&[high, low, close, volume])?;

    let tp = typical_price(high, low, close)?;
    let flow = tp.try_mul(volume)?;
    let prev_tp = tp.lag(1);
    let directional = |rising: bool| -> Series {
        (0..len)
            .map(|i| {
                let (now, prev, f) = (tp.get(i)?, prev_tp.get(i)?, flow.get(i)?);
                let counts = if rising { now > prev } else { now < prev };
                Some(if counts { f } else { 0.0 })
            })
            .collect()
    };

    let positive = directional(true).rolling_sum(window)?;
    let negative = directional(false).rolling_sum(window)?;
    positive.zip_with(&negative, strength_index)
}
