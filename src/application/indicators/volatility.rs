use super::moving_average::{ema, sma};
use super::{aligned_len, ensure_window};
use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
    /// (upper - lower) / middle
    pub width: Series,
}

/// Upper/middle/lower envelope (Keltner, Donchian)
#[derive(Debug, Clone, PartialEq)]
pub struct Channels {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Squeeze momentum output; `on` is 1.0 while Bollinger sits inside Keltner
#[derive(Debug, Clone, PartialEq)]
pub struct Squeeze {
    pub on: Series,
    pub momentum: Series,
}

/// True range: `max(H - L, |H - prevC|, |L - prevC|)`; the first row is `H - L`.
pub fn true_range(high: &Series, low: &Series, close: &Series) -> Result<Series, IndicatorError> {
    let len = aligned_len(&[high, low, close])?;
    let prev_close = close.lag(1);

    Ok((0..len)
        .map(|i| {
            let (h, l) = (high.get(i)?, low.get(i)?);
            let range = h - l;
            Some(match prev_close.get(i) {
                Some(pc) => range.max((h - pc).abs()).max((l - pc).abs()),
                None => range,
            })
        })
        .collect())
}

/// Average True Range: rolling mean of the true range
pub fn atr(
    high: &Series,
    low: &Series,
    close: &Series,
    window: usize,
) -> Result<Series, IndicatorError> {
    ensure_window("atr", window)?;
    true_range(high, low, close)?.rolling_mean(window)
}

/// Bollinger Bands: SMA(window) +- k * rolling sample std
pub fn bollinger_bands(
    data: &Series,
    window: usize,
    num_std: f64,
) -> Result<BollingerBands, IndicatorError> {
    ensure_window("bollinger", window)?;
    let middle = sma(data, window)?;
    let spread = data.rolling_std(window)?.scale(num_std);
    let upper = middle.try_add(&spread)?;
    let lower = middle.try_sub(&spread)?;
    let width = upper.try_sub(&lower)?.try_div(&middle)?;

    Ok(BollingerBands {
        upper,
        middle,
        lower,
        width,
    })
}

/// Where `close` sits inside the bands: 0 at the lower band, 1 at the upper.
/// Undefined while the bands have zero width.
pub fn band_position(close: &Series, bands: &BollingerBands) -> Result<Series, IndicatorError> {
    close
        .try_sub(&bands.lower)?
        .try_div(&bands.upper.try_sub(&bands.lower)?)
}

/// Keltner Channels: EMA(close, window) +- multiplier * ATR(atr_period)
pub fn keltner_channels(
    high: &Series,
    low: &Series,
    close: &Series,
    window: usize,
    atr_period: usize,
    multiplier: f64,
) -> Result<Channels, IndicatorError> {
    ensure_window("keltner", window)?;
    let middle = ema(close, window)?;
    let offset = atr(high, low, close, atr_period)?.scale(multiplier);

    Ok(Channels {
        upper: middle.try_add(&offset)?,
        lower: middle.try_sub(&offset)?,
        middle,
    })
}

/// Donchian Channels: highest high and lowest low over `window`
pub fn donchian_channels(
    high: &Series,
    low: &Series,
    window: usize,
) -> Result<Channels, IndicatorError> {
    ensure_window("donchian", window)?;
    aligned_len(&[high, low])?;

    let upper = high.rolling_max(window)?;
    let lower = low.rolling_min(window)?;
    let middle = upper.try_add(&lower)?.scale(0.5);
    Ok(Channels {
        upper,
        middle,
        lower,
    })
}

/// Squeeze momentum: flags consolidation where Bollinger (2 std) sits strictly
/// inside Keltner (ATR 10, multiplier 2); momentum is `close - SMA(close, bb_length)`.
pub fn squeeze_momentum(
    high: &Series,
    low: &Series,
    close: &Series,
    bb_length: usize,
    kc_length: usize,
) -> Result<Squeeze, IndicatorError> {
    let bb = bollinger_bands(close, bb_length, 2.0)?;
    let kc = keltner_channels(high, low, close, kc_length, 10, 2.0)?;

    let lower_inside = bb.lower.zip_with(&kc.lower, |b, k| f64::from(u8::from(b > k)))?;
    let upper_inside = bb.upper.zip_with(&kc.upper, |b, k| f64::from(u8::from(b < k)))?;
    let on = lower_inside.try_mul(&upper_inside)?;
    let momentum = close.try_sub(&bb.middle)?;

    Ok(Squeeze { on, momentum })
}
