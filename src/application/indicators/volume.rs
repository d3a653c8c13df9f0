use super::{aligned_len, ensure_window, typical_price};
use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;

/// On Balance Volume: running total of volume signed by the close-to-close
/// direction. Unchanged closes (and the first row) contribute zero.
pub fn obv(close: &Series, volume: &Series) -> Result<Series, IndicatorError> {
    aligned_len(&[close, volume])?;
    let signed = close.diff().zip_with(volume, |delta, v| {
        if delta > 0.0 {
            v
        } else if delta < 0.0 {
            -v
        } else {
            0.0
        }
    })?;
    Ok(signed.fill_undefined(0.0).cumsum())
}

/// Chaikin Money Flow over `window`.
///
/// Each bar contributes `((C - L) - (H - C)) / (H - L) * V` (zero for a
/// zero-range bar); the rolling sum is divided by the rolling volume sum.
pub fn cmf(
    high: &Series,
    low: &Series,
    close: &Series,
    volume: &Series,
    window: usize,
) -> Result<Series, IndicatorError> {
    ensure_window("cmf", window)?;
    let len = aligned_len(&[high, low, close, volume])?;

    let flow_volume: Series = (0..len)
        .map(|i| {
            let (h, l, c, v) = (high.get(i)?, low.get(i)?, close.get(i)?, volume.get(i)?);
            let range = h - l;
            Some(if range == 0.0 {
                0.0
            } else {
                ((c - l) - (h - c)) / range * v
            })
        })
        .collect();

    flow_volume
        .rolling_sum(window)?
        .try_div(&volume.rolling_sum(window)?)
}

/// Volume Weighted Average Price accumulated from the first row
pub fn vwap(
    high: &Series,
    low: &Series,
    close: &Series,
    volume: &Series,
) -> Result<Series, IndicatorError> {
    aligned_len(&[high, low, close, volume])?;
    let tp = typical_price(high, low, close)?;
    tp.try_mul(volume)?.cumsum().try_div(&volume.cumsum())
}
