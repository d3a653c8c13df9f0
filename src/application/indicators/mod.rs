//! Technical indicator library
//!
//! Pure functions from one or more aligned [`Series`] to one or more output
//! series on the same index:
//! - Moving averages (SMA, EMA)
//! - Momentum oscillators (RSI, ROC, Stochastic, Williams %R, CCI, MFI)
//! - Trend (MACD, ADX, Ichimoku, SuperTrend)
//! - Volatility (ATR, Bollinger, Keltner, Donchian, Squeeze)
//! - Volume (OBV, CMF, VWAP)
//!
//! Cells whose window reaches before the series start, or whose ratio has a
//! zero denominator, are `None`. Functions only fail on malformed input:
//! a zero window or input series of different lengths.

pub mod momentum;
pub mod moving_average;
pub mod supertrend;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{Stochastic, cci, mfi, momentum, roc, rsi, stochastic, williams_r};
pub use moving_average::{ema, sma};
pub use supertrend::{SuperTrend, SuperTrendState, TrendDirection, supertrend};
pub use trend::{Adx, Ichimoku, IchimokuParams, Macd, adx, ichimoku, macd};
pub use volatility::{
    BollingerBands, Channels, Squeeze, atr, band_position, bollinger_bands, donchian_channels,
    keltner_channels, squeeze_momentum, true_range,
};
pub use volume::{cmf, obv, vwap};

use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;

pub(crate) fn ensure_window(name: &'static str, window: usize) -> Result<(), IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow {
            name,
            value: window,
        });
    }
    Ok(())
}

/// Common length of `series`, or a mismatch error against the first one
pub(crate) fn aligned_len(series: &[&Series]) -> Result<usize, IndicatorError> {
    let len = series.first().map(|s| s.len()).unwrap_or(0);
    for s in series {
        s.ensure_len(len)?;
    }
    Ok(len)
}

/// Typical price `(high + low + close) / 3`
pub fn typical_price(
    high: &Series,
    low: &Series,
    close: &Series,
) -> Result<Series, IndicatorError> {
    aligned_len(&[high, low, close])?;
    Ok(high.try_add(low)?.try_add(close)?.scale(1.0 / 3.0))
}

/// Maps an up/down average pair onto 0-100; a zero down side reads as 100,
/// even when the up side is zero as well (no movement).
pub(crate) fn strength_index(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + up / down)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::market::series::Series;

    /// Deterministic wavy OHLCV sample with `len` rows
    pub fn sample_bars(len: usize) -> (Series, Series, Series, Series) {
        let close: Vec<f64> = (0..len)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.3).sin() + i as f64 * 0.1)
            .collect();
        let high: Vec<f64> = close
            .iter()
            .enumerate()
            .map(|(i, c)| c + 1.0 + 0.5 * (i as f64 * 0.7).cos().abs())
            .collect();
        let low: Vec<f64> = close
            .iter()
            .enumerate()
            .map(|(i, c)| c - 1.0 - 0.5 * (i as f64 * 0.5).sin().abs())
            .collect();
        let volume: Vec<f64> = (0..len).map(|i| 1_000.0 + (i % 7) as f64 * 100.0).collect();
        (
            Series::from(high),
            Series::from(low),
            Series::from(close),
            Series::from(volume),
        )
    }

    pub fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a defined value");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }
}
