//! SuperTrend as an explicit two-state machine.
//!
//! The state is the current direction and the band it is riding. Each bar
//! supplies its close and the ATR bands; [`SuperTrendState::next`] is the
//! transition function and [`supertrend`] folds it over the series.

use super::volatility::atr;
use super::{aligned_len, ensure_window};
use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Bullish,
    Bearish,
}

impl TrendDirection {
    /// 1.0 for bullish, -1.0 for bearish
    pub fn as_f64(&self) -> f64 {
        match self {
            TrendDirection::Bullish => 1.0,
            TrendDirection::Bearish => -1.0,
        }
    }
}

/// Close and ATR bands of one bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandBar {
    pub close: f64,
    pub upper: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperTrendState {
    pub direction: TrendDirection,
    pub band: f64,
}

impl SuperTrendState {
    /// Initial state: bullish, riding the lower band
    pub fn seed(bar: &BandBar) -> Self {
        Self {
            direction: TrendDirection::Bullish,
            band: bar.lower,
        }
    }

    /// Direction persists until the close crosses the opposing band.
    pub fn next(self, bar: &BandBar) -> Self {
        let direction = match self.direction {
            TrendDirection::Bullish if bar.close > bar.lower => TrendDirection::Bullish,
            TrendDirection::Bullish => TrendDirection::Bearish,
            TrendDirection::Bearish if bar.close < bar.upper => TrendDirection::Bearish,
            TrendDirection::Bearish => TrendDirection::Bullish,
        };
        let band = match direction {
            TrendDirection::Bullish => bar.lower,
            TrendDirection::Bearish => bar.upper,
        };
        Self { direction, band }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperTrend {
    pub value: Series,
    /// 1.0 bullish, -1.0 bearish
    pub direction: Series,
}

/// SuperTrend over `(H + L) / 2 +- multiplier * ATR(atr_period)`.
///
/// The machine is seeded at the first row where ATR is defined; earlier rows
/// are undefined. A row with an undefined band is skipped without changing
/// the state.
pub fn supertrend(
    high: &Series,
    low: &Series,
    close: &Series,
    atr_period: usize,
    multiplier: f64,
) -> Result<SuperTrend, IndicatorError> {
    ensure_window("supertrend", atr_period)?;
    let len = aligned_len(&[high, low, close])?;

    let offset = atr(high, low, close, atr_period)?.scale(multiplier);
    let mid = high.try_add(low)?.scale(0.5);
    let upper = mid.try_add(&offset)?;
    let lower = mid.try_sub(&offset)?;

    let states: Vec<Option<SuperTrendState>> = (0..len)
        .map(|i| {
            Some(BandBar {
                close: close.get(i)?,
                upper: upper.get(i)?,
                lower: lower.get(i)?,
            })
        })
        .scan(None, |state: &mut Option<SuperTrendState>, bar| {
            Some(bar.map(|bar| {
                let next = match *state {
                    Some(prev) => prev.next(&bar),
                    None => SuperTrendState::seed(&bar),
                };
                *state = Some(next);
                next
            }))
        })
        .collect();

    Ok(SuperTrend {
        value: states.iter().map(|s| s.map(|s| s.band)).collect(),
        direction: states.iter().map(|s| s.map(|s| s.direction.as_f64())).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::indicators::test_support::sample_bars;

    fn bar(close: f64) -> BandBar {
        BandBar {
            close,
            upper: 110.0,
            lower: 90.0,
        }
    }

    #[test]
    fn test_bullish_persists_above_lower_band() {
        let state = SuperTrendState::seed(&bar(100.0));
        let next = state.next(&bar(95.0));
        assert_eq!(next.direction, TrendDirection::Bullish);
        assert_eq!(next.band, 90.0);
    }

    #[test]
    fn test_bullish_flips_on_lower_band_break() {
        let state = SuperTrendState::seed(&bar(100.0));
        let next = state.next(&bar(89.0));
        assert_eq!(next.direction, TrendDirection::Bearish);
        assert_eq!(next.band, 110.0);
    }

    #[test]
    fn test_bearish_flips_only_above_upper_band() {
        let bearish = SuperTrendState {
            direction: TrendDirection::Bearish,
            band: 110.0,
        };
        assert_eq!(bearish.next(&bar(105.0)).direction, TrendDirection::Bearish);
        let flipped = bearish.next(&bar(111.0));
        assert_eq!(flipped.direction, TrendDirection::Bullish);
        assert_eq!(flipped.band, 90.0);
    }

    #[test]
    fn test_seeded_where_atr_is_defined() {
        let (high, low, close, _) = sample_bars(80);
        let st = supertrend(&high, &low, &close, 10, 3.0).unwrap();
        assert_eq!(st.value.first_defined_index(), Some(9));
        assert_eq!(st.direction.get(9), Some(1.0));
        assert_eq!(st.direction.defined_count(), 71);
    }

    #[test]
    fn test_short_series_is_undefined() {
        let (high, low, close, _) = sample_bars(5);
        let st = supertrend(&high, &low, &close, 10, 3.0).unwrap();
        assert!(st.value.is_all_undefined());
        assert!(st.direction.is_all_undefined());
    }
}
