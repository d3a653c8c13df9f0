use super::ensure_window;
use crate::domain::errors::IndicatorError;
use crate::domain::market::series::Series;

/// Simple moving average over the trailing `window` values.
///
/// The first `window - 1` cells are undefined.
pub fn sma(data: &Series, window: usize) -> Result<Series, IndicatorError> {
    ensure_window("sma", window)?;
    data.rolling_mean(window)
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`.
///
/// EMA = value * k + EMA_prev * (1 - k), seeded by the first defined value,
/// so there is no warm-up gap. Undefined input cells produce undefined output
/// and leave the running average untouched.
pub fn ema(data: &Series, span: usize) -> Result<Series, IndicatorError> {
    ensure_window("ema", span)?;
    let k = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    Ok(data
        .iter()
        .map(|cell| {
            let value = cell?;
            let next = match prev {
                Some(p) => value * k + p * (1.0 - k),
                None => value,
            };
            prev = Some(next);
            Some(next)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::indicators::test_support::assert_close;

    #[test]
    fn test_sma_short_series_is_undefined() {
        let s = Series::from(vec![1.0, 2.0]);
        assert!(sma(&s, 3).unwrap().is_all_undefined());
    }

    #[test]
    fn test_sma_exact_window_has_one_value() {
        let s = Series::from(vec![10.0, 11.0, 12.0]);
        let out = sma(&s, 3).unwrap();
        assert_eq!(out.defined_count(), 1);
        assert_close(out.get(2), 11.0);
    }

    #[test]
    fn test_ema_defined_from_first_index() {
        let s = Series::from(vec![10.0, 20.0, 30.0]);
        let out = ema(&s, 3).unwrap();
        assert_eq!(out.defined_count(), 3);
        // k = 0.5
        assert_close(out.get(0), 10.0);
        assert_close(out.get(1), 15.0);
        assert_close(out.get(2), 22.5);
    }

    #[test]
    fn test_ema_seeds_at_first_defined_value() {
        let s = Series::new(vec![None, Some(4.0), Some(8.0)]);
        let out = ema(&s, 3).unwrap();
        assert_eq!(out.get(0), None);
        assert_close(out.get(1), 4.0);
        assert_close(out.get(2), 6.0);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let s = Series::from(vec![1.0]);
        assert_eq!(
            sma(&s, 0),
            Err(IndicatorError::InvalidWindow {
                name: "sma",
                value: 0
            })
        );
        assert!(ema(&s, 0).is_err());
    }

    #[test]
    fn test_empty_input() {
        let s = Series::default();
        assert!(sma(&s, 5).unwrap().is_empty());
        assert!(ema(&s, 5).unwrap().is_empty());
    }
}
