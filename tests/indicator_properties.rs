use featurelab::application::indicators::{
    SuperTrendState, TrendDirection, atr, bollinger_bands, ema, mfi, obv, rsi, sma, supertrend,
    williams_r,
};
use featurelab::application::indicators::supertrend::BandBar;
use featurelab::domain::errors::IndicatorError;
use featurelab::domain::market::series::Series;

fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 20.0 + 3.0 * (i as f64 * 0.45).sin() + (i as f64 * 0.13).cos())
        .collect()
}

#[test]
fn test_sma_boundaries() {
    let short = Series::from(vec![1.0, 2.0, 3.0, 4.0]);
    assert!(sma(&short, 5).unwrap().is_all_undefined());

    let exact = Series::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let out = sma(&exact, 5).unwrap();
    assert_eq!(out.defined_count(), 1);
    assert_eq!(out.get(4), Some(3.0));
}

#[test]
fn test_ema_defined_from_first_row() {
    let data = Series::from(wave(30));
    let out = ema(&data, 12).unwrap();
    assert_eq!(out.first_defined_index(), Some(0));
    assert_eq!(out.get(0), data.get(0));
    assert_eq!(out.defined_count(), 30);
}

#[test]
fn test_rsi_range_and_pure_gains() {
    let data = Series::from(wave(120));
    for v in rsi(&data, 14).unwrap().iter().flatten() {
        assert!((0.0..=100.0).contains(&v));
    }

    let rising = Series::from((0..30).map(|i| 10.0 + i as f64).collect::<Vec<_>>());
    let out = rsi(&rising, 14).unwrap();
    assert!(out.iter().flatten().all(|v| v == 100.0));
    assert!(out.defined_count() > 0);
}

#[test]
fn test_mfi_all_inflow_is_100() {
    let close: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
    let high = Series::from(close.iter().map(|c| c + 0.5).collect::<Vec<_>>());
    let low = Series::from(close.iter().map(|c| c - 0.5).collect::<Vec<_>>());
    let volume = Series::from(vec![100.0; 20]);
    let out = mfi(&high, &low, &Series::from(close), &volume, 14).unwrap();
    assert!(out.defined_count() > 0);
    assert!(out.iter().flatten().all(|v| v == 100.0));
}

#[test]
fn test_obv_non_decreasing_on_rising_close() {
    let close = Series::from(vec![5.0, 5.0, 6.0, 7.0, 7.0, 9.0, 9.5]);
    let volume = Series::from(vec![10.0, 20.0, 5.0, 40.0, 15.0, 7.0, 3.0]);
    let values: Vec<f64> = obv(&close, &volume).unwrap().iter().flatten().collect();
    assert_eq!(values.len(), 7);
    assert!(values.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_bollinger_ordering() {
    let data = Series::from(wave(90));
    let bb = bollinger_bands(&data, 20, 2.0).unwrap();
    for i in 0..90 {
        match (bb.upper.get(i), bb.middle.get(i), bb.lower.get(i)) {
            (Some(u), Some(m), Some(l)) => assert!(u >= m && m >= l),
            (None, None, None) => assert!(i < 19),
            other => panic!("partially defined bands at {i}: {other:?}"),
        }
    }
}

#[test]
fn test_zero_range_ratios_are_undefined() {
    let flat = Series::from(vec![7.0; 20]);
    assert!(williams_r(&flat, &flat, &flat, 14).unwrap().is_all_undefined());
    assert_eq!(atr(&flat, &flat, &flat, 14).unwrap().get(19), Some(0.0));
}

#[test]
fn test_window_zero_rejected() {
    let data = Series::from(wave(5));
    assert!(matches!(
        sma(&data, 0),
        Err(IndicatorError::InvalidWindow { value: 0, .. })
    ));
    assert!(rsi(&data, 0).is_err());
}

#[test]
fn test_length_mismatch_rejected() {
    let a = Series::from(wave(5));
    let b = Series::from(wave(4));
    assert!(matches!(
        obv(&a, &b),
        Err(IndicatorError::LengthMismatch { .. })
    ));
}

#[test]
fn test_supertrend_flips_only_on_band_cross() {
    let mut state = SuperTrendState::seed(&BandBar {
        close: 100.0,
        upper: 105.0,
        lower: 95.0,
    });
    let path = [
        (97.0, TrendDirection::Bullish),
        (94.0, TrendDirection::Bearish),
        (104.0, TrendDirection::Bearish),
        (106.0, TrendDirection::Bullish),
    ];
    for (close, expected) in path {
        state = state.next(&BandBar {
            close,
            upper: 105.0,
            lower: 95.0,
        });
        assert_eq!(state.direction, expected, "close {close}");
    }
}

#[test]
fn test_supertrend_direction_values() {
    let close = Series::from(wave(60));
    let high = close.map(|c| c + 0.8);
    let low = close.map(|c| c - 0.8);
    let st = supertrend(&high, &low, &close, 10, 3.0).unwrap();
    assert!(st.direction.iter().flatten().all(|d| d == 1.0 || d == -1.0));
    assert_eq!(st.value.defined_count(), st.direction.defined_count());
}
