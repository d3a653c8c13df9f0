use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use featurelab::application::regime::{MarketRegimeClassifier, RegimeCache};
use featurelab::domain::market::market_regime::{RegimeKind, Trend};
use featurelab::domain::market::ohlcv::OhlcvTable;
use featurelab::infrastructure::InMemoryDataSource;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap()
}

fn linear(symbol: &str, len: usize, start: f64, step: f64) -> OhlcvTable {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let closes: Vec<f64> = (0..len).map(|i| start + step * i as f64).collect();
    OhlcvTable::new(
        symbol,
        (0..len)
            .map(|i| first.checked_add_days(Days::new(i as u64)).unwrap())
            .collect(),
        closes.clone(),
        closes.iter().map(|c| c + 0.5).collect(),
        closes.iter().map(|c| c - 0.5).collect(),
        closes,
        vec![1_000_000.0; len],
    )
    .unwrap()
}

fn healthy_market() -> Vec<OhlcvTable> {
    vec![
        linear("SPY", 260, 400.0, 0.5),
        linear("QQQ", 260, 300.0, 0.4),
        linear("^VIX", 22, 14.0, 0.0),
        linear("AAPL", 260, 150.0, 0.2),
        linear("MSFT", 260, 300.0, 0.3),
    ]
}

#[test]
fn test_bull_market_verdict() {
    let classifier =
        MarketRegimeClassifier::new(Arc::new(InMemoryDataSource::from_tables(healthy_market())));
    let verdict = classifier.get_regime(&mut RegimeCache::default(), false, now());

    assert_eq!(verdict.regime, RegimeKind::Bull);
    assert_eq!(verdict.trend, Trend::Bullish);
    assert_eq!(verdict.confidence, dec!(100));
    assert!(verdict.healthy);
    assert_eq!(verdict.checks.indices.len(), 2);
}

#[test]
fn test_breadth_counts_only_available_tickers() {
    let classifier =
        MarketRegimeClassifier::new(Arc::new(InMemoryDataSource::from_tables(healthy_market())));
    let verdict = classifier.get_regime(&mut RegimeCache::default(), true, now());

    let breadth = verdict.checks.breadth.expect("breadth requested");
    assert_eq!(breadth.pct_above_200ma, Some(100.0));
    assert_eq!(breadth.healthy, Some(true));
    assert_eq!(verdict.confidence, dec!(100));
}

#[test]
fn test_bear_market_verdict() {
    let source = InMemoryDataSource::from_tables([
        linear("SPY", 260, 500.0, -0.5),
        linear("QQQ", 260, 400.0, -0.4),
        linear("^VIX", 22, 35.0, 0.0),
    ]);
    let classifier = MarketRegimeClassifier::new(Arc::new(source));
    let verdict = classifier.get_regime(&mut RegimeCache::default(), false, now());

    assert_eq!(verdict.confidence, dec!(0));
    assert_eq!(verdict.regime, RegimeKind::Bear);
    assert_eq!(verdict.trend, Trend::Bearish);
    assert!(!verdict.healthy);
}

#[test]
fn test_correction_when_one_of_four_checks_is_healthy() {
    let source = InMemoryDataSource::from_tables([
        linear("SPY", 260, 500.0, -0.5),
        linear("QQQ", 260, 100.0, 0.4),
        linear("^VIX", 22, 25.0, 0.0),
        linear("AAPL", 260, 200.0, -0.2),
    ]);
    let classifier = MarketRegimeClassifier::new(Arc::new(source))
        .with_breadth_tickers(vec!["AAPL".to_string()]);
    let verdict = classifier.get_regime(&mut RegimeCache::default(), true, now());

    assert_eq!(verdict.confidence, dec!(25));
    assert_eq!(verdict.regime, RegimeKind::Correction);
    assert_eq!(verdict.trend, Trend::Bearish);
}

#[test]
fn test_cache_is_reused_until_expiry() {
    let source = Arc::new(InMemoryDataSource::from_tables(healthy_market()));
    let classifier = MarketRegimeClassifier::new(source.clone());
    let mut cache = RegimeCache::new(Duration::minutes(30));

    classifier.get_regime(&mut cache, false, now());
    let first = source.fetch_count();
    assert_eq!(first, 3);

    classifier.get_regime(&mut cache, false, now() + Duration::minutes(10));
    assert_eq!(source.fetch_count(), first);

    classifier.get_regime(&mut cache, false, now() + Duration::minutes(45));
    assert_eq!(source.fetch_count(), first * 2);
    assert_eq!(cache.purge_expired(now() + Duration::hours(5)), 3);
}

#[test]
fn test_missing_sources_never_fail() {
    let classifier = MarketRegimeClassifier::new(Arc::new(InMemoryDataSource::new()));
    let verdict = classifier.get_regime(&mut RegimeCache::default(), true, now());
    assert_eq!(verdict.trend, Trend::Unknown);
    assert_eq!(verdict.confidence, dec!(0));
    assert!(verdict.checks.indices.iter().all(|i| i.healthy.is_none()));
}
