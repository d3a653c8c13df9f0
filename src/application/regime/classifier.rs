use super::cache::{CacheKey, RegimeCache};
use crate::application::indicators::sma;
use crate::domain::market::history_period::HistoryPeriod;
use crate::domain::market::market_regime::{
    BreadthCheck, IndexHealth, RegimeChecks, RegimeVerdict, VixCheck,
};
use crate::domain::market::ohlcv::OhlcvTable;
use crate::domain::market::series::Series;
use crate::domain::ports::PriceDataSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Large caps across sectors used for the breadth check
pub const DEFAULT_BREADTH_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "JPM", "V", "JNJ", "WMT", "PG",
    "UNH", "MA", "HD", "BAC", "XOM", "DIS", "NFLX", "ADBE", "CRM", "COST",
];

const MIN_TREND_ROWS: usize = 200;

/// Classifies overall market health from index, VIX and breadth checks.
///
/// Source failures never abort a verdict: the affected check is reported as
/// unknown and left out of the confidence score.
pub struct MarketRegimeClassifier {
    source: Arc<dyn PriceDataSource>,
    index_tickers: Vec<String>,
    vix_ticker: String,
    breadth_tickers: Vec<String>,
}

impl std::fmt::Debug for MarketRegimeClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketRegimeClassifier")
            .field("source", &"<PriceDataSource>")
            .field("index_tickers", &self.index_tickers)
            .field("vix_ticker", &self.vix_ticker)
            .field("breadth_tickers", &self.breadth_tickers.len())
            .finish()
    }
}

impl MarketRegimeClassifier {
    pub fn new(source: Arc<dyn PriceDataSource>) -> Self {
        Self {
            source,
            index_tickers: vec!["SPY".to_string(), "QQQ".to_string()],
            vix_ticker: "^VIX".to_string(),
            breadth_tickers: DEFAULT_BREADTH_TICKERS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }

    pub fn with_breadth_tickers(mut self, tickers: Vec<String>) -> Self {
        self.breadth_tickers = tickers;
        self
    }

    pub fn breadth_tickers(&self) -> &[String] {
        &self.breadth_tickers
    }

    /// History for `ticker`, served from `cache` while fresh.
    fn fetch_cached<'c>(
        &self,
        cache: &'c mut RegimeCache,
        ticker: &str,
        period: HistoryPeriod,
        now: DateTime<Utc>,
    ) -> Option<&'c OhlcvTable> {
        let key = CacheKey::new(ticker, period);
        if cache.get(&key, now).is_none() {
            match self.source.fetch_history(ticker, period) {
                Ok(table) if !table.is_empty() => {
                    debug!("Fetched {} rows of {} ({})", table.len(), ticker, period);
                    cache.insert(key.clone(), table, now);
                }
                Ok(_) => {
                    warn!("No {} history returned for {}", period, ticker);
                    return None;
                }
                Err(e) => {
                    warn!("Failed to fetch {} history for {}: {}", period, ticker, e);
                    return None;
                }
            }
        }
        cache.get(&key, now)
    }

    /// Latest close, SMA50 and SMA200 of a table with enough history
    fn trend_levels(table: &OhlcvTable) -> Option<(f64, f64, f64)> {
        if table.len() < MIN_TREND_ROWS {
            return None;
        }
        let close = Series::from(table.close().to_vec());
        let price = close.last()?;
        let sma_50 = sma(&close, 50).ok()?.last()?;
        let sma_200 = sma(&close, MIN_TREND_ROWS).ok()?.last()?;
        Some((price, sma_50, sma_200))
    }

    /// Trend of an index against its 50 and 200 day averages (1y history)
    pub fn check_index_health(
        &self,
        cache: &mut RegimeCache,
        ticker: &str,
        now: DateTime<Utc>,
    ) -> IndexHealth {
        self.fetch_cached(cache, ticker, HistoryPeriod::OneYear, now)
            .and_then(Self::trend_levels)
            .map(|(price, sma_50, sma_200)| IndexHealth::classify(ticker, price, sma_50, sma_200))
            .unwrap_or_else(|| IndexHealth::unknown(ticker))
    }

    /// Latest volatility-index close over the last month
    pub fn check_vix(&self, cache: &mut RegimeCache, now: DateTime<Utc>) -> VixCheck {
        self.fetch_cached(cache, &self.vix_ticker, HistoryPeriod::OneMonth, now)
            .and_then(|table| Series::from(table.close().to_vec()).last())
            .map(VixCheck::classify)
            .unwrap_or_else(VixCheck::unknown)
    }

    /// Percentage of `tickers` closing above their 200-day average.
    /// Tickers without 200 rows of history are left out.
    pub fn check_market_breadth(
        &self,
        cache: &mut RegimeCache,
        tickers: &[String],
        now: DateTime<Utc>,
    ) -> BreadthCheck {
        let mut above = 0usize;
        let mut total = 0usize;
        for ticker in tickers {
            let levels = self
                .fetch_cached(cache, ticker, HistoryPeriod::OneYear, now)
                .and_then(Self::trend_levels);
            if let Some((price, _, sma_200)) = levels {
                total += 1;
                if price > sma_200 {
                    above += 1;
                }
            }
        }

        if total == 0 {
            return BreadthCheck::unknown();
        }
        BreadthCheck::classify(above as f64 / total as f64 * 100.0)
    }

    /// Runs every check and combines them into a verdict
    pub fn get_regime(
        &self,
        cache: &mut RegimeCache,
        check_breadth: bool,
        now: DateTime<Utc>,
    ) -> RegimeVerdict {
        let indices = self
            .index_tickers
            .iter()
            .map(|ticker| self.check_index_health(cache, ticker, now))
            .collect();
        let vix = self.check_vix(cache, now);
        let breadth =
            check_breadth.then(|| self.check_market_breadth(cache, &self.breadth_tickers, now));

        let verdict = RegimeVerdict::from_checks(RegimeChecks {
            indices,
            vix,
            breadth,
        });
        info!(
            "Market regime: {:?} (confidence {}%) - {}",
            verdict.regime, verdict.confidence, verdict.recommendation
        );
        verdict
    }
}
