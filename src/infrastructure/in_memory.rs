use crate::domain::errors::DataSourceError;
use crate::domain::market::history_period::HistoryPeriod;
use crate::domain::market::ohlcv::OhlcvTable;
use crate::domain::ports::PriceDataSource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves preloaded tables; unknown tickers are `NotFound`.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    tables: HashMap<String, OhlcvTable>,
    fetches: AtomicUsize,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: impl IntoIterator<Item = OhlcvTable>) -> Self {
        let mut source = Self::new();
        for table in tables {
            source.insert(table);
        }
        source
    }

    /// Adds or replaces the table for its symbol
    pub fn insert(&mut self, table: OhlcvTable) {
        self.tables.insert(table.symbol().to_string(), table);
    }

    /// Number of `fetch_history` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl PriceDataSource for InMemoryDataSource {
    fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<OhlcvTable, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.tables
            .get(ticker)
            .map(|table| table.within(period))
            .ok_or_else(|| DataSourceError::NotFound {
                ticker: ticker.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::ohlcv::DailyBar;
    use chrono::NaiveDate;

    #[test]
    fn test_serves_known_tickers() {
        let bar = DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        };
        let source =
            InMemoryDataSource::from_tables([OhlcvTable::from_bars("SPY", &[bar]).unwrap()]);

        assert_eq!(
            source
                .fetch_history("SPY", HistoryPeriod::OneYear)
                .unwrap()
                .len(),
            1
        );
        assert!(matches!(
            source.fetch_history("QQQ", HistoryPeriod::OneYear),
            Err(DataSourceError::NotFound { .. })
        ));
        assert_eq!(source.fetch_count(), 2);
    }
}
