use crate::domain::errors::DataSourceError;
use crate::domain::market::history_period::HistoryPeriod;
use crate::domain::market::ohlcv::OhlcvTable;

/// Supplier of daily OHLCV history.
///
/// Implementations own retries and transport; callers only see the table or
/// an error. An empty table is a valid answer meaning "no usable data".
pub trait PriceDataSource: Send + Sync {
    fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<OhlcvTable, DataSourceError>;
}
