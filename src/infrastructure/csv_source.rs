use crate::domain::errors::DataSourceError;
use crate::domain::market::history_period::HistoryPeriod;
use crate::domain::market::ohlcv::{DailyBar, OhlcvTable};
use crate::domain::ports::PriceDataSource;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One row of a daily price export; extra columns are ignored
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: Option<f64>,
}

impl PriceRecord {
    /// Missing prices become NaN and surface as undefined cells downstream
    fn into_bar(self) -> Result<DailyBar, String> {
        // Timestamps such as `2024-01-02 00:00:00-05:00` keep only the date
        let day = self.date.get(..10).unwrap_or(&self.date);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| format!("bad date '{}': {}", self.date, e))?;
        Ok(DailyBar {
            date,
            open: self.open.unwrap_or(f64::NAN),
            high: self.high.unwrap_or(f64::NAN),
            low: self.low.unwrap_or(f64::NAN),
            close: self.close.unwrap_or(f64::NAN),
            volume: self.volume.unwrap_or(f64::NAN),
        })
    }
}

/// Parses a `Date,Open,High,Low,Close,Volume` CSV into a table for `symbol`
pub fn read_ohlcv_csv<R: Read>(reader: R, symbol: &str) -> Result<OhlcvTable, DataSourceError> {
    let invalid = |reason: String| DataSourceError::InvalidData {
        ticker: symbol.to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let bars = rdr
        .deserialize::<PriceRecord>()
        .enumerate()
        .map(|(i, record)| {
            record
                .map_err(|e| invalid(format!("row {}: {}", i + 1, e)))?
                .into_bar()
                .map_err(|reason| invalid(format!("row {}: {}", i + 1, reason)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    OhlcvTable::from_bars(symbol, &bars).map_err(|e| invalid(e.to_string()))
}

/// Reads `<dir>/<TICKER>.csv` files
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }
}

impl PriceDataSource for CsvDataSource {
    fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<OhlcvTable, DataSourceError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataSourceError::NotFound {
                ticker: ticker.to_string(),
            });
        }
        let file = File::open(&path).map_err(|source| DataSourceError::Io {
            ticker: ticker.to_string(),
            source,
        })?;

        let table = read_ohlcv_csv(BufReader::new(file), ticker)?.within(period);
        debug!(
            "CsvDataSource: loaded {} rows for {} ({}) from {}",
            table.len(),
            ticker,
            period,
            path.display()
        );
        Ok(table)
    }
}
