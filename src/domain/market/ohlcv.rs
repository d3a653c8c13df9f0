use crate::domain::errors::{FeatureError, IndicatorError};
use crate::domain::market::history_period::HistoryPeriod;
use crate::domain::market::series::Series;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Aligned OHLCV columns over a strictly increasing date index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OhlcvColumns")]
pub struct OhlcvTable {
    symbol: String,
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

/// Unchecked wire form, validated through [`OhlcvTable::new`]
#[derive(Deserialize)]
struct OhlcvColumns {
    symbol: String,
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl TryFrom<OhlcvColumns> for OhlcvTable {
    type Error = FeatureError;

    fn try_from(raw: OhlcvColumns) -> Result<Self, Self::Error> {
        Self::new(
            raw.symbol, raw.dates, raw.open, raw.high, raw.low, raw.close, raw.volume,
        )
    }
}

impl OhlcvTable {
    pub fn new(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self, FeatureError> {
        let expected = dates.len();
        for column in [&open, &high, &low, &close, &volume] {
            if column.len() != expected {
                return Err(IndicatorError::LengthMismatch {
                    expected,
                    actual: column.len(),
                }
                .into());
            }
        }
        if let Some(row) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(FeatureError::UnorderedIndex { row: row + 1 });
        }

        Ok(Self {
            symbol: symbol.into(),
            dates,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn from_bars(symbol: impl Into<String>, bars: &[DailyBar]) -> Result<Self, FeatureError> {
        Self::new(
            symbol,
            bars.iter().map(|b| b.date).collect(),
            bars.iter().map(|b| b.open).collect(),
            bars.iter().map(|b| b.high).collect(),
            bars.iter().map(|b| b.low).collect(),
            bars.iter().map(|b| b.close).collect(),
            bars.iter().map(|b| b.volume).collect(),
        )
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            dates: Vec::new(),
            open: Vec::new(),
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            volume: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn bar(&self, index: usize) -> Option<DailyBar> {
        Some(DailyBar {
            date: *self.dates.get(index)?,
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume[index],
        })
    }

    pub fn bars(&self) -> impl Iterator<Item = DailyBar> + '_ {
        (0..self.len()).filter_map(|i| self.bar(i))
    }

    /// Rows dated on or after `start`
    pub fn since(&self, start: NaiveDate) -> Self {
        let from = self.dates.partition_point(|d| *d < start);
        Self {
            symbol: self.symbol.clone(),
            dates: self.dates[from..].to_vec(),
            open: self.open[from..].to_vec(),
            high: self.high[from..].to_vec(),
            low: self.low[from..].to_vec(),
            close: self.close[from..].to_vec(),
            volume: self.volume[from..].to_vec(),
        }
    }

    /// Rows inside `period`, counted back from the last date
    pub fn within(&self, period: HistoryPeriod) -> Self {
        match self.last_date().and_then(|last| period.start_from(last)) {
            Some(start) => self.since(start),
            None => self.clone(),
        }
    }

    /// Column series in `Open, High, Low, Close, Volume` order
    pub fn columns(&self) -> [(&'static str, Series); 5] {
        [
            ("Open", Series::from(self.open.clone())),
            ("High", Series::from(self.high.clone())),
            ("Low", Series::from(self.low.clone())),
            ("Close", Series::from(self.close.clone())),
            ("Volume", Series::from(self.volume.clone())),
        ]
    }
}
