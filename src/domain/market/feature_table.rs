use crate::domain::errors::FeatureError;
use crate::domain::market::ohlcv::OhlcvTable;
use crate::domain::market::series::Series;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Series,
}

/// Wide table of named columns sharing one trading-day index.
///
/// Tables are passed by value through the feature stages; adding a column
/// consumes the table and returns the extended one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    symbol: String,
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl FeatureTable {
    pub fn from_ohlcv(ohlcv: &OhlcvTable) -> Self {
        Self {
            symbol: ohlcv.symbol().to_string(),
            index: ohlcv.dates().to_vec(),
            columns: ohlcv
                .columns()
                .into_iter()
                .map(|(name, values)| Column {
                    name: name.to_string(),
                    values,
                })
                .collect(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values)
    }

    /// Like [`column`](Self::column) but reports which column is missing
    pub fn require(&self, name: &str) -> Result<&Series, FeatureError> {
        self.column(name).ok_or_else(|| FeatureError::MissingColumn {
            name: name.to_string(),
        })
    }

    /// Appends a column, replacing any existing column with the same name.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Series,
    ) -> Result<Self, FeatureError> {
        values.ensure_len(self.len())?;
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(self)
    }

    /// Appends several columns in order
    pub fn with_columns<N: Into<String>>(
        self,
        columns: impl IntoIterator<Item = (N, Series)>,
    ) -> Result<Self, FeatureError> {
        columns
            .into_iter()
            .try_fold(self, |table, (name, values)| table.with_column(name, values))
    }

    pub fn row(&self, index: usize) -> Vec<Option<f64>> {
        self.columns.iter().map(|c| c.values.get(index)).collect()
    }

    pub fn row_is_complete(&self, index: usize) -> bool {
        self.columns.iter().all(|c| c.values.get(index).is_some())
    }

    /// Copy of the table keeping only rows where every cell is defined
    pub fn drop_undefined_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.row_is_complete(i))
            .collect();

        Self {
            symbol: self.symbol.clone(),
            index: keep.iter().map(|&i| self.index[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: keep.iter().map(|&i| c.values.get(i)).collect(),
                })
                .collect(),
        }
    }
}
