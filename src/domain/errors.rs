use thiserror::Error;

/// Errors raised by indicator functions on malformed input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid window for {name}: {value} (must be >= 1)")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("Series length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Errors related to building feature tables
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unknown target method: '{method}'. Must be 'classification' or 'regression'")]
    UnknownTargetMethod { method: String },

    #[error("Column {name} not found (run the stage that produces it first)")]
    MissingColumn { name: String },

    #[error("Index out of order at row {row}: dates must be strictly increasing")]
    UnorderedIndex { row: usize },

    #[error("No target available: run create_target() first")]
    NoTarget,
}

/// Errors related to price data sources
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("No data for {ticker}")]
    NotFound { ticker: String },

    #[error("Invalid price data for {ticker}: {reason}")]
    InvalidData { ticker: String, reason: String },

    #[error("I/O failure reading {ticker}: {source}")]
    Io {
        ticker: String,
        #[source]
        source: std::io::Error,
    },
}
