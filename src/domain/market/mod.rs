// Market data domain
pub mod feature_table;
pub mod history_period;
pub mod market_regime;
pub mod ohlcv;
pub mod series;
