//! Market regime detection
//!
//! Combines index trend, volatility-index and breadth checks into a single
//! health verdict. Price history comes from a [`PriceDataSource`] and is
//! memoized in a caller-owned [`RegimeCache`].
//!
//! [`PriceDataSource`]: crate::domain::ports::PriceDataSource

pub mod cache;
pub mod classifier;

pub use cache::{CacheKey, RegimeCache};
pub use classifier::{DEFAULT_BREADTH_TICKERS, MarketRegimeClassifier};
