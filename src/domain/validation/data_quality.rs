use crate::domain::market::ohlcv::{DailyBar, OhlcvTable};
use tracing::warn;

/// Checks daily bars for physically impossible values.
///
/// Violations are reported, never repaired: the feature pipeline still runs
/// and any affected ratio resolves to an undefined cell.
pub struct BarValidator;

impl BarValidator {
    /// Returns true when the bar's prices are consistent with each other.
    pub fn validate_bar(bar: &DailyBar) -> bool {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite()) || !bar.volume.is_finite() {
            return false;
        }
        if bar.low > bar.high {
            return false;
        }
        if bar.high < bar.open || bar.high < bar.close {
            return false;
        }
        if bar.low > bar.open || bar.low > bar.close {
            return false;
        }
        bar.volume >= 0.0
    }

    /// Indices of rows that fail [`validate_bar`](Self::validate_bar), logging each one.
    pub fn inconsistent_rows(table: &OhlcvTable) -> Vec<usize> {
        table
            .bars()
            .enumerate()
            .filter(|(_, bar)| !Self::validate_bar(bar))
            .map(|(i, bar)| {
                warn!(
                    "Data quality: {} bar on {} is inconsistent (O={} H={} L={} C={} V={})",
                    table.symbol(),
                    bar.date,
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                );
                i
            })
            .collect()
    }
}
