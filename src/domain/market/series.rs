use crate::domain::errors::IndicatorError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// A column of optional values aligned to a table index.
///
/// `None` marks a cell with no value yet (window not filled, shifted past the
/// series boundary, or a ratio with a zero denominator). Non-finite results are
/// always stored as `None`, so NaN and infinity never leak into a feature table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Option<f64>>);

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl Series {
    pub fn new(cells: Vec<Option<f64>>) -> Self {
        Self(cells.into_iter().map(|c| c.and_then(finite)).collect())
    }

    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self(values.into_iter().map(finite).collect())
    }

    /// A series of `len` cells with no value
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    pub fn cells(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_all_undefined(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn first_defined_index(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    /// Value of the final cell, if defined
    pub fn last(&self) -> Option<f64> {
        self.0.last().copied().flatten()
    }

    pub fn ensure_len(&self, expected: usize) -> Result<(), IndicatorError> {
        if self.len() != expected {
            return Err(IndicatorError::LengthMismatch {
                expected,
                actual: self.len(),
            });
        }
        Ok(())
    }

    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Series {
        self.map_opt(|x| Some(f(x)))
    }

    pub fn map_opt<F: Fn(f64) -> Option<f64>>(&self, f: F) -> Series {
        Self(
            self.0
                .iter()
                .map(|c| c.and_then(&f).and_then(finite))
                .collect(),
        )
    }

    pub fn zip_with<F: Fn(f64, f64) -> f64>(
        &self,
        other: &Series,
        f: F,
    ) -> Result<Series, IndicatorError> {
        self.zip_with_opt(other, |a, b| Some(f(a, b)))
    }

    /// Cell-wise combination; a cell is undefined when either input is
    pub fn zip_with_opt<F: Fn(f64, f64) -> Option<f64>>(
        &self,
        other: &Series,
        f: F,
    ) -> Result<Series, IndicatorError> {
        other.ensure_len(self.len())?;
        Ok(Self(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => f(*a, *b).and_then(finite),
                    _ => None,
                })
                .collect(),
        ))
    }

    pub fn try_add(&self, other: &Series) -> Result<Series, IndicatorError> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &Series) -> Result<Series, IndicatorError> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn try_mul(&self, other: &Series) -> Result<Series, IndicatorError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Cell-wise division; a zero denominator yields `None`
    pub fn try_div(&self, other: &Series) -> Result<Series, IndicatorError> {
        self.zip_with_opt(other, |a, b| if b == 0.0 { None } else { Some(a / b) })
    }

    pub fn scale(&self, factor: f64) -> Series {
        self.map(|x| x * factor)
    }

    /// Value from `periods` rows earlier at each position; the first
    /// `periods` cells are undefined.
    pub fn lag(&self, periods: usize) -> Series {
        let len = self.len();
        if periods >= len {
            return Self::undefined(len);
        }
        let mut cells = vec![None; len];
        cells[periods..].copy_from_slice(&self.0[..len - periods]);
        Self(cells)
    }

    /// Value from `periods` rows later at each position; the last `periods`
    /// cells are undefined.
    pub fn lead(&self, periods: usize) -> Series {
        let len = self.len();
        if periods >= len {
            return Self::undefined(len);
        }
        let mut cells = vec![None; len];
        cells[..len - periods].copy_from_slice(&self.0[periods..]);
        Self(cells)
    }

    /// One-step difference `s[t] - s[t-1]`
    pub fn diff(&self) -> Series {
        self.zip_with(&self.lag(1), |a, b| a - b)
            .unwrap_or_else(|_| Self::undefined(self.len()))
    }

    /// Fractional change over `periods` rows; undefined when the base is zero
    pub fn pct_change(&self, periods: usize) -> Series {
        self.zip_with_opt(&self.lag(periods), |now, base| {
            if base == 0.0 {
                None
            } else {
                Some(now / base - 1.0)
            }
        })
        .unwrap_or_else(|_| Self::undefined(self.len()))
    }

    /// Applies `f` to every trailing window of `window` cells.
    ///
    /// Positions before the window fills, and windows containing an undefined
    /// cell, produce `None`.
    pub fn rolling<F: Fn(&[f64]) -> Option<f64>>(
        &self,
        window: usize,
        f: F,
    ) -> Result<Series, IndicatorError> {
        if window == 0 {
            return Err(IndicatorError::InvalidWindow {
                name: "window",
                value: window,
            });
        }

        let mut out = vec![None; self.len()];
        let mut buf = Vec::with_capacity(window);
        for end in window.saturating_sub(1)..self.len() {
            buf.clear();
            buf.extend(self.0[end + 1 - window..=end].iter().map_while(|c| *c));
            if buf.len() == window {
                out[end] = f(&buf).and_then(finite);
            }
        }
        Ok(Self(out))
    }

    pub fn rolling_mean(&self, window: usize) -> Result<Series, IndicatorError> {
        self.rolling(window, |w| Some(w.iter().sum::<f64>() / w.len() as f64))
    }

    pub fn rolling_sum(&self, window: usize) -> Result<Series, IndicatorError> {
        self.rolling(window, |w| Some(w.iter().sum()))
    }

    pub fn rolling_min(&self, window: usize) -> Result<Series, IndicatorError> {
        self.rolling(window, |w| w.iter().copied().reduce(f64::min))
    }

    pub fn rolling_max(&self, window: usize) -> Result<Series, IndicatorError> {
        self.rolling(window, |w| w.iter().copied().reduce(f64::max))
    }

    /// Rolling sample standard deviation (n - 1 denominator)
    pub fn rolling_std(&self, window: usize) -> Result<Series, IndicatorError> {
        self.rolling(window, |w| finite(w.iter().std_dev()))
    }

    /// Replaces every undefined cell with `value`
    pub fn fill_undefined(&self, value: f64) -> Series {
        Self::from_values(self.0.iter().map(|c| c.unwrap_or(value)))
    }

    /// Running total; undefined cells are skipped and stay undefined
    pub fn cumsum(&self) -> Series {
        let mut total = 0.0;
        Self(
            self.0
                .iter()
                .map(|c| {
                    c.map(|x| {
                        total += x;
                        total
                    })
                })
                .collect(),
        )
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<T: IntoIterator<Item = Option<f64>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}
