use crate::domain::errors::FeatureError;
use crate::domain::market::series::Series;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the forward return is turned into a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetMethod {
    Classification,
    Regression,
}

impl fmt::Display for TargetMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetMethod::Classification => write!(f, "classification"),
            TargetMethod::Regression => write!(f, "regression"),
        }
    }
}

impl FromStr for TargetMethod {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classification" => Ok(TargetMethod::Classification),
            "regression" => Ok(TargetMethod::Regression),
            _ => Err(FeatureError::UnknownTargetMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TargetMethod {
    type Error = FeatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetMethod> for String {
    fn from(method: TargetMethod) -> Self {
        method.to_string()
    }
}

/// Target construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpec {
    /// Rows ahead to look (1 = next day)
    pub horizon: usize,
    /// Minimum absolute return for a Buy/Sell label (0.02 = 2%)
    pub threshold: f64,
    pub method: TargetMethod,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            horizon: 1,
            threshold: 0.02,
            method: TargetMethod::Classification,
        }
    }
}

impl TargetSpec {
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.horizon == 0 {
            return Err(FeatureError::InvalidParameter {
                name: "horizon",
                reason: "must be >= 1, got 0".to_string(),
            });
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(FeatureError::InvalidParameter {
                name: "threshold",
                reason: format!("must be a non-negative fraction, got {}", self.threshold),
            });
        }
        Ok(())
    }
}

/// Classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Sell = -1,
    Hold = 0,
    Buy = 1,
}

impl Label {
    pub fn from_return(future_return: f64, threshold: f64) -> Self {
        if future_return > threshold {
            Label::Buy
        } else if future_return < -threshold {
            Label::Sell
        } else {
            Label::Hold
        }
    }

    pub fn as_f64(&self) -> f64 {
        *self as i8 as f64
    }

    pub fn from_f64(value: f64) -> Option<Self> {
        match value {
            v if v == 1.0 => Some(Label::Buy),
            v if v == 0.0 => Some(Label::Hold),
            v if v == -1.0 => Some(Label::Sell),
            _ => None,
        }
    }
}

/// Label counts over the rows that have a defined target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub buy: usize,
    pub hold: usize,
    pub sell: usize,
}

impl LabelDistribution {
    pub fn from_labels(target: &Series) -> Self {
        target
            .iter()
            .flatten()
            .filter_map(Label::from_f64)
            .fold(Self::default(), |mut dist, label| {
                match label {
                    Label::Buy => dist.buy += 1,
                    Label::Hold => dist.hold += 1,
                    Label::Sell => dist.sell += 1,
                }
                dist
            })
    }

    pub fn total(&self) -> usize {
        self.buy + self.hold + self.sell
    }

    pub fn count(&self, label: Label) -> usize {
        match label {
            Label::Buy => self.buy,
            Label::Hold => self.hold,
            Label::Sell => self.sell,
        }
    }

    /// Share of `label` in percent, 0 when there are no labels
    pub fn percentage(&self, label: Label) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(label) as f64 / total as f64 * 100.0,
        }
    }
}
