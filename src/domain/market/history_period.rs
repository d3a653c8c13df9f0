use anyhow::{Result, anyhow};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of daily history requested from a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryPeriod {
    OneMonth,
    SixMonths,
    OneYear,
    ThreeYears,
    Max,
}

impl HistoryPeriod {
    /// Number of calendar months covered, `None` for the full history
    pub fn to_months(&self) -> Option<u32> {
        match self {
            HistoryPeriod::OneMonth => Some(1),
            HistoryPeriod::SixMonths => Some(6),
            HistoryPeriod::OneYear => Some(12),
            HistoryPeriod::ThreeYears => Some(36),
            HistoryPeriod::Max => None,
        }
    }

    /// First date included when the history ends on `last`
    pub fn start_from(&self, last: NaiveDate) -> Option<NaiveDate> {
        let months = self.to_months()?;
        last.checked_sub_months(Months::new(months))
            .and_then(|d| d.succ_opt())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::ThreeYears => "3y",
            HistoryPeriod::Max => "max",
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1mo" => Ok(HistoryPeriod::OneMonth),
            "6mo" => Ok(HistoryPeriod::SixMonths),
            "1y" => Ok(HistoryPeriod::OneYear),
            "3y" => Ok(HistoryPeriod::ThreeYears),
            "max" => Ok(HistoryPeriod::Max),
            _ => Err(anyhow!(
                "Invalid period: {}. Must be '1mo', '6mo', '1y', '3y' or 'max'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_strings() {
        for period in [
            HistoryPeriod::OneMonth,
            HistoryPeriod::SixMonths,
            HistoryPeriod::OneYear,
            HistoryPeriod::ThreeYears,
            HistoryPeriod::Max,
        ] {
            assert_eq!(period.as_str().parse::<HistoryPeriod>().unwrap(), period);
        }
        assert!("2w".parse::<HistoryPeriod>().is_err());
    }

    #[test]
    fn test_start_from() {
        let last = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            HistoryPeriod::OneYear.start_from(last),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(HistoryPeriod::Max.start_from(last), None);
    }
}
