use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a market gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
    Unknown,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Neutral => write!(f, "neutral"),
            Trend::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VixStatus {
    Low,
    Normal,
    Elevated,
    Extreme,
    Unknown,
}

/// Overall market regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeKind {
    Bull,
    Neutral,
    Correction,
    Bear,
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegimeKind::Bull => write!(f, "BULL"),
            RegimeKind::Neutral => write!(f, "NEUTRAL"),
            RegimeKind::Correction => write!(f, "CORRECTION"),
            RegimeKind::Bear => write!(f, "BEAR"),
        }
    }
}

impl RegimeKind {
    /// Maps a 0-100 confidence score onto a regime
    pub fn from_confidence(confidence: Decimal) -> Self {
        if confidence >= dec!(75) {
            RegimeKind::Bull
        } else if confidence >= dec!(50) {
            RegimeKind::Neutral
        } else if confidence >= dec!(25) {
            RegimeKind::Correction
        } else {
            RegimeKind::Bear
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, RegimeKind::Bull | RegimeKind::Neutral)
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RegimeKind::Bull => "BUY signals are valid",
            RegimeKind::Neutral => "BUY signals valid with caution",
            RegimeKind::Correction => "WAIT - Market correction in progress",
            RegimeKind::Bear => "WAIT - Bear market conditions",
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            RegimeKind::Bull => Trend::Bullish,
            RegimeKind::Neutral => Trend::Neutral,
            RegimeKind::Correction | RegimeKind::Bear => Trend::Bearish,
        }
    }
}

/// Trend check of a major index against its 50/200-day averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHealth {
    pub ticker: String,
    pub healthy: Option<bool>,
    pub trend: Trend,
    pub price: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub reason: String,
}

impl IndexHealth {
    pub fn unknown(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            healthy: None,
            trend: Trend::Unknown,
            price: None,
            sma_50: None,
            sma_200: None,
            reason: "Could not fetch index data".to_string(),
        }
    }

    pub fn classify(ticker: &str, price: f64, sma_50: f64, sma_200: f64) -> Self {
        let above_50 = price > sma_50;
        let above_200 = price > sma_200;
        let ma_aligned = sma_50 > sma_200;

        let (trend, healthy, reason) = if above_50 && above_200 && ma_aligned {
            (
                Trend::Bullish,
                true,
                format!("{} above 50 & 200 MA (uptrend)", ticker),
            )
        } else if !above_200 {
            (
                Trend::Bearish,
                false,
                format!("{} below 200 MA (downtrend)", ticker),
            )
        } else {
            (Trend::Neutral, true, format!("{} mixed signals", ticker))
        };

        Self {
            ticker: ticker.to_string(),
            healthy: Some(healthy),
            trend,
            price: Some(price),
            sma_50: Some(sma_50),
            sma_200: Some(sma_200),
            reason,
        }
    }
}

/// Volatility-index ("fear gauge") check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VixCheck {
    pub level: Option<f64>,
    pub status: VixStatus,
    pub healthy: Option<bool>,
    pub reason: String,
}

impl VixCheck {
    pub fn unknown() -> Self {
        Self {
            level: None,
            status: VixStatus::Unknown,
            healthy: None,
            reason: "Could not fetch VIX data".to_string(),
        }
    }

    pub fn classify(level: f64) -> Self {
        let (status, healthy, label) = if level < 15.0 {
            (VixStatus::Low, true, "low fear - healthy")
        } else if level < 20.0 {
            (VixStatus::Normal, true, "normal - healthy")
        } else if level < 30.0 {
            (VixStatus::Elevated, false, "elevated fear - caution")
        } else {
            (VixStatus::Extreme, false, "extreme fear - danger")
        };

        Self {
            level: Some(level),
            status,
            healthy: Some(healthy),
            reason: format!("VIX {:.1} ({})", level, label),
        }
    }
}

/// Share of a stock universe trading above its 200-day average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthCheck {
    pub pct_above_200ma: Option<f64>,
    pub healthy: Option<bool>,
    pub reason: String,
}

impl BreadthCheck {
    pub fn unknown() -> Self {
        Self {
            pct_above_200ma: None,
            healthy: None,
            reason: "Could not calculate breadth".to_string(),
        }
    }

    pub fn classify(pct: f64) -> Self {
        let (healthy, label) = if pct > 60.0 {
            (true, "strong breadth")
        } else if pct > 40.0 {
            (true, "neutral")
        } else {
            (false, "weak breadth")
        };

        Self {
            pct_above_200ma: Some(pct),
            healthy: Some(healthy),
            reason: format!("{:.0}% stocks above 200 MA ({})", pct, label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeChecks {
    pub indices: Vec<IndexHealth>,
    pub vix: VixCheck,
    pub breadth: Option<BreadthCheck>,
}

impl RegimeChecks {
    /// Health flags of every check that produced a verdict
    pub fn known_health(&self) -> Vec<bool> {
        self.indices
            .iter()
            .map(|i| i.healthy)
            .chain(std::iter::once(self.vix.healthy))
            .chain(self.breadth.iter().map(|b| b.healthy))
            .flatten()
            .collect()
    }
}

/// Combined market-health verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeVerdict {
    pub regime: RegimeKind,
    pub trend: Trend,
    pub healthy: bool,
    pub confidence: Decimal, // 0 to 100
    pub checks: RegimeChecks,
    pub recommendation: String,
}

impl RegimeVerdict {
    pub fn from_checks(checks: RegimeChecks) -> Self {
        let known = checks.known_health();
        let confidence = if known.is_empty() {
            Decimal::ZERO
        } else {
            let healthy = known.iter().filter(|h| **h).count();
            (Decimal::from(healthy) * dec!(100) / Decimal::from(known.len())).round_dp(2)
        };

        let regime = RegimeKind::from_confidence(confidence);
        let trend = if known.is_empty() {
            Trend::Unknown
        } else {
            regime.trend()
        };

        Self {
            regime,
            trend,
            healthy: regime.is_healthy(),
            confidence,
            recommendation: regime.recommendation().to_string(),
            checks,
        }
    }
}
