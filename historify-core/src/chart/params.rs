//! Chart session parameters and their validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MA_PERIOD: u32 = 20;
pub const DEFAULT_OSC_PERIOD: u32 = 14;
pub const MAX_MA_PERIOD: u32 = 200;
pub const MAX_OSC_PERIOD: u32 = 100;

/// Bar interval understood by the chart-data endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[default]
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "W")]
    Weekly,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::Daily,
        Timeframe::Weekly,
    ];

    /// Path segment sent to the server.
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::Daily => "D",
            Timeframe::Weekly => "W",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M1 => "1 Minute",
            Timeframe::M5 => "5 Minutes",
            Timeframe::M15 => "15 Minutes",
            Timeframe::M30 => "30 Minutes",
            Timeframe::H1 => "1 Hour",
            Timeframe::Daily => "Daily",
            Timeframe::Weekly => "Weekly",
        }
    }

    /// Bar length in seconds.
    pub fn seconds(self) -> i64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M5 => 300,
            Timeframe::M15 => 900,
            Timeframe::M30 => 1800,
            Timeframe::H1 => 3600,
            Timeframe::Daily => 86_400,
            Timeframe::Weekly => 604_800,
        }
    }

    pub fn is_intraday(self) -> bool {
        self.seconds() < 86_400
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTimeframe(s.to_string()))
    }
}

/// Exchange segment an instrument trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    #[default]
    Nse,
    Nfo,
    Bse,
    Bfo,
    Mcx,
}

impl Exchange {
    pub const ALL: [Exchange; 5] = [
        Exchange::Nse,
        Exchange::Nfo,
        Exchange::Bse,
        Exchange::Bfo,
        Exchange::Mcx,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Nfo => "NFO",
            Exchange::Bse => "BSE",
            Exchange::Bfo => "BFO",
            Exchange::Mcx => "MCX",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownExchange(s.to_string()))
    }
}

/// Raised before a request leaves the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("symbol is required")]
    EmptySymbol,

    #[error("moving-average period {value} out of range 1..={max}")]
    MovingAveragePeriod { value: u32, max: u32 },

    #[error("oscillator period {value} out of range 1..={max}")]
    OscillatorPeriod { value: u32, max: u32 },

    #[error("unknown exchange '{0}'")]
    UnknownExchange(String),

    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),
}

/// Everything a chart-data request depends on. Two requests with equal
/// params are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartParams {
    pub symbol: String,
    pub exchange: Exchange,
    pub timeframe: Timeframe,
    pub ma_period: u32,
    pub osc_period: u32,
}

impl ChartParams {
    pub fn new(symbol: impl Into<String>, exchange: Exchange) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
            timeframe: Timeframe::default(),
            ma_period: DEFAULT_MA_PERIOD,
            osc_period: DEFAULT_OSC_PERIOD,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if !(1..=MAX_MA_PERIOD).contains(&self.ma_period) {
            return Err(ValidationError::MovingAveragePeriod {
                value: self.ma_period,
                max: MAX_MA_PERIOD,
            });
        }
        if !(1..=MAX_OSC_PERIOD).contains(&self.osc_period) {
            return Err(ValidationError::OscillatorPeriod {
                value: self.osc_period,
                max: MAX_OSC_PERIOD,
            });
        }
        Ok(())
    }

    /// Same instrument and bar interval. The refresh timer is rearmed only
    /// when this changes.
    pub fn same_feed(&self, other: &ChartParams) -> bool {
        self.symbol == other.symbol
            && self.exchange == other.exchange
            && self.timeframe == other.timeframe
    }
}

impl fmt::Display for ChartParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} EMA({}) RSI({})",
            self.symbol, self.exchange, self.timeframe, self.ma_period, self.osc_period
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = ChartParams::new("RELIANCE", Exchange::default());
        assert_eq!(p.exchange, Exchange::Nse);
        assert_eq!(p.timeframe, Timeframe::Daily);
        assert_eq!((p.ma_period, p.osc_period), (20, 14));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_bad_params() {
        let mut p = ChartParams::new("  ", Exchange::Nse);
        assert_eq!(p.validate(), Err(ValidationError::EmptySymbol));
        p.symbol = "TCS".into();
        p.ma_period = 0;
        assert!(matches!(
            p.validate(),
            Err(ValidationError::MovingAveragePeriod { value: 0, .. })
        ));
        p.ma_period = 20;
        p.osc_period = 101;
        assert!(matches!(
            p.validate(),
            Err(ValidationError::OscillatorPeriod { value: 101, .. })
        ));
    }

    #[test]
    fn cycles_wrap() {
        assert_eq!(Timeframe::Weekly.next(), Timeframe::M1);
        assert_eq!(Exchange::Mcx.next(), Exchange::Nse);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("D".parse::<Timeframe>().unwrap(), Timeframe::Daily);
        assert_eq!("bse".parse::<Exchange>().unwrap(), Exchange::Bse);
        assert!("2h".parse::<Timeframe>().is_err());
        let tf: Timeframe = serde_json::from_str("\"15m\"").unwrap();
        assert_eq!(tf, Timeframe::M15);
    }

    #[test]
    fn same_feed_ignores_periods() {
        let a = ChartParams::new("INFY", Exchange::Nse);
        let mut b = a.clone();
        b.ma_period = 50;
        assert!(a.same_feed(&b));
        b.timeframe = Timeframe::H1;
        assert!(!a.same_feed(&b));
    }
}
