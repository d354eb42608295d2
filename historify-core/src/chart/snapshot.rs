//! Chart data as published to the panes.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::params::ChartParams;
use crate::data::ApiError;

/// Bar time on the wire: Unix seconds for intraday bars, a `YYYY-MM-DD`
/// string for daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartTime {
    Unix(i64),
    Day(NaiveDate),
}

impl ChartTime {
    /// Seconds since the epoch; days count from midnight UTC.
    pub fn unix_seconds(self) -> i64 {
        match self {
            ChartTime::Unix(s) => s,
            ChartTime::Day(d) => d.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp()),
        }
    }

    /// Short axis label.
    pub fn label(self) -> String {
        match self {
            ChartTime::Day(d) => d.format("%Y-%m-%d").to_string(),
            ChartTime::Unix(s) => DateTime::<Utc>::from_timestamp(s, 0)
                .map(|dt| dt.format("%m-%d %H:%M").to_string())
                .unwrap_or_else(|| s.to_string()),
        }
    }

    fn rank(self) -> u8 {
        match self {
            ChartTime::Unix(_) => 0,
            ChartTime::Day(_) => 1,
        }
    }
}

impl Ord for ChartTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.unix_seconds()
            .cmp(&other.unix_seconds())
            .then(self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for ChartTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ChartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: ChartTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// One indicator sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub time: ChartTime,
    pub value: f64,
}

/// Immutable result of one chart-data fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSnapshot {
    params: ChartParams,
    candles: Vec<Candle>,
    moving_average: Vec<LinePoint>,
    oscillator: Vec<LinePoint>,
    fetched_at: DateTime<Utc>,
}

impl ChartSnapshot {
    /// Series are sorted by time on the way in.
    pub fn new(
        params: ChartParams,
        mut candles: Vec<Candle>,
        mut moving_average: Vec<LinePoint>,
        mut oscillator: Vec<LinePoint>,
    ) -> Self {
        candles.sort_by_key(|c| c.time);
        moving_average.sort_by_key(|p| p.time);
        oscillator.sort_by_key(|p| p.time);
        Self {
            params,
            candles,
            moving_average,
            oscillator,
            fetched_at: Utc::now(),
        }
    }

    pub fn params(&self) -> &ChartParams {
        &self.params
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn moving_average(&self) -> &[LinePoint] {
        &self.moving_average
    }

    pub fn oscillator(&self) -> &[LinePoint] {
        &self.oscillator
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// First and last bar time. Both panes fit their time axis to this so
    /// the indicator series line up under the candles.
    pub fn time_extent(&self) -> Option<(ChartTime, ChartTime)> {
        Some((self.candles.first()?.time, self.candles.last()?.time))
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

/// Body of `GET /api/charts/chart-data/...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartDataResponse {
    #[serde(default)]
    pub candlestick: Vec<Candle>,
    #[serde(default)]
    pub ema: Vec<LinePoint>,
    #[serde(default)]
    pub rsi: Vec<LinePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartDataResponse {
    /// An `error` field is a domain failure even though the transport
    /// succeeded.
    pub fn into_snapshot(self, params: ChartParams) -> Result<ChartSnapshot, ApiError> {
        if let Some(message) = self.error {
            return Err(ApiError::Domain(message));
        }
        Ok(ChartSnapshot::new(params, self.candlestick, self.ema, self.rsi))
    }
}
