//! Dashboard API trait and structured error types.
//!
//! `DashboardApi` abstracts over the HTTP backend and the offline sample
//! data so the worker thread and tests can swap implementations.

use thiserror::Error;

use crate::chart::{ChartParams, ChartSnapshot};
use crate::domain::{BacktestSummary, Order, Position, Trade, WatchlistItem};

/// Failures from the dashboard backend.
///
/// Everything except `Domain` is a remote failure: the request never
/// produced a usable body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered, and the answer is an error message.
    #[error("{0}")]
    Domain(String),
}

impl ApiError {
    pub fn is_domain(&self) -> bool {
        matches!(self, ApiError::Domain(_))
    }
}

pub trait DashboardApi: Send {
    /// Human-readable name shown in the status bar.
    fn name(&self) -> &str;

    fn watchlist(&self) -> Result<Vec<WatchlistItem>, ApiError>;

    fn backtests(&self) -> Result<Vec<BacktestSummary>, ApiError>;

    fn backtest(&self, id: i64) -> Result<BacktestSummary, ApiError>;

    fn orders(&self, backtest_id: i64) -> Result<Vec<Order>, ApiError>;

    fn trades(&self, backtest_id: i64) -> Result<Vec<Trade>, ApiError>;

    fn positions(&self, backtest_id: i64) -> Result<Vec<Position>, ApiError>;

    fn chart_data(&self, params: &ChartParams) -> Result<ChartSnapshot, ApiError>;
}
