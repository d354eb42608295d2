//! Records served by the backtest and watchlist endpoints.

pub mod backtest;
pub mod order;
pub mod position;
pub mod trade;
pub mod watchlist;

pub use backtest::{BacktestMetrics, BacktestSummary};
pub use order::Order;
pub use position::{Position, PositionKind, PositionSummary};
pub use trade::{Trade, TradeSummary};
pub use watchlist::WatchlistItem;
