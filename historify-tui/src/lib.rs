//! Historify TUI: terminal results desk for backtest runs.
//!
//! Shows a run's order book, trade book, and positions as sortable,
//! filterable, paginated, exportable tables, plus a live price/RSI chart
//! for any watchlist symbol.

pub mod app;
pub mod cli;
pub mod input;
pub mod logging;
pub mod panels;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;
