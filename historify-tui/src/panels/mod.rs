//! Widgets drawn inside the panels.
//!
//! - RecordTable: schema-driven results table (orders, trades, positions)
//! - PricePane: candles with the moving-average overlay
//! - OscillatorPane: RSI line with 30/70 guides
//! - Metrics: backtest summary card

pub mod metrics;
pub mod oscillator_pane;
pub mod price_pane;
pub mod record_table;

pub use metrics::MetricsPanel;
pub use oscillator_pane::OscillatorPanePanel;
pub use price_pane::PricePanePanel;
pub use record_table::RecordTablePanel;
