//! Historify core: backtest result tables, CSV export, and the live chart
//! session, independent of any UI.

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod table;
