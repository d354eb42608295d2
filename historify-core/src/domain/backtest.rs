//! Backtest run header and its performance metrics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Metrics computed by the backtest engine. The server sends `{}` for runs
/// that have not completed, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    #[serde(default)]
    pub total_return: Option<f64>,
    #[serde(default)]
    pub initial_capital: Option<f64>,
    #[serde(default)]
    pub final_capital: Option<f64>,
    #[serde(default)]
    pub total_trades: Option<i64>,
    #[serde(default)]
    pub winning_trades: Option<i64>,
    #[serde(default)]
    pub losing_trades: Option<i64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub max_drawdown: Option<f64>,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
}

impl BacktestMetrics {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One run from `GET /api/backtest/results[/{id}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub id: i64,
    pub name: String,
    pub strategy_name: String,
    pub symbol: String,
    pub exchange: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub initial_capital: f64,
    /// pending, running, completed, or failed.
    pub status: String,
    #[serde(default)]
    pub results: Option<BacktestMetrics>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

impl BacktestSummary {
    /// Metrics, if the run produced any.
    pub fn metrics(&self) -> Option<&BacktestMetrics> {
        self.results.as_ref().filter(|m| !m.is_empty())
    }

    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN: &str = r#"{
        "id": 4, "name": "EMA cross", "strategy_name": "ema_crossover",
        "symbol": "RELIANCE", "exchange": "NSE",
        "start_date": "2023-01-01T00:00:00", "end_date": "2023-12-31T00:00:00",
        "initial_capital": 100000.0, "status": "completed",
        "results": {"total_return": 12.5, "total_trades": 18, "win_rate": 55.6,
                    "max_drawdown": -8.2, "sharpe_ratio": 1.31}
    }"#;

    #[test]
    fn decodes_completed_run() {
        let run: BacktestSummary = serde_json::from_str(RUN).unwrap();
        assert!(run.is_completed());
        let m = run.metrics().unwrap();
        assert_eq!(m.total_trades, Some(18));
        assert_eq!(m.final_capital, None);
    }

    #[test]
    fn empty_results_object_means_no_metrics() {
        let json = RUN.replace(
            r#"{"total_return": 12.5, "total_trades": 18, "win_rate": 55.6,
                    "max_drawdown": -8.2, "sharpe_ratio": 1.31}"#,
            "{}",
        );
        let run: BacktestSummary = serde_json::from_str(&json).unwrap();
        assert!(run.results.is_some());
        assert!(run.metrics().is_none());
    }
}
