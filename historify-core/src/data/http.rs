//! reqwest-backed client for the dashboard backend.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::provider::{ApiError, DashboardApi};
use crate::chart::{ChartDataResponse, ChartParams, ChartSnapshot};
use crate::domain::{BacktestSummary, Order, Position, Trade, WatchlistItem};

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("historify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chart_path(params: &ChartParams) -> String {
        format!(
            "/api/charts/chart-data/{}/{}/{}/{}/{}",
            params.symbol, params.exchange, params.timeframe, params.ma_period, params.osc_period
        )
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        resp.json().map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl DashboardApi for HttpApi {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn watchlist(&self) -> Result<Vec<WatchlistItem>, ApiError> {
        self.get("/api/watchlist/items")
    }

    fn backtests(&self) -> Result<Vec<BacktestSummary>, ApiError> {
        self.get("/api/backtest/results")
    }

    fn backtest(&self, id: i64) -> Result<BacktestSummary, ApiError> {
        self.get(&format!("/api/backtest/results/{id}"))
    }

    fn orders(&self, backtest_id: i64) -> Result<Vec<Order>, ApiError> {
        self.get(&format!("/api/backtest/orderbook/{backtest_id}"))
    }

    fn trades(&self, backtest_id: i64) -> Result<Vec<Trade>, ApiError> {
        self.get(&format!("/api/backtest/tradebook/{backtest_id}"))
    }

    fn positions(&self, backtest_id: i64) -> Result<Vec<Position>, ApiError> {
        self.get(&format!("/api/backtest/positions/{backtest_id}"))
    }

    fn chart_data(&self, params: &ChartParams) -> Result<ChartSnapshot, ApiError> {
        let body: ChartDataResponse = self.get(&Self::chart_path(params))?;
        body.into_snapshot(params.clone())
    }
}
