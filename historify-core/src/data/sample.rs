//! Offline stand-in for the dashboard backend.
//!
//! Every series is derived from a BLAKE3 sub-seed of the request, so the same
//! request always yields the same data regardless of call order.

use std::thread;
use std::time::Duration;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{ApiError, DashboardApi};
use crate::chart::{Candle, ChartDataResponse, ChartParams, ChartSnapshot, ChartTime, LinePoint};
use crate::domain::{BacktestMetrics, BacktestSummary, Order, Position, Trade, WatchlistItem};
use crate::indicators;

pub const SAMPLE_BACKTEST_ID: i64 = 1;
const ORDER_COUNT: i64 = 23;
const INITIAL_CAPITAL: f64 = 100_000.0;

/// (symbol, name, base price)
const UNIVERSE: &[(&str, &str, f64)] = &[
    ("RELIANCE", "Reliance Industries", 2450.0),
    ("TCS", "Tata Consultancy Services", 3820.0),
    ("INFY", "Infosys", 1510.0),
    ("HDFCBANK", "HDFC Bank", 1640.0),
    ("SBIN", "State Bank of India", 610.0),
];

#[derive(Debug, Clone)]
pub struct SampleApi {
    seed: u64,
    latency: Duration,
}

impl SampleApi {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            latency: Duration::ZERO,
        }
    }

    /// Sleep before answering chart requests, to exercise in-flight races.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn rng_for(&self, scope: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(scope.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        StdRng::seed_from_u64(u64::from_le_bytes(bytes))
    }

    fn check_backtest(id: i64) -> Result<(), ApiError> {
        if id == SAMPLE_BACKTEST_ID {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("backtest {id}")))
        }
    }

    fn session_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(9, 15, 0))
            .unwrap_or_default()
    }

    fn status_for(index: i64) -> &'static str {
        match index % 5 {
            0 | 3 => "FILLED",
            1 => "PENDING",
            2 => "CANCELLED",
            _ => "REJECTED",
        }
    }

    fn build_orders(&self) -> Vec<Order> {
        let mut rng = self.rng_for("orders");
        let start = Self::session_start();
        (0..ORDER_COUNT)
            .map(|i| {
                let (symbol, _, base) = UNIVERSE[(i as usize) % UNIVERSE.len()];
                let status = Self::status_for(i);
                let market = rng.gen_bool(0.3);
                let price = (base * rng.gen_range(0.97..1.03) * 100.0).round() / 100.0;
                let quantity = rng.gen_range(1..=20) * 5;
                let filled = status == "FILLED";
                Order {
                    id: i + 1,
                    backtest_id: SAMPLE_BACKTEST_ID,
                    order_id: format!("BT{SAMPLE_BACKTEST_ID}-{:04}", i + 1),
                    symbol: symbol.to_string(),
                    side: if i % 2 == 0 { "BUY" } else { "SELL" }.to_string(),
                    order_type: if market { "MARKET" } else { "LIMIT" }.to_string(),
                    quantity,
                    price: (!market).then_some(price),
                    status: status.to_string(),
                    timestamp: start + ChronoDuration::hours(i * 7),
                    filled_quantity: if filled { quantity } else { 0 },
                    filled_price: filled.then_some(price),
                }
            })
            .collect()
    }

    fn build_trades(&self) -> Vec<Trade> {
        let mut rng = self.rng_for("trades");
        self.build_orders()
            .into_iter()
            .filter(|o| o.status == "FILLED")
            .enumerate()
            .map(|(n, o)| {
                let price = o.filled_price.unwrap_or_default();
                let notional = price * o.filled_quantity as f64;
                let pnl = if o.side == "SELL" {
                    (notional * rng.gen_range(-0.04..0.06) * 100.0).round() / 100.0
                } else {
                    0.0
                };
                Trade {
                    id: n as i64 + 1,
                    backtest_id: o.backtest_id,
                    symbol: o.symbol,
                    side: o.side,
                    quantity: o.filled_quantity,
                    price,
                    timestamp: o.timestamp + ChronoDuration::seconds(2),
                    order_id: Some(o.order_id),
                    commission: (notional * 0.0003 * 100.0).round() / 100.0,
                    pnl,
                }
            })
            .collect()
    }

    fn build_positions(&self) -> Vec<Position> {
        let mut rng = self.rng_for("positions");
        let end = Self::session_start() + ChronoDuration::days(7);
        UNIVERSE
            .iter()
            .enumerate()
            .map(|(i, &(symbol, _, base))| {
                let quantity = match i % 3 {
                    0 => rng.gen_range(1..=10) * 10,
                    1 => -rng.gen_range(1..=5) * 10,
                    _ => 0,
                };
                let avg_price = (base * rng.gen_range(0.98..1.02) * 100.0).round() / 100.0;
                let current = (base * rng.gen_range(0.95..1.05) * 100.0).round() / 100.0;
                Position {
                    id: i as i64 + 1,
                    backtest_id: SAMPLE_BACKTEST_ID,
                    symbol: symbol.to_string(),
                    quantity,
                    avg_price,
                    current_price: Some(current),
                    pnl: ((current - avg_price) * quantity as f64 * 100.0).round() / 100.0,
                    timestamp: end,
                }
            })
            .collect()
    }

    fn bar_times(timeframe_secs: i64, count: usize) -> Vec<ChartTime> {
        let last_day = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap_or_default();
        match timeframe_secs {
            s if s >= 604_800 => (0..count)
                .rev()
                .map(|k| ChartTime::Day(last_day - ChronoDuration::weeks(k as i64)))
                .collect(),
            s if s >= 86_400 => {
                let mut days = Vec::with_capacity(count);
                let mut day = last_day;
                while days.len() < count {
                    if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                        days.push(ChartTime::Day(day));
                    }
                    day -= ChronoDuration::days(1);
                }
                days.reverse();
                days
            }
            s => {
                let close = last_day
                    .and_hms_opt(15, 30, 0)
                    .map_or(0, |dt| dt.and_utc().timestamp());
                (0..count)
                    .rev()
                    .map(|k| ChartTime::Unix(close - s * k as i64))
                    .collect()
            }
        }
    }

    /// Chart body the real backend would send for `params`.
    pub fn chart_response(&self, params: &ChartParams) -> ChartDataResponse {
        let Some(&(_, _, base)) = UNIVERSE.iter().find(|(s, _, _)| *s == params.symbol) else {
            return ChartDataResponse {
                error: Some(format!(
                    "No data found for {} ({}) with {} interval",
                    params.symbol, params.exchange, params.timeframe
                )),
                ..ChartDataResponse::default()
            };
        };

        let scope = format!("chart/{}/{}/{}", params.symbol, params.exchange, params.timeframe);
        let mut rng = self.rng_for(&scope);
        let count = if params.timeframe.is_intraday() { 180 } else { 250 };
        let times = Self::bar_times(params.timeframe.seconds(), count);

        let mut close = base;
        let candlestick: Vec<Candle> = times
            .iter()
            .map(|&time| {
                let open = close;
                close = (open * (1.0 + rng.gen_range(-0.02..0.02))).max(1.0);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                Candle {
                    time,
                    open,
                    high,
                    low,
                    close,
                    volume: Some(rng.gen_range(10_000.0..500_000.0_f64).round()),
                }
            })
            .collect();

        let closes: Vec<f64> = candlestick.iter().map(|c| c.close).collect();
        let line = |values: Vec<f64>| -> Vec<LinePoint> {
            times
                .iter()
                .zip(values)
                .filter(|(_, v)| !v.is_nan())
                .map(|(&time, value)| LinePoint { time, value })
                .collect()
        };

        ChartDataResponse {
            ema: line(indicators::ema(&closes, params.ma_period as usize)),
            rsi: line(indicators::rsi(&closes, params.osc_period as usize)),
            candlestick,
            error: None,
        }
    }

    fn summary(&self) -> BacktestSummary {
        let trades = self.build_trades();
        let closed: Vec<&Trade> = trades.iter().filter(|t| t.side == "SELL").collect();
        let winning = closed.iter().filter(|t| t.pnl > 0.0).count() as i64;
        let net: f64 = trades.iter().map(|t| t.pnl - t.commission).sum();
        let final_capital = INITIAL_CAPITAL + net;
        let start = Self::session_start();

        BacktestSummary {
            id: SAMPLE_BACKTEST_ID,
            name: "EMA crossover (sample)".to_string(),
            strategy_name: "ema_crossover".to_string(),
            symbol: "RELIANCE".to_string(),
            exchange: "NSE".to_string(),
            start_date: start,
            end_date: start + ChronoDuration::days(7),
            initial_capital: INITIAL_CAPITAL,
            status: "completed".to_string(),
            results: Some(BacktestMetrics {
                total_return: Some((net / INITIAL_CAPITAL * 100.0 * 100.0).round() / 100.0),
                initial_capital: Some(INITIAL_CAPITAL),
                final_capital: Some((final_capital * 100.0).round() / 100.0),
                total_trades: Some(trades.len() as i64),
                winning_trades: Some(winning),
                losing_trades: Some(closed.len() as i64 - winning),
                win_rate: (!closed.is_empty())
                    .then(|| (winning as f64 / closed.len() as f64 * 1000.0).round() / 10.0),
                max_drawdown: Some(-3.4),
                sharpe_ratio: Some(1.12),
            }),
            created_at: Some(start),
            completed_at: Some(start + ChronoDuration::days(7)),
        }
    }
}

impl Default for SampleApi {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DashboardApi for SampleApi {
    fn name(&self) -> &str {
        "sample data"
    }

    fn watchlist(&self) -> Result<Vec<WatchlistItem>, ApiError> {
        let added_on = Self::session_start();
        Ok(UNIVERSE
            .iter()
            .enumerate()
            .map(|(i, &(symbol, name, _))| WatchlistItem {
                id: i as i64 + 1,
                symbol: symbol.to_string(),
                name: Some(name.to_string()),
                exchange: "NSE".to_string(),
                added_on,
            })
            .collect())
    }

    fn backtests(&self) -> Result<Vec<BacktestSummary>, ApiError> {
        Ok(vec![self.summary()])
    }

    fn backtest(&self, id: i64) -> Result<BacktestSummary, ApiError> {
        Self::check_backtest(id)?;
        Ok(self.summary())
    }

    fn orders(&self, backtest_id: i64) -> Result<Vec<Order>, ApiError> {
        Self::check_backtest(backtest_id)?;
        Ok(self.build_orders())
    }

    fn trades(&self, backtest_id: i64) -> Result<Vec<Trade>, ApiError> {
        Self::check_backtest(backtest_id)?;
        Ok(self.build_trades())
    }

    fn positions(&self, backtest_id: i64) -> Result<Vec<Position>, ApiError> {
        Self::check_backtest(backtest_id)?;
        Ok(self.build_positions())
    }

    fn chart_data(&self, params: &ChartParams) -> Result<ChartSnapshot, ApiError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        self.chart_response(params).into_snapshot(params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Exchange, Timeframe};

    #[test]
    fn orders_match_backtest_shape() {
        let api = SampleApi::default();
        let orders = api.orders(SAMPLE_BACKTEST_ID).unwrap();
        assert_eq!(orders.len(), 23);
        assert_eq!(orders.iter().filter(|o| o.status == "FILLED").count(), 9);
        assert!(orders.iter().filter(|o| o.is_market()).all(|o| o.price.is_none()));
    }

    #[test]
    fn trades_follow_filled_orders() {
        let api = SampleApi::default();
        let trades = api.trades(SAMPLE_BACKTEST_ID).unwrap();
        assert_eq!(trades.len(), 9);
        assert!(trades.iter().all(|t| t.order_id.is_some()));
    }

    #[test]
    fn unknown_backtest_is_not_found() {
        let api = SampleApi::default();
        assert!(matches!(api.orders(99), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn chart_is_deterministic_and_warmed_up() {
        let api = SampleApi::default();
        let params = ChartParams::new("TCS", Exchange::Nse);
        let a = api.chart_data(&params).unwrap();
        let b = api.chart_data(&params).unwrap();
        assert_eq!(a.candles(), b.candles());
        assert_eq!(a.candles().len(), 250);
        assert_eq!(a.moving_average().len(), 250 - 19);
        assert_eq!(a.oscillator().len(), 250 - 14);
        assert!(matches!(a.candles()[0].time, ChartTime::Day(_)));
    }

    #[test]
    fn intraday_uses_unix_times() {
        let api = SampleApi::default();
        let mut params = ChartParams::new("INFY", Exchange::Nse);
        params.timeframe = Timeframe::M5;
        let snap = api.chart_data(&params).unwrap();
        let (first, last) = snap.time_extent().unwrap();
        assert!(matches!(first, ChartTime::Unix(_)));
        assert_eq!(last.unix_seconds() - first.unix_seconds(), 300 * 179);
    }

    #[test]
    fn unknown_symbol_is_domain_error() {
        let api = SampleApi::default();
        let err = api
            .chart_data(&ChartParams::new("NOPE", Exchange::Nse))
            .unwrap_err();
        assert!(err.is_domain());
        assert!(err.to_string().contains("NOPE"));
    }
}
