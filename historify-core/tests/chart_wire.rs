//! Decoding of the backend's JSON payloads.

use historify_core::chart::{ChartDataResponse, ChartParams, ChartTime, Exchange, Timeframe};
use historify_core::domain::{BacktestSummary, Order, Position, Trade, WatchlistItem};

#[test]
fn intraday_chart_payload() {
    let json = r#"{
        "candlestick": [
            {"time": 1719561600, "open": 100.0, "high": 101.5, "low": 99.5, "close": 101.0, "volume": 1200},
            {"time": 1719561900, "open": 101.0, "high": 102.0, "low": 100.5, "close": 100.8, "volume": 900}
        ],
        "ema": [{"time": 1719561900, "value": 100.9}],
        "rsi": [{"time": 1719561900, "value": 48.2}]
    }"#;
    let mut params = ChartParams::new("SBIN", Exchange::Nse);
    params.timeframe = Timeframe::M5;
    let resp: ChartDataResponse = serde_json::from_str(json).unwrap();
    let snap = resp.into_snapshot(params).unwrap();
    assert_eq!(snap.candles().len(), 2);
    assert_eq!(snap.time_extent(), Some((ChartTime::Unix(1719561600), ChartTime::Unix(1719561900))));
    assert_eq!(snap.oscillator()[0].value, 48.2);
    assert!(!snap.candles()[1].is_bullish());
}

#[test]
fn missing_series_default_to_empty() {
    let resp: ChartDataResponse = serde_json::from_str(r#"{"candlestick": []}"#).unwrap();
    assert!(resp.ema.is_empty() && resp.rsi.is_empty() && resp.error.is_none());
}

#[test]
fn backtest_tables_decode() {
    let orders: Vec<Order> = serde_json::from_str(
        r#"[{"id":1,"backtest_id":9,"order_id":"BT9-1","symbol":"TCS","side":"BUY",
             "order_type":"LIMIT","quantity":5,"price":3800.0,"status":"PENDING",
             "timestamp":"2024-02-01T09:15:00","filled_quantity":0,"filled_price":null}]"#,
    )
    .unwrap();
    assert_eq!(orders[0].price, Some(3800.0));

    let trades: Vec<Trade> = serde_json::from_str(
        r#"[{"id":1,"backtest_id":9,"symbol":"TCS","side":"SELL","quantity":5,"price":3850.0,
             "timestamp":"2024-02-02T10:00:00","order_id":"BT9-2","commission":1.2,"pnl":250.0}]"#,
    )
    .unwrap();
    assert_eq!(trades[0].pnl, 250.0);

    let positions: Vec<Position> = serde_json::from_str(
        r#"[{"id":1,"backtest_id":9,"symbol":"TCS","quantity":-5,"avg_price":3850.0,
             "current_price":null,"pnl":0.0,"timestamp":"2024-02-02T15:30:00"}]"#,
    )
    .unwrap();
    assert_eq!(positions[0].value(), -19250.0);

    let watchlist: Vec<WatchlistItem> = serde_json::from_str(
        r#"[{"id":1,"symbol":"TCS","name":"Tata Consultancy","exchange":"NSE",
             "added_on":"2024-01-05T12:00:00"}]"#,
    )
    .unwrap();
    assert_eq!(watchlist[0].display_name(), "Tata Consultancy");

    let run: BacktestSummary = serde_json::from_str(
        r#"{"id":9,"name":"run","strategy_name":"rsi","symbol":"TCS","exchange":"NSE",
            "start_date":"2024-01-01T00:00:00","end_date":"2024-03-01T00:00:00",
            "initial_capital":50000.0,"status":"running","results":{}}"#,
    )
    .unwrap();
    assert!(run.metrics().is_none());
}
