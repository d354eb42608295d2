//! Background worker thread: every dashboard API call runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Requests
//! are served one at a time, in arrival order.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use historify_core::chart::{ChartSnapshot, FetchRequest};
use historify_core::data::{ApiError, DashboardApi};
use historify_core::domain::{BacktestSummary, Order, Position, Trade, WatchlistItem};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// List every run, so the summary panel can offer them.
    LoadBacktests,
    /// Fetch one run's summary plus its order book, trade book, and positions.
    LoadBacktest { id: i64 },
    LoadWatchlist,
    FetchChart(FetchRequest),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Backtests(Result<Vec<BacktestSummary>, ApiError>),
    Backtest {
        id: i64,
        result: Result<BacktestSummary, ApiError>,
    },
    Orders {
        id: i64,
        result: Result<Vec<Order>, ApiError>,
    },
    Trades {
        id: i64,
        result: Result<Vec<Trade>, ApiError>,
    },
    Positions {
        id: i64,
        result: Result<Vec<Position>, ApiError>,
    },
    Watchlist(Result<Vec<WatchlistItem>, ApiError>),
    Chart {
        request: FetchRequest,
        result: Result<ChartSnapshot, ApiError>,
    },
}

/// Spawn the background worker thread around `api`.
pub fn spawn_worker(
    api: Box<dyn DashboardApi>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("historify-worker".into())
        .spawn(move || worker_loop(api, rx, tx))
}

fn worker_loop(api: Box<dyn DashboardApi>, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    debug!(api = api.name(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                for response in handle_command(api.as_ref(), cmd) {
                    if tx.send(response).is_err() {
                        // UI side is gone; nothing left to serve.
                        return;
                    }
                }
            }
        }
    }
    debug!("worker stopped");
}

/// Run one command to completion and return what the UI should see.
pub fn handle_command(api: &dyn DashboardApi, cmd: WorkerCommand) -> Vec<WorkerResponse> {
    match cmd {
        WorkerCommand::LoadBacktests => vec![WorkerResponse::Backtests(logged(
            "backtests",
            api.backtests(),
        ))],
        WorkerCommand::LoadBacktest { id } => vec![
            WorkerResponse::Backtest {
                id,
                result: logged("backtest", api.backtest(id)),
            },
            WorkerResponse::Orders {
                id,
                result: logged("orderbook", api.orders(id)),
            },
            WorkerResponse::Trades {
                id,
                result: logged("tradebook", api.trades(id)),
            },
            WorkerResponse::Positions {
                id,
                result: logged("positions", api.positions(id)),
            },
        ],
        WorkerCommand::LoadWatchlist => vec![WorkerResponse::Watchlist(logged(
            "watchlist",
            api.watchlist(),
        ))],
        WorkerCommand::FetchChart(request) => {
            let result = api.chart_data(&request.params);
            vec![WorkerResponse::Chart { request, result }]
        }
        WorkerCommand::Shutdown => Vec::new(),
    }
}

fn logged<T>(what: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(err) = &result {
        warn!(what, error = %err, "request failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use historify_core::chart::{ChartParams, Exchange};
    use historify_core::data::{SampleApi, SAMPLE_BACKTEST_ID};

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(Box::new(SampleApi::default()), cmd_rx, resp_tx).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_stops_when_sender_dropped() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(Box::new(SampleApi::default()), cmd_rx, resp_tx).unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn load_backtest_yields_four_responses() {
        let api = SampleApi::default();
        let responses = handle_command(&api, WorkerCommand::LoadBacktest { id: SAMPLE_BACKTEST_ID });
        assert_eq!(responses.len(), 4);
        assert!(matches!(responses[0], WorkerResponse::Backtest { result: Ok(_), .. }));
        match &responses[1] {
            WorkerResponse::Orders { result: Ok(orders), .. } => assert_eq!(orders.len(), 23),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn chart_response_echoes_request() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(SampleApi::default()), cmd_rx, resp_tx).unwrap();

        let request = FetchRequest {
            id: 7,
            params: ChartParams::new("TCS", Exchange::Nse),
        };
        cmd_tx.send(WorkerCommand::FetchChart(request.clone())).unwrap();
        let resp = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match resp {
            WorkerResponse::Chart { request: echoed, result } => {
                assert_eq!(echoed, request);
                assert!(!result.unwrap().is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn unknown_symbol_is_domain_error() {
        let api = SampleApi::default();
        let request = FetchRequest {
            id: 1,
            params: ChartParams::new("NOPE", Exchange::Nse),
        };
        let responses = handle_command(&api, WorkerCommand::FetchChart(request));
        match &responses[0] {
            WorkerResponse::Chart { result: Err(err), .. } => assert!(err.is_domain()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
