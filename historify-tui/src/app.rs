//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here, including the live chart session. The worker
//! thread communicates via channels; responses are applied by
//! [`AppState::handle_worker_response`].

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use historify_core::chart::{
    ChartParams, ChartSession, Disposition, Exchange, FetchRequest, SessionError, MAX_MA_PERIOD,
    MAX_OSC_PERIOD,
};
use historify_core::data::ApiError;
use historify_core::domain::{
    BacktestSummary, Order, Position, PositionSummary, Trade, TradeSummary, WatchlistItem,
};
use historify_core::table::{export, ExportError, Record, Snapshot, TableView, ViewError};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Entries kept in the error history overlay.
pub const ERROR_HISTORY_CAP: usize = 50;

/// Step applied by `+`/`-` to the moving-average period.
pub const MA_STEP: u32 = 5;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Summary,
    Orders,
    Trades,
    Positions,
    Chart,
    Help,
}

impl Panel {
    pub const COUNT: usize = 6;

    pub fn index(self) -> usize {
        match self {
            Panel::Summary => 0,
            Panel::Orders => 1,
            Panel::Trades => 2,
            Panel::Positions => 3,
            Panel::Chart => 4,
            Panel::Help => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Summary),
            1 => Some(Panel::Orders),
            2 => Some(Panel::Trades),
            3 => Some(Panel::Positions),
            4 => Some(Panel::Chart),
            5 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Summary => "Summary",
            Panel::Orders => "Orders",
            Panel::Trades => "Trades",
            Panel::Positions => "Positions",
            Panel::Chart => "Chart",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Summary)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Summary)
    }

    pub fn is_table(self) -> bool {
        matches!(self, Panel::Orders | Panel::Trades | Panel::Positions)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport failure, bad status, or undecodable body.
    Network,
    /// The server answered with an error message.
    Data,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Export => "EXP",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn of(err: &ApiError) -> Self {
        if err.is_domain() {
            ErrorCategory::Data
        } else {
            ErrorCategory::Network
        }
    }
}

/// Result of an export key press.
#[derive(Debug)]
pub enum ExportOutcome {
    /// The table holds no rows; nothing was written.
    Empty,
    Saved { path: PathBuf, rows: usize },
}

/// Keys a table panel responds to, independent of its row type.
pub trait TableControls {
    fn title(&self) -> &'static str;
    fn move_column(&mut self, delta: isize);
    fn sort_selected(&mut self) -> Result<(), ViewError>;
    fn cycle_filter(&mut self) -> Result<(), ViewError>;
    fn next_page(&mut self);
    fn prev_page(&mut self);
    fn export_to(&self, dir: &Path) -> Result<ExportOutcome, ExportError>;
}

/// One results table plus its column cursor.
pub struct TablePanelState<R> {
    pub table: TableView<R>,
    /// Index into the schema's display columns.
    pub column: usize,
    pub loading: bool,
}

impl<R: Record> TablePanelState<R> {
    pub fn new() -> Self {
        Self {
            table: TableView::new(),
            column: 0,
            loading: false,
        }
    }

    pub fn selected_field(&self) -> &'static str {
        let columns = self.table.schema().columns;
        columns.get(self.column).copied().unwrap_or_default()
    }

    /// Swap in freshly fetched rows, keeping sort, filter, and cursor.
    pub fn load(&mut self, rows: Vec<R>) {
        self.table.replace_snapshot(Snapshot::new(rows));
        self.loading = false;
    }
}

impl<R: Record> Default for TablePanelState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> TableControls for TablePanelState<R> {
    fn title(&self) -> &'static str {
        self.table.schema().name
    }

    fn move_column(&mut self, delta: isize) {
        let n = self.table.schema().columns.len() as isize;
        if n == 0 {
            return;
        }
        self.column = (self.column as isize + delta).rem_euclid(n) as usize;
    }

    fn sort_selected(&mut self) -> Result<(), ViewError> {
        let field = self.selected_field();
        self.table.sort_by(field)
    }

    fn cycle_filter(&mut self) -> Result<(), ViewError> {
        self.table.cycle_filter()
    }

    fn next_page(&mut self) {
        self.table.next_page();
    }

    fn prev_page(&mut self) {
        self.table.prev_page();
    }

    fn export_to(&self, dir: &Path) -> Result<ExportOutcome, ExportError> {
        if !self.table.can_export() {
            return Ok(ExportOutcome::Empty);
        }
        let rows = self.table.filtered_sorted().len();
        let text = self.table.export_csv()?;
        let path = export::save(dir, &self.table.schema().export_file_name(), &text)?;
        Ok(ExportOutcome::Saved { path, rows })
    }
}

/// Summary panel: list of runs and the loaded run's metrics.
#[derive(Debug, Default)]
pub struct SummaryPanelState {
    pub runs: Vec<BacktestSummary>,
    pub cursor: usize,
    pub current: Option<BacktestSummary>,
    pub loading: bool,
}

/// Chart panel: the session exists only while the panel is open.
pub struct ChartPanelState {
    pub session: Option<ChartSession>,
    /// Parameters to reopen with; tracks the session while it is open.
    pub params: ChartParams,
    pub watchlist: Vec<WatchlistItem>,
    /// Inner width available to each pane.
    pub width: u16,
}

impl ChartPanelState {
    pub fn new(params: ChartParams, width: u16) -> Self {
        Self {
            session: None,
            params,
            watchlist: Vec::new(),
            width,
        }
    }

    /// Parameters currently in effect.
    pub fn current_params(&self) -> &ChartParams {
        self.session.as_ref().map_or(&self.params, |s| s.params())
    }

    /// Watchlist entry `step` places away from the current symbol.
    pub fn neighbour(&self, step: isize) -> Option<&WatchlistItem> {
        let n = self.watchlist.len() as isize;
        if n == 0 {
            return None;
        }
        let symbol = &self.current_params().symbol;
        let idx = match self.watchlist.iter().position(|w| &w.symbol == symbol) {
            Some(i) => (i as isize + step).rem_euclid(n),
            None if step >= 0 => 0,
            None => n - 1,
        };
        self.watchlist.get(idx as usize)
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Panel states
    pub backtest_id: Option<i64>,
    pub summary: SummaryPanelState,
    pub orders: TablePanelState<Order>,
    pub trades: TablePanelState<Trade>,
    pub positions: TablePanelState<Position>,
    pub chart: ChartPanelState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    // Paths
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        chart_params: ChartParams,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Summary,
            running: true,
            backtest_id: None,
            summary: SummaryPanelState::default(),
            orders: TablePanelState::new(),
            trades: TablePanelState::new(),
            positions: TablePanelState::new(),
            chart: ChartPanelState::new(chart_params, 80),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            export_dir,
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    fn send(&mut self, cmd: WorkerCommand) {
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Other,
                "background worker has stopped".into(),
                String::new(),
            );
        }
    }

    /// Initial requests: the chosen run (or the run list) and the watchlist.
    pub fn start(&mut self, backtest_id: Option<i64>) {
        self.summary.loading = true;
        self.send(WorkerCommand::LoadBacktests);
        if let Some(id) = backtest_id {
            self.load_backtest(id);
        }
        self.send(WorkerCommand::LoadWatchlist);
    }

    /// Fetch one run's summary and tables. Earlier rows stay on screen until
    /// the new ones arrive.
    pub fn load_backtest(&mut self, id: i64) {
        self.backtest_id = Some(id);
        self.summary.loading = true;
        self.orders.loading = true;
        self.trades.loading = true;
        self.positions.loading = true;
        self.set_status(format!("Loading backtest {id}..."));
        self.send(WorkerCommand::LoadBacktest { id });
    }

    pub fn reload_backtest(&mut self) {
        match self.backtest_id {
            Some(id) => self.load_backtest(id),
            None => self.set_warning("No backtest selected"),
        }
    }

    // ── Navigation ──

    /// Switch panels. Leaving the chart closes its session; entering opens one.
    pub fn set_panel(&mut self, panel: Panel) {
        if panel == self.active_panel {
            return;
        }
        if self.active_panel == Panel::Chart {
            self.close_chart();
        }
        self.active_panel = panel;
        if panel == Panel::Chart {
            self.open_chart();
        }
    }

    pub fn active_table_mut(&mut self) -> Option<&mut dyn TableControls> {
        match self.active_panel {
            Panel::Orders => Some(&mut self.orders),
            Panel::Trades => Some(&mut self.trades),
            Panel::Positions => Some(&mut self.positions),
            _ => None,
        }
    }

    pub fn select_run(&mut self, delta: isize) {
        let n = self.summary.runs.len() as isize;
        if n == 0 {
            return;
        }
        self.summary.cursor = (self.summary.cursor as isize + delta).rem_euclid(n) as usize;
    }

    pub fn load_selected_run(&mut self) {
        match self.summary.runs.get(self.summary.cursor) {
            Some(run) => {
                let id = run.id;
                self.load_backtest(id);
            }
            None => self.set_warning("No backtests available"),
        }
    }

    // ── Tables ──

    /// Apply a table key to the active table, reporting view errors as warnings.
    pub fn with_active_table(
        &mut self,
        action: impl FnOnce(&mut dyn TableControls) -> Result<(), ViewError>,
    ) {
        let Some(table) = self.active_table_mut() else {
            return;
        };
        if let Err(err) = action(table) {
            self.set_warning(err.to_string());
        }
    }

    pub fn export_active_table(&mut self) {
        let dir = self.export_dir.clone();
        let Some(table) = self.active_table_mut() else {
            return;
        };
        let title = table.title();
        match table.export_to(&dir) {
            Ok(ExportOutcome::Empty) => self.set_warning("Nothing to export"),
            Ok(ExportOutcome::Saved { path, rows }) => {
                info!(table = title, rows, path = %path.display(), "table exported");
                self.set_status(format!("Exported {rows} rows to {}", path.display()));
            }
            Err(err) => {
                warn!(table = title, error = %err, "export failed");
                self.push_error(ErrorCategory::Export, err.to_string(), title.to_string());
            }
        }
    }

    // ── Chart ──

    /// Open the chart session for the remembered parameters.
    pub fn open_chart(&mut self) {
        if self.chart.session.is_some() {
            return;
        }
        if self.chart.params.symbol.trim().is_empty() {
            if let Some(first) = self.chart.watchlist.first() {
                self.chart.params.symbol = first.symbol.clone();
                self.chart.params.exchange =
                    first.exchange.parse().unwrap_or(self.chart.params.exchange);
            }
        }
        let tx = self.worker_tx.clone();
        let fetcher = Box::new(move |request: FetchRequest| {
            if tx.send(WorkerCommand::FetchChart(request)).is_err() {
                warn!("chart fetch not sent: worker has stopped");
            }
        });
        match ChartSession::with_series_panes(self.chart.params.clone(), self.chart.width, fetcher) {
            Ok(session) => {
                self.set_status(format!("Loading {}", session.params()));
                self.chart.session = Some(session);
            }
            Err(err) => self.set_warning(err.to_string()),
        }
    }

    /// Dispose the session, remembering its parameters for the next open.
    pub fn close_chart(&mut self) {
        if let Some(mut session) = self.chart.session.take() {
            self.chart.params = session.params().clone();
            session.dispose();
        }
    }

    /// Run a session operation, reporting failures on the status line.
    fn with_session<T>(
        &mut self,
        op: impl FnOnce(&mut ChartSession) -> Result<T, SessionError>,
    ) -> Option<T> {
        let session = self.chart.session.as_mut()?;
        match op(session) {
            Ok(value) => {
                self.chart.params = session.params().clone();
                Some(value)
            }
            Err(err) => {
                self.set_warning(err.to_string());
                None
            }
        }
    }

    pub fn chart_step_symbol(&mut self, step: isize) {
        let Some(item) = self.chart.neighbour(step).cloned() else {
            self.set_warning("Watchlist is empty");
            return;
        };
        let exchange = item
            .exchange
            .parse()
            .unwrap_or(self.chart.current_params().exchange);
        if self.chart.session.is_none() {
            self.chart.params.symbol = item.symbol;
            self.chart.params.exchange = exchange;
            self.open_chart();
            return;
        }
        if let Some(Some(_)) = self.with_session(|s| s.select_instrument(&item.symbol, exchange)) {
            self.set_status(format!("Loading {} ({})", item.display_name(), exchange));
        }
    }

    pub fn chart_cycle_exchange(&mut self) {
        let next: Exchange = self.chart.current_params().exchange.next();
        self.with_session(|s| s.set_exchange(next));
    }

    pub fn chart_cycle_timeframe(&mut self) {
        let next = self.chart.current_params().timeframe.next();
        self.with_session(|s| s.set_timeframe(next));
    }

    /// Nudge the MA period by `delta` steps; out-of-range values are rejected
    /// without a request.
    pub fn chart_adjust_ma(&mut self, delta: i32) {
        let current = self.chart.current_params().ma_period as i64;
        let wanted = (current + (delta * MA_STEP as i32) as i64).clamp(0, MAX_MA_PERIOD as i64 + 1);
        self.with_session(|s| s.set_moving_average_period(wanted as u32));
    }

    pub fn chart_adjust_osc(&mut self, delta: i32) {
        let current = self.chart.current_params().osc_period as i64;
        let wanted = (current + delta as i64).clamp(0, MAX_OSC_PERIOD as i64 + 1);
        self.with_session(|s| s.set_oscillator_period(wanted as u32));
    }

    pub fn chart_refresh(&mut self) {
        if self.with_session(|s| s.manual_refresh()).is_some() {
            self.set_status("Refreshing chart...");
        }
    }

    pub fn chart_toggle_auto_refresh(&mut self) {
        if let Some(on) = self.with_session(|s| s.toggle_auto_refresh()) {
            self.set_status(if on {
                "Auto-refresh on (30s)"
            } else {
                "Auto-refresh off"
            });
        }
    }

    /// Drive timers; called once per loop iteration.
    pub fn tick(&mut self, now: Instant) {
        if let Some(session) = self.chart.session.as_mut() {
            session.tick(now);
        }
    }

    /// Terminal resized to `cols` columns.
    pub fn resize(&mut self, cols: u16) {
        // outer panel border plus the pane's own border
        self.chart.width = cols.saturating_sub(4).max(1);
        if let Some(session) = self.chart.session.as_mut() {
            session.resize(self.chart.width);
        }
    }

    // ── Worker responses ──

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Backtests(Ok(runs)) => {
                self.summary.loading = false;
                if self.backtest_id.is_none() {
                    let latest = runs
                        .iter()
                        .filter(|r| r.is_completed())
                        .max_by_key(|r| r.id)
                        .or_else(|| runs.first())
                        .map(|r| r.id);
                    match latest {
                        Some(id) => self.load_backtest(id),
                        None => self.set_warning("No backtests found"),
                    }
                }
                if let Some(pos) = self.backtest_id.and_then(|id| runs.iter().position(|r| r.id == id)) {
                    self.summary.cursor = pos;
                }
                self.summary.runs = runs;
            }
            WorkerResponse::Backtests(Err(err)) => {
                self.summary.loading = false;
                self.api_error(&err, "backtest list");
            }
            WorkerResponse::Backtest { id, result } => {
                if !self.is_current(id) {
                    return;
                }
                self.summary.loading = false;
                match result {
                    Ok(summary) => {
                        self.set_status(format!("Loaded {} ({})", summary.name, summary.status));
                        self.summary.current = Some(summary);
                    }
                    Err(err) => self.api_error(&err, &format!("backtest {id}")),
                }
            }
            WorkerResponse::Orders { id, result } => {
                if self.is_current(id) {
                    match result {
                        Ok(rows) => self.orders.load(rows),
                        Err(err) => {
                            self.orders.loading = false;
                            self.api_error(&err, "orderbook");
                        }
                    }
                }
            }
            WorkerResponse::Trades { id, result } => {
                if self.is_current(id) {
                    match result {
                        Ok(rows) => self.trades.load(rows),
                        Err(err) => {
                            self.trades.loading = false;
                            self.api_error(&err, "tradebook");
                        }
                    }
                }
            }
            WorkerResponse::Positions { id, result } => {
                if self.is_current(id) {
                    match result {
                        Ok(rows) => self.positions.load(rows),
                        Err(err) => {
                            self.positions.loading = false;
                            self.api_error(&err, "positions");
                        }
                    }
                }
            }
            WorkerResponse::Watchlist(Ok(items)) => {
                self.chart.watchlist = items;
                if self.active_panel == Panel::Chart && self.chart.session.is_none() {
                    self.open_chart();
                }
            }
            WorkerResponse::Watchlist(Err(err)) => self.api_error(&err, "watchlist"),
            WorkerResponse::Chart { request, result } => {
                let Some(session) = self.chart.session.as_mut() else {
                    debug!(id = request.id, "chart response with no open session");
                    return;
                };
                match session.complete(request.id, &request.params, result) {
                    Disposition::Published => {
                        self.set_status(format!("Chart updated: {}", request.params));
                    }
                    Disposition::Failed(err) => {
                        self.api_error(&err, &request.params.to_string());
                    }
                    Disposition::Stale | Disposition::Dropped => {}
                }
            }
        }
    }

    fn is_current(&self, id: i64) -> bool {
        let current = self.backtest_id == Some(id);
        if !current {
            debug!(id, "response for a backtest no longer shown");
        }
        current
    }

    fn api_error(&mut self, err: &ApiError, context: &str) {
        self.push_error(ErrorCategory::of(err), err.to_string(), context.to_string());
    }

    // ── Derived views ──

    pub fn trade_summary(&self) -> TradeSummary {
        TradeSummary::from_trades(self.trades.table.snapshot().records())
    }

    pub fn position_summary(&self) -> PositionSummary {
        PositionSummary::from_positions(self.positions.table.snapshot().records())
    }

    /// Dispose everything owned by the UI before exit.
    pub fn shutdown(&mut self) {
        self.close_chart();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use historify_core::chart::{SessionState, Timeframe};
    use historify_core::data::{DashboardApi, SampleApi, SAMPLE_BACKTEST_ID};

    fn app() -> (AppState, mpsc::Receiver<WorkerCommand>, mpsc::Sender<WorkerResponse>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(
            cmd_tx,
            resp_rx,
            ChartParams::new("RELIANCE", Exchange::Nse),
            PathBuf::from("."),
        );
        (app, cmd_rx, resp_tx)
    }

    fn drain(rx: &mpsc::Receiver<WorkerCommand>) -> Vec<WorkerCommand> {
        rx.try_iter().collect()
    }

    fn last_chart_request(rx: &mpsc::Receiver<WorkerCommand>) -> FetchRequest {
        drain(rx)
            .into_iter()
            .filter_map(|c| match c {
                WorkerCommand::FetchChart(r) => Some(r),
                _ => None,
            })
            .last()
            .expect("a chart fetch")
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Summary.next(), Panel::Orders);
        assert_eq!(Panel::Help.next(), Panel::Summary);
        assert_eq!(Panel::Summary.prev(), Panel::Help);
        assert_eq!(Panel::Orders.prev(), Panel::Summary);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..Panel::COUNT {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(Panel::COUNT).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _rx, _tx) = app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Error);
    }

    #[test]
    fn start_without_id_picks_latest_completed_run() {
        let (mut app, rx, _tx) = app();
        app.start(None);
        let sent = drain(&rx);
        assert!(matches!(sent[0], WorkerCommand::LoadBacktests));
        assert!(matches!(sent[1], WorkerCommand::LoadWatchlist));

        let runs = SampleApi::default().backtests().unwrap();
        app.handle_worker_response(WorkerResponse::Backtests(Ok(runs)));
        assert_eq!(app.backtest_id, Some(SAMPLE_BACKTEST_ID));
        assert!(drain(&rx)
            .iter()
            .any(|c| matches!(c, WorkerCommand::LoadBacktest { id } if *id == SAMPLE_BACKTEST_ID)));
    }

    #[test]
    fn tables_fill_from_worker() {
        let (mut app, _rx, _tx) = app();
        app.load_backtest(SAMPLE_BACKTEST_ID);
        let api = SampleApi::default();
        for resp in crate::worker::handle_command(&api, WorkerCommand::LoadBacktest { id: SAMPLE_BACKTEST_ID }) {
            app.handle_worker_response(resp);
        }
        assert_eq!(app.orders.table.snapshot().len(), 23);
        assert!(!app.orders.loading);
        assert!(app.summary.current.is_some());
        assert!(app.trade_summary().buy_count + app.trade_summary().sell_count > 0);
    }

    #[test]
    fn responses_for_other_backtest_are_ignored() {
        let (mut app, _rx, _tx) = app();
        app.load_backtest(2);
        let orders = SampleApi::default().orders(SAMPLE_BACKTEST_ID).unwrap();
        app.handle_worker_response(WorkerResponse::Orders { id: SAMPLE_BACKTEST_ID, result: Ok(orders) });
        assert!(app.orders.table.snapshot().is_empty());
    }

    #[test]
    fn failed_reload_keeps_previous_rows() {
        let (mut app, _rx, _tx) = app();
        app.load_backtest(SAMPLE_BACKTEST_ID);
        let orders = SampleApi::default().orders(SAMPLE_BACKTEST_ID).unwrap();
        app.handle_worker_response(WorkerResponse::Orders { id: SAMPLE_BACKTEST_ID, result: Ok(orders) });

        app.reload_backtest();
        app.handle_worker_response(WorkerResponse::Orders {
            id: SAMPLE_BACKTEST_ID,
            result: Err(ApiError::Transport("connection refused".into())),
        });
        assert_eq!(app.orders.table.snapshot().len(), 23);
        assert_eq!(app.error_history[0].category, ErrorCategory::Network);
    }

    #[test]
    fn column_cursor_wraps_and_sorts() {
        let mut state: TablePanelState<Order> = TablePanelState::new();
        state.move_column(-1);
        assert_eq!(state.selected_field(), "timestamp");
        state.move_column(1);
        assert_eq!(state.selected_field(), "order_id");
        state.sort_selected().unwrap();
        assert_eq!(state.table.view().sort_field(), "order_id");
    }

    #[test]
    fn unsortable_column_is_a_warning() {
        let (mut app, _rx, _tx) = app();
        app.set_panel(Panel::Positions);
        app.positions.column = 1; // "kind"
        app.with_active_table(|t| t.sort_selected());
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
    }

    #[test]
    fn positions_filter_is_rejected() {
        let (mut app, _rx, _tx) = app();
        app.set_panel(Panel::Positions);
        app.with_active_table(|t| t.cycle_filter());
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
        assert!(msg.contains("cannot be filtered"));
    }

    #[test]
    fn export_of_empty_table_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx, _tx) = app();
        app.export_dir = dir.path().join("out");
        app.set_panel(Panel::Orders);
        app.export_active_table();
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
        assert!(!app.export_dir.exists());
    }

    #[test]
    fn export_writes_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx, _tx) = app();
        app.export_dir = dir.path().to_path_buf();
        app.orders.load(SampleApi::default().orders(SAMPLE_BACKTEST_ID).unwrap());
        app.set_panel(Panel::Orders);
        app.with_active_table(|t| t.cycle_filter()); // filled
        app.export_active_table();

        let text = std::fs::read_to_string(dir.path().join("orderbook.csv")).unwrap();
        assert_eq!(text.lines().count(), 10);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Info);
    }

    #[test]
    fn chart_opens_on_enter_and_disposes_on_leave() {
        let (mut app, rx, _tx) = app();
        app.set_panel(Panel::Chart);
        let req = last_chart_request(&rx);
        assert_eq!(req.params.symbol, "RELIANCE");
        assert_eq!(app.chart.session.as_ref().unwrap().state(), SessionState::Loading);

        app.set_panel(Panel::Orders);
        assert!(app.chart.session.is_none());

        // response arriving after close is dropped quietly
        let snap = SampleApi::default().chart_data(&req.params);
        app.handle_worker_response(WorkerResponse::Chart { request: req, result: snap });
        assert!(app.error_history.is_empty());
    }

    #[test]
    fn chart_param_race_keeps_latest() {
        let (mut app, rx, _tx) = app();
        app.set_panel(Panel::Chart);
        let first = last_chart_request(&rx);
        app.chart_adjust_ma(6); // 20 -> 50
        let second = last_chart_request(&rx);
        assert_eq!(second.params.ma_period, 50);

        let api = SampleApi::default();
        let r2 = api.chart_data(&second.params);
        app.handle_worker_response(WorkerResponse::Chart { request: second, result: r2 });
        let r1 = api.chart_data(&first.params);
        app.handle_worker_response(WorkerResponse::Chart { request: first, result: r1 });

        let session = app.chart.session.as_ref().unwrap();
        assert_eq!(session.snapshot().unwrap().params().ma_period, 50);
    }

    #[test]
    fn out_of_range_period_sends_nothing() {
        let (mut app, rx, _tx) = app();
        app.set_panel(Panel::Chart);
        drain(&rx);
        app.chart_adjust_osc(200);
        assert!(drain(&rx).is_empty());
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
        assert_eq!(app.chart.current_params().osc_period, 14);
    }

    #[test]
    fn domain_error_is_recorded_as_data() {
        let (mut app, rx, _tx) = app();
        app.chart.params.symbol = "NOPE".into();
        app.set_panel(Panel::Chart);
        let req = last_chart_request(&rx);
        let result = SampleApi::default().chart_data(&req.params);
        app.handle_worker_response(WorkerResponse::Chart { request: req, result });
        assert_eq!(app.error_history[0].category, ErrorCategory::Data);
        assert_eq!(app.chart.session.as_ref().unwrap().state(), SessionState::Ready);
    }

    #[test]
    fn watchlist_stepping_switches_instrument() {
        let (mut app, rx, _tx) = app();
        app.chart.watchlist = SampleApi::default().watchlist().unwrap();
        app.set_panel(Panel::Chart);
        drain(&rx);
        app.chart_step_symbol(1);
        assert_eq!(last_chart_request(&rx).params.symbol, "TCS");
        app.chart_step_symbol(-2);
        assert_eq!(app.chart.current_params().symbol, "SBIN");
    }

    #[test]
    fn timeframe_cycle_refetches() {
        let (mut app, rx, _tx) = app();
        app.set_panel(Panel::Chart);
        drain(&rx);
        app.chart_cycle_timeframe();
        assert_eq!(last_chart_request(&rx).params.timeframe, Timeframe::Weekly);
    }

    #[test]
    fn resize_reaches_panes() {
        use historify_core::chart::Pane;
        let (mut app, _rx, _tx) = app();
        app.set_panel(Panel::Chart);
        app.resize(120);
        let session = app.chart.session.as_ref().unwrap();
        assert_eq!(session.price_pane().width(), 116);
        assert!(!session.oscillator_pane().is_disposed());
    }
}
