//! Full-frame rendering against the offline sample API.

use std::path::PathBuf;
use std::sync::mpsc;

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

use historify_core::chart::{ChartParams, Exchange};
use historify_core::data::SampleApi;
use historify_tui::app::{AppState, ErrorCategory, Overlay, Panel};
use historify_tui::ui;
use historify_tui::worker::{handle_command, WorkerCommand};

/// App whose worker commands are served synchronously by `SampleApi`.
struct Harness {
    app: AppState,
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    api: SampleApi,
}

impl Harness {
    fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(
            cmd_tx,
            resp_rx,
            ChartParams::new("", Exchange::Nse),
            PathBuf::from("exports"),
        );
        Self {
            app,
            cmd_rx,
            api: SampleApi::default(),
        }
    }

    /// Serve every queued command, including ones issued while applying responses.
    fn pump(&mut self) {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            for resp in handle_command(&self.api, cmd) {
                self.app.handle_worker_response(resp);
            }
        }
    }

    fn render(&self) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| ui::draw(f, &self.app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }
}

fn buffer_text(buf: &Buffer) -> String {
    let mut s = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            s.push_str(buf.cell((x, y)).unwrap().symbol());
        }
        s.push('\n');
    }
    s
}

#[test]
fn startup_loads_run_and_books() {
    let mut h = Harness::new();
    h.app.start(None);
    h.pump();

    assert!(h.app.summary.current.is_some());
    assert_eq!(h.app.orders.table.snapshot().len(), 23);
    assert!(!h.app.chart.watchlist.is_empty());

    let screen = h.render();
    assert!(screen.contains("Summary [1]"));
    assert!(screen.contains("Performance"));
}

#[test]
fn each_panel_renders() {
    let mut h = Harness::new();
    h.app.start(None);
    h.pump();

    for (panel, needle) in [
        (Panel::Orders, "orderbook (23 rows)"),
        (Panel::Trades, "tradebook"),
        (Panel::Positions, "positions"),
        (Panel::Help, "Global Navigation"),
    ] {
        h.app.set_panel(panel);
        let screen = h.render();
        assert!(screen.contains(needle), "{panel:?} missing {needle}");
    }
}

#[test]
fn chart_panel_draws_both_panes() {
    let mut h = Harness::new();
    h.app.start(None);
    h.pump();
    h.app.resize(140);
    h.app.set_panel(Panel::Chart);
    h.pump();

    let session = h.app.chart.session.as_ref().unwrap();
    assert!(session.snapshot().is_some());
    let screen = h.render();
    assert!(screen.contains("RELIANCE D EMA(20)"));
    assert!(screen.contains("RSI(14)"));
    assert!(screen.contains("ready"));
}

#[test]
fn failed_switch_keeps_published_labels() {
    let mut h = Harness::new();
    h.app.start(None);
    h.pump();
    h.app.resize(140);
    h.app.set_panel(Panel::Chart);
    h.pump();

    let session = h.app.chart.session.as_mut().unwrap();
    session.select_instrument("NOPE", Exchange::Nse).unwrap();
    h.pump();

    let session = h.app.chart.session.as_ref().unwrap();
    assert_eq!(session.params().symbol, "NOPE");
    assert!(session.last_error().is_some());
    assert_eq!(session.snapshot().unwrap().params().symbol, "RELIANCE");

    let screen = h.render();
    assert!(screen.contains("RELIANCE D EMA(20)"));
    assert!(!screen.contains("NOPE D EMA"));
}

#[test]
fn pending_period_change_keeps_published_labels() {
    let mut h = Harness::new();
    h.app.start(None);
    h.pump();
    h.app.resize(140);
    h.app.set_panel(Panel::Chart);
    h.pump();

    let session = h.app.chart.session.as_mut().unwrap();
    session.set_moving_average_period(50).unwrap();
    session.set_oscillator_period(21).unwrap();

    let screen = h.render();
    assert!(screen.contains("loading..."));
    assert!(screen.contains("RELIANCE D EMA(20)"));
    assert!(screen.contains("RSI(14)"));

    h.pump();
    let screen = h.render();
    assert!(screen.contains("RELIANCE D EMA(50)"));
    assert!(screen.contains("RSI(21)"));
}

#[test]
fn chart_without_symbol_explains_itself() {
    let mut h = Harness::new();
    h.app.set_panel(Panel::Chart);
    assert!(h.app.chart.session.is_none());
    assert!(h.render().contains("No chart open"));
}

#[test]
fn error_overlay_lists_history() {
    let mut h = Harness::new();
    h.app.push_error(ErrorCategory::Network, "connection refused".into(), "orderbook".into());
    h.app.overlay = Overlay::ErrorHistory;
    let screen = h.render();
    assert!(screen.contains("Error History (1)"));
    assert!(screen.contains("[NET] connection refused"));
}
