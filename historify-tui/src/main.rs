//! Historify TUI: six-panel terminal interface with vim-style navigation.
//!
//! Panels:
//! 1. Summary: backtest runs and the loaded run's metrics
//! 2. Orders: order book
//! 3. Trades: trade book
//! 4. Positions: open positions
//! 5. Chart: candles + EMA, RSI, auto-refresh
//! 6. Help: keyboard shortcuts

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use historify_core::config::DashboardConfig;
use historify_core::data::{DashboardApi, HttpApi, SampleApi};

use historify_tui::app::AppState;
use historify_tui::cli::Cli;
use historify_tui::worker::{self, WorkerCommand};
use historify_tui::{input, logging, ui};

/// Artificial latency for `--demo`, so loading states are visible.
const DEMO_LATENCY: Duration = Duration::from_millis(150);

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path();
    let mut config = DashboardConfig::load(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    cli.apply(&mut config);

    let _log_guard = logging::init(&config.logging)?;
    info!(config = %config_path.display(), demo = cli.demo, "historify starting");

    let api: Box<dyn DashboardApi> = if cli.demo {
        Box::new(SampleApi::default().with_latency(DEMO_LATENCY))
    } else {
        Box::new(
            HttpApi::new(&config.api.base_url, config.api.timeout())
                .context("failed to build HTTP client")?,
        )
    };
    info!(api = api.name(), "data source selected");

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(api, cmd_rx, resp_tx).context("failed to spawn worker thread")?;

    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        cli.chart_params(&config),
        config.export.dir.clone(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    app.resize(terminal.size()?.width);
    app.start(cli.backtest_id);

    let result = run_app(&mut terminal, &mut app);

    // Dispose the chart session, then stop the worker
    app.shutdown();
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("historify stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Drive the chart refresh timer
        app.tick(Instant::now());

        // 4. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Resize(cols, _) => app.resize(cols),
                _ => {}
            }
        }

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
