//! Panel 5: Chart. Parameter header, price pane, RSI pane.

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use historify_core::chart::{ChartSession, PaneKind, SessionState};

use crate::app::AppState;
use crate::panels::{OscillatorPanePanel, PricePanePanel};
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = &app.chart.session else {
        let lines = vec![
            Line::from(Span::styled(
                format!("No chart open for '{}'.", app.chart.params.symbol),
                theme::muted(),
            )),
            Line::from(Span::styled(
                "Pick a symbol with [ / ] once the watchlist loads.",
                theme::muted(),
            )),
        ];
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(PaneKind::Price.height()),
            Constraint::Length(PaneKind::Oscillator.height()),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(Paragraph::new(header_line(session, Instant::now())), chunks[0]);

    let theme = Theme::default();
    // Panes show the published snapshot, so label them with its params.
    let params = session
        .snapshot()
        .map_or_else(|| session.params(), |snapshot| snapshot.params());
    let price_title = format!("{} {} EMA({})", params.symbol, params.timeframe, params.ma_period);
    let osc_title = format!("{}({})", PaneKind::Oscillator.title(), params.osc_period);
    f.render_widget(
        PricePanePanel::new(session.price_pane(), &price_title, &theme),
        chunks[1],
    );
    f.render_widget(
        OscillatorPanePanel::new(session.oscillator_pane(), &osc_title, &theme),
        chunks[2],
    );
}

fn header_line(session: &ChartSession, now: Instant) -> Line<'static> {
    let mut spans = vec![Span::styled(format!(" {} ", session.params()), theme::accent_bold())];

    let (state, style) = match session.state() {
        SessionState::Idle => ("idle", theme::muted()),
        SessionState::Loading => ("loading...", theme::warning()),
        SessionState::Ready => ("ready", theme::positive()),
        SessionState::Disposed => ("closed", theme::muted()),
    };
    spans.push(Span::styled(state, style));

    if let Some(snapshot) = session.snapshot() {
        let local = snapshot.fetched_at().with_timezone(&chrono::Local);
        spans.push(Span::styled(
            format!("  updated {}", local.format("%H:%M:%S")),
            theme::muted(),
        ));
    }

    if session.auto_refresh() {
        let next = session
            .timer()
            .remaining(now)
            .map_or_else(|| "armed".to_string(), |d| format!("next in {}s", d.as_secs()));
        spans.push(Span::styled(format!("  auto: {next}"), theme::positive()));
    }

    if let Some(err) = session.last_error() {
        spans.push(Span::styled(format!("  {err}"), theme::negative()));
    }
    Line::from(spans)
}
