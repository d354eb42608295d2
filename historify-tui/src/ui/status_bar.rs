//! Bottom status bar: panel hints, auto-refresh indicator, last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " 1:Summary 2:Orders 3:Trades 4:Positions 5:Chart 6:Help E:Errors",
        theme::muted(),
    ));

    if let Some(session) = &app.chart.session {
        if session.auto_refresh() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("AUTO", theme::positive()));
        }
    }

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
