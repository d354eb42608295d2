//! Panel 6: Help. Keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-6", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "E", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Summary");
    key(&mut lines, "j / k", "Select backtest run");
    key(&mut lines, "Enter", "Load selected run");
    key(&mut lines, "r", "Reload current run");
    lines.push(Line::from(""));

    section(&mut lines, "Panels 2-4: Orders / Trades / Positions");
    key(&mut lines, "h / l", "Move column cursor");
    key(&mut lines, "s / Enter", "Sort by cursor column (again flips)");
    key(&mut lines, "f", "Cycle filter (orders: status, trades: side)");
    key(&mut lines, "n / p", "Next / previous page");
    key(&mut lines, "x", "Export filtered rows to CSV");
    key(&mut lines, "r", "Reload from server");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 5: Chart");
    key(&mut lines, "[ / ]", "Previous / next watchlist symbol");
    key(&mut lines, "e", "Cycle exchange");
    key(&mut lines, "t", "Cycle timeframe");
    key(&mut lines, "+ / -", "EMA period up / down (step 5)");
    key(&mut lines, "> / <", "RSI period up / down");
    key(&mut lines, "r", "Refresh now");
    key(&mut lines, "a", "Toggle 30s auto-refresh");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
