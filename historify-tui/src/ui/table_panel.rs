//! Panels 2-4: order book, trade book, and positions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use historify_core::table::Record;

use crate::app::{AppState, TablePanelState};
use crate::panels::RecordTablePanel;
use crate::theme::{self, Theme};

fn render_table<R: Record>(f: &mut Frame, area: Rect, state: &TablePanelState<R>) {
    let theme = Theme::default();
    let panel = RecordTablePanel::new(&state.table, state.column, state.loading, &theme);
    f.render_widget(panel, area);
}

/// Split off a one-line totals header above the table.
fn with_header(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render_orders(f: &mut Frame, area: Rect, app: &AppState) {
    render_table(f, area, &app.orders);
}

pub fn render_trades(f: &mut Frame, area: Rect, app: &AppState) {
    let (header, body) = with_header(area);
    let s = app.trade_summary();
    let line = Line::from(vec![
        Span::styled(" P&L ", theme::muted()),
        Span::styled(format!("{:.2}", s.total_pnl), theme::pnl_style(s.total_pnl)),
        Span::styled("  Commission ", theme::muted()),
        Span::raw(format!("{:.2}", s.total_commission)),
        Span::styled("  Buys ", theme::muted()),
        Span::styled(s.buy_count.to_string(), theme::positive()),
        Span::styled("  Sells ", theme::muted()),
        Span::styled(s.sell_count.to_string(), theme::negative()),
    ]);
    f.render_widget(Paragraph::new(line), header);
    render_table(f, body, &app.trades);
}

pub fn render_positions(f: &mut Frame, area: Rect, app: &AppState) {
    let (header, body) = with_header(area);
    let s = app.position_summary();
    let line = Line::from(vec![
        Span::styled(" Value ", theme::muted()),
        Span::raw(format!("{:.2}", s.total_value)),
        Span::styled("  P&L ", theme::muted()),
        Span::styled(format!("{:.2}", s.total_pnl), theme::pnl_style(s.total_pnl)),
        Span::styled("  Quantity ", theme::muted()),
        Span::raw(s.total_quantity.to_string()),
    ]);
    f.render_widget(Paragraph::new(line), header);
    render_table(f, body, &app.positions);
}
