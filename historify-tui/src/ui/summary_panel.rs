//! Panel 1: Summary. Backtest runs on the left, the loaded run on the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::app::AppState;
use crate::panels::MetricsPanel;
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(20)])
        .split(area);

    render_runs(f, chunks[0], app);

    let theme = Theme::default();
    let panel = MetricsPanel::new(
        app.summary.current.as_ref(),
        app.trade_summary(),
        app.position_summary(),
        &theme,
    );
    f.render_widget(panel, chunks[1]);
}

fn render_runs(f: &mut Frame, area: Rect, app: &AppState) {
    let title = if app.summary.loading {
        " Runs (loading...) ".to_string()
    } else {
        format!(" Runs ({}) ", app.summary.runs.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(title)
        .title_style(theme::accent_bold());

    let theme = Theme::default();
    let items: Vec<ListItem> = app
        .summary
        .runs
        .iter()
        .map(|run| {
            let marker = if Some(run.id) == app.backtest_id { "*" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}#{:<4}", run.id), theme::accent()),
                Span::raw(format!("{:<18} ", truncate(&run.name, 18))),
                Span::styled(
                    run.status.to_uppercase(),
                    ratatui::style::Style::default().fg(theme.status_color(&run.status)),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::accent().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.summary.runs.is_empty() {
        state.select(Some(app.summary.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("short", 18), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd~");
    }
}
