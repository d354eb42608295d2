//! Oscillator pane: RSI line on a fixed 0-100 scale with 30/70 guides.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use historify_core::chart::{LinePoint, SeriesPane};

use super::price_pane::plot_columns;
use crate::theme::Theme;

pub const OVERSOLD: f64 = 30.0;
pub const OVERBOUGHT: f64 = 70.0;

pub struct OscillatorPanePanel<'a> {
    pane: &'a SeriesPane,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> OscillatorPanePanel<'a> {
    pub fn new(pane: &'a SeriesPane, title: &'a str, theme: &'a Theme) -> Self {
        Self { pane, title, theme }
    }
}

/// Bars in the price pane's window for `area`, and the RSI points inside
/// it keyed by their bar offset from the window start. Warm-up bars have
/// no point.
pub fn window_points(pane: &SeriesPane, area: Rect) -> (usize, Vec<(usize, &LinePoint)>) {
    let Some((lo, hi)) = pane.visible_window(plot_columns(area)) else {
        return (0, Vec::new());
    };
    let times = pane.bar_times();
    let start = times.partition_point(|t| *t < lo);
    let end = times.partition_point(|t| *t <= hi);
    let points = pane
        .line()
        .iter()
        .filter(|p| p.time >= lo && p.time <= hi)
        .filter_map(|p| times.binary_search(&p.time).ok().map(|i| (i - start, p)))
        .collect();
    (end - start, points)
}

impl<'a> Widget for OscillatorPanePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (bars, points) = window_points(self.pane, area);
        let data: Vec<(f64, f64)> = points
            .iter()
            .map(|(offset, p)| (*offset as f64, p.value))
            .collect();

        let Some(&(_, last)) = data.last() else {
            Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background))
                .render(area, buf);
            return;
        };

        let x_max = bars.saturating_sub(1).max(1) as f64;
        let upper = [(0.0, OVERBOUGHT), (x_max, OVERBOUGHT)];
        let lower = [(0.0, OVERSOLD), (x_max, OVERSOLD)];

        let datasets = vec![
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.muted))
                .data(&upper),
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.muted))
                .data(&lower),
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.neutral))
                .data(&data),
        ];

        let title = Span::styled(
            format!(" {} | {:.1} ", self.title, last),
            Style::default().fg(self.theme.rsi_color(last)),
        );

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent))
                    .style(Style::default().bg(self.theme.background)),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(self.theme.muted))
                    .bounds([0.0, x_max]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(self.theme.muted))
                    .bounds([0.0, 100.0])
                    .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
            )
            .render(area, buf);
    }
}
