//! Price pane: candles plus the moving-average overlay.
//!
//! Renders with direct buffer writes:
//! - Each candle = 1 terminal column, newest at the right
//! - Body: block char, green if close >= open, pink otherwise
//! - Wicks: vertical line chars to high/low
//! - MA: dot in the accent color wherever a candle does not cover it

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use historify_core::chart::{Candle, ChartTime, LinePoint, SeriesPane};

use crate::theme::Theme;

/// Left margin reserved for price labels.
const LABEL_WIDTH: u16 = 9;

pub struct PricePanePanel<'a> {
    pane: &'a SeriesPane,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> PricePanePanel<'a> {
    pub fn new(pane: &'a SeriesPane, title: &'a str, theme: &'a Theme) -> Self {
        Self { pane, title, theme }
    }

    /// Map a price to a Y position in the plot area (0 = top).
    fn price_to_y(price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
        if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
            return 0;
        }
        let frac = (price - y_min) / (y_max - y_min);
        let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round().max(0.0).min(plot_height.saturating_sub(1) as f64) as u16
    }
}

/// Bar columns available inside a bordered pane of `area`, after the
/// price label margin. The oscillator pane sizes its window with the same
/// budget so both panes cover the same bars.
pub fn plot_columns(area: Rect) -> usize {
    Block::default()
        .borders(Borders::ALL)
        .inner(area)
        .width
        .saturating_sub(LABEL_WIDTH) as usize
}

/// Candles inside the pane's bar window for `area`.
pub fn window_bars(pane: &SeriesPane, area: Rect) -> &[Candle] {
    let candles = pane.candles();
    let Some((lo, hi)) = pane.visible_window(plot_columns(area)) else {
        return &[];
    };
    let start = candles.partition_point(|c| c.time < lo);
    let end = candles.partition_point(|c| c.time <= hi);
    &candles[start..end]
}

fn value_at(line: &[LinePoint], time: ChartTime) -> Option<f64> {
    line.binary_search_by(|p| p.time.cmp(&time))
        .ok()
        .map(|i| line[i].value)
}

impl<'a> Widget for PricePanePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars = window_bars(self.pane, area);

        if bars.is_empty() {
            let block = Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        }
        let line = self.pane.line();

        // Bounds over what is drawn, MA included
        let (mut y_min, mut y_max) = bars
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| (lo.min(b.low), hi.max(b.high)));
        for v in bars.iter().filter_map(|b| value_at(line, b.time)) {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }

        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let last = bars[bars.len() - 1];
        let change = last.close - bars[0].open;
        let title = format!(
            " {} | {} bars | last {:.2} ({:+.2}) ",
            self.title,
            bars.len(),
            last.close,
            change,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        // Bottom row carries the time axis
        let plot_left = inner.x + LABEL_WIDTH;
        let plot_top = inner.y;
        let plot_height = inner.height.saturating_sub(1);
        if plot_height == 0 {
            return;
        }

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (label_val, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            buf.set_string(
                inner.x,
                plot_top + y_pos,
                format!("{:>8.1}", label_val),
                Style::default().fg(self.theme.muted),
            );
        }

        for (i, bar) in bars.iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= inner.right() {
                break;
            }

            let is_up = bar.is_bullish();
            let color = if is_up { self.theme.positive } else { self.theme.negative };
            let style = Style::default().fg(color);

            let high_y = Self::price_to_y(bar.high, y_lower, y_upper, plot_height);
            let low_y = Self::price_to_y(bar.low, y_lower, y_upper, plot_height);
            let body_top_y = Self::price_to_y(bar.open.max(bar.close), y_lower, y_upper, plot_height);
            let body_bot_y = Self::price_to_y(bar.open.min(bar.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "|", style);
            }
            let body_char = if is_up { "\u{2588}" } else { "\u{2593}" }; // full block vs medium shade
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body_char, style);
            }
            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "|", style);
            }

            if let Some(ma) = value_at(line, bar.time) {
                let py = plot_top + Self::price_to_y(ma, y_lower, y_upper, plot_height);
                let free = buf.cell((x, py)).is_some_and(|c| c.symbol() == " ");
                if free {
                    buf.set_string(x, py, "\u{2022}", Style::default().fg(self.theme.accent));
                }
            }
        }

        // Time axis: first and last visible bar
        let axis_y = plot_top + plot_height;
        let first_label = bars[0].time.label();
        let last_label = last.time.label();
        buf.set_string(plot_left, axis_y, &first_label, Style::default().fg(self.theme.muted));
        let right = (plot_left as usize + bars.len()).min(inner.right() as usize);
        let last_x = right
            .saturating_sub(last_label.len())
            .max(plot_left as usize + first_label.len() + 2);
        if bars.len() > 1 && last_x + last_label.len() <= inner.right() as usize {
            let last_x = last_x as u16;
            buf.set_string(
                last_x,
                axis_y,
                &last_label,
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use historify_core::chart::{ChartParams, ChartSnapshot, Exchange, Pane, PaneKind};

    fn day(d: u32) -> ChartTime {
        ChartTime::Day(NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
    }

    fn snapshot() -> ChartSnapshot {
        let candles = vec![
            Candle { time: day(1), open: 100.0, high: 102.0, low: 99.0, close: 101.0, volume: None },
            Candle { time: day(2), open: 101.0, high: 103.0, low: 100.0, close: 100.5, volume: None },
            Candle { time: day(3), open: 100.5, high: 104.0, low: 99.5, close: 103.0, volume: None },
            Candle { time: day(6), open: 103.0, high: 105.0, low: 101.0, close: 102.0, volume: None },
            Candle { time: day(7), open: 102.0, high: 106.0, low: 101.5, close: 105.5, volume: None },
        ];
        let ma = vec![
            LinePoint { time: day(6), value: 101.5 },
            LinePoint { time: day(7), value: 102.6 },
        ];
        ChartSnapshot::new(ChartParams::new("SBIN", Exchange::Nse), candles, ma, Vec::new())
    }

    fn loaded_pane() -> SeriesPane {
        let mut pane = SeriesPane::new(PaneKind::Price, 76);
        pane.set_data(&snapshot());
        pane.fit_content();
        pane
    }

    fn content(buf: &Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        s
    }

    #[test]
    fn renders_candles_and_axis() {
        let theme = Theme::default();
        let pane = loaded_pane();
        let area = Rect::new(0, 0, 80, PaneKind::Price.height());
        let mut buf = Buffer::empty(area);
        PricePanePanel::new(&pane, "SBIN", &theme).render(area, &mut buf);

        let text = content(&buf);
        assert!(text.contains("5 bars"));
        assert!(text.contains("\u{2588}"));
        assert!(text.contains("\u{2593}"));
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("2024-05-07"));
    }

    #[test]
    fn empty_pane_shows_no_data() {
        let theme = Theme::default();
        let pane = SeriesPane::new(PaneKind::Price, 76);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        PricePanePanel::new(&pane, "SBIN", &theme).render(area, &mut buf);
        assert!(content(&buf).contains("No Data"));
    }

    #[test]
    fn disposed_pane_draws_nothing() {
        let theme = Theme::default();
        let mut pane = loaded_pane();
        pane.dispose();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        PricePanePanel::new(&pane, "SBIN", &theme).render(area, &mut buf);
        assert!(content(&buf).contains("No Data"));
    }

    #[test]
    fn narrow_pane_keeps_newest_bars() {
        let theme = Theme::default();
        let mut pane = loaded_pane();
        pane.resize(3);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        PricePanePanel::new(&pane, "X", &theme).render(area, &mut buf);
        assert!(content(&buf).contains("3 bars"));
    }

    #[test]
    fn value_lookup() {
        let line = snapshot().moving_average().to_vec();
        assert_eq!(value_at(&line, day(7)), Some(102.6));
        assert_eq!(value_at(&line, day(1)), None);
    }
}
