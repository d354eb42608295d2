//! Backtest summary card: run header, headline metrics, and book totals.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use historify_core::domain::{BacktestSummary, PositionSummary, TradeSummary};

use crate::theme::Theme;

pub struct MetricsPanel<'a> {
    run: Option<&'a BacktestSummary>,
    trades: TradeSummary,
    positions: PositionSummary,
    theme: &'a Theme,
}

impl<'a> MetricsPanel<'a> {
    pub fn new(
        run: Option<&'a BacktestSummary>,
        trades: TradeSummary,
        positions: PositionSummary,
        theme: &'a Theme,
    ) -> Self {
        Self {
            run,
            trades,
            positions,
            theme,
        }
    }

    fn row(&self, label: &str, value: String, color: ratatui::style::Color) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {label:<16}"), Style::default().fg(self.theme.muted)),
            Span::styled(value, Style::default().fg(color)),
        ])
    }

    fn heading(&self, text: &str) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
    }
}

fn pct(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}%"))
}

fn num(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn count(v: Option<i64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl<'a> Widget for MetricsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Backtest ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let Some(run) = self.run else {
            Paragraph::new(Line::styled(
                "No backtest loaded",
                Style::default().fg(self.theme.muted),
            ))
            .block(block)
            .render(area, buf);
            return;
        };

        let t = self.theme;
        let mut lines = vec![
            self.heading(&format!("{} (#{})", run.name, run.id)),
            self.row("Strategy", run.strategy_name.clone(), t.text_primary),
            self.row("Instrument", format!("{} {}", run.symbol, run.exchange), t.text_primary),
            self.row(
                "Period",
                format!(
                    "{} to {}",
                    run.start_date.format("%Y-%m-%d"),
                    run.end_date.format("%Y-%m-%d")
                ),
                t.text_primary,
            ),
            self.row("Status", run.status.to_uppercase(), t.status_color(&run.status)),
            Line::from(""),
            self.heading("Performance"),
        ];

        match run.metrics() {
            Some(m) => {
                let ret_color = m.total_return.map_or(t.text_secondary, |v| t.pnl_color(v));
                lines.push(self.row("Total return", pct(m.total_return), ret_color));
                lines.push(self.row(
                    "Capital",
                    format!(
                        "{} -> {}",
                        num(m.initial_capital.or(Some(run.initial_capital))),
                        num(m.final_capital)
                    ),
                    t.text_primary,
                ));
                lines.push(self.row(
                    "Trades",
                    format!(
                        "{} ({} won / {} lost)",
                        count(m.total_trades),
                        count(m.winning_trades),
                        count(m.losing_trades)
                    ),
                    t.text_primary,
                ));
                lines.push(self.row("Win rate", pct(m.win_rate), t.text_primary));
                lines.push(self.row("Max drawdown", pct(m.max_drawdown), t.negative));
                lines.push(self.row("Sharpe", num(m.sharpe_ratio), t.neutral));
            }
            None => lines.push(self.row("", "No metrics reported".to_string(), t.muted)),
        }

        lines.push(Line::from(""));
        lines.push(self.heading("Books"));
        lines.push(self.row(
            "Trade P&L",
            format!("{:.2}", self.trades.total_pnl),
            t.pnl_color(self.trades.total_pnl),
        ));
        lines.push(self.row(
            "Commission",
            format!("{:.2}", self.trades.total_commission),
            t.text_primary,
        ));
        lines.push(self.row(
            "Buys / Sells",
            format!("{} / {}", self.trades.buy_count, self.trades.sell_count),
            t.text_primary,
        ));
        lines.push(self.row(
            "Position value",
            format!("{:.2}", self.positions.total_value),
            t.text_primary,
        ));
        lines.push(self.row(
            "Unrealized P&L",
            format!("{:.2}", self.positions.total_pnl),
            t.pnl_color(self.positions.total_pnl),
        ));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
