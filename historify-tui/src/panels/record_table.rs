//! Record table panel: one page of a results table.
//!
//! Displays:
//! - Title with row count, active filter, and sort column/direction
//! - Header with the column cursor highlighted
//! - Side/status/P&L cells colored by value
//! - Page footer, only when there is more than one page

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use historify_core::table::{FieldKind, Record, Scalar, TableView};

use crate::theme::Theme;

/// Results table widget over any record type.
pub struct RecordTablePanel<'a, R> {
    table: &'a TableView<R>,
    column: usize,
    loading: bool,
    theme: &'a Theme,
}

impl<'a, R: Record> RecordTablePanel<'a, R> {
    pub fn new(table: &'a TableView<R>, column: usize, loading: bool, theme: &'a Theme) -> Self {
        Self {
            table,
            column,
            loading,
            theme,
        }
    }

    fn cell_style(&self, key: &str, value: &Scalar<'_>) -> Style {
        let color = match (key, value) {
            ("side" | "kind", Scalar::Text(s)) => self.theme.side_color(s),
            ("status", Scalar::Text(s)) => self.theme.status_color(s),
            ("pnl", Scalar::Number(v)) => self.theme.pnl_color(*v),
            _ => self.theme.text_primary,
        };
        Style::default().fg(color)
    }
}

/// Screen rendering of a cell; the CSV export keeps full precision instead.
pub fn display_value(value: &Scalar<'_>, kind: FieldKind) -> String {
    match value {
        Scalar::Missing => "-".to_string(),
        Scalar::Text(s) => s.to_string(),
        Scalar::Number(v) if v.fract() == 0.0 && kind == FieldKind::Number => format!("{v:.0}"),
        Scalar::Number(v) => format!("{v:.2}"),
        Scalar::Timestamp(t) => t.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn column_width(kind: FieldKind) -> Constraint {
    match kind {
        FieldKind::Timestamp => Constraint::Length(17),
        FieldKind::Number => Constraint::Length(12),
        FieldKind::Text => Constraint::Min(8),
    }
}

impl<'a, R: Record> Widget for RecordTablePanel<'a, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let schema = self.table.schema();
        let view = self.table.view();
        let page = self.table.present();

        let mut title = format!(
            " {} ({} rows) | sort: {} {} ",
            schema.name,
            page.total_count,
            schema.label(view.sort_field()),
            view.sort_direction().arrow(),
        );
        if schema.filter.is_some() {
            title.push_str(&format!("| filter: {} ", view.filter().label()));
        }
        if self.loading {
            title.push_str("| loading... ");
        }

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        if page.is_empty() {
            let msg = if self.loading {
                "Loading..."
            } else if self.table.snapshot().is_empty() {
                "No records"
            } else {
                "No records match the filter"
            };
            Paragraph::new(Line::styled(msg, Style::default().fg(self.theme.muted)))
                .block(block)
                .render(area, buf);
            return;
        }

        let fields: Vec<_> = schema.display_fields().collect();

        let header_cells = fields.iter().enumerate().map(|(i, f)| {
            let mut label = f.label.to_string();
            if f.key == view.sort_field() {
                label.push(' ');
                label.push_str(view.sort_direction().arrow());
            }
            let mut style = Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD);
            if i == self.column {
                style = style.bg(self.theme.neutral).fg(self.theme.text_primary);
            } else if !f.sortable {
                style = Style::default().fg(self.theme.muted);
            }
            Cell::from(label).style(style)
        });
        let header = Row::new(header_cells).height(1);

        let rows = page.records.iter().map(|record| {
            let cells = fields.iter().map(|f| {
                let value = record.field(f.key);
                Cell::from(display_value(&value, f.kind)).style(self.cell_style(f.key, &value))
            });
            Row::new(cells).height(1)
        });

        let widths: Vec<Constraint> = fields.iter().map(|f| column_width(f.kind)).collect();

        let inner = block.inner(area);
        block.render(area, buf);

        let table_area = if self.table.shows_pagination() {
            let footer_y = inner.y + inner.height.saturating_sub(1);
            let footer = format!(
                "Page {} / {}  [n]ext [p]rev",
                page.page, page.total_pages
            );
            buf.set_string(inner.x, footer_y, footer, Style::default().fg(self.theme.muted));
            Rect { height: inner.height.saturating_sub(1), ..inner }
        } else {
            inner
        };

        Widget::render(Table::new(rows, widths).header(header), table_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use historify_core::data::{DashboardApi, SampleApi, SAMPLE_BACKTEST_ID};
    use historify_core::domain::{Order, Position};
    use historify_core::table::Snapshot;

    fn render_to_string<R: Record>(table: &TableView<R>, loading: bool) -> String {
        let theme = Theme::default();
        let panel = RecordTablePanel::new(table, 0, loading, &theme);
        let area = Rect::new(0, 0, 140, 20);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);

        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            content.push('\n');
        }
        content
    }

    #[test]
    fn empty_table_shows_placeholder_and_no_pager() {
        let table: TableView<Order> = TableView::new();
        let content = render_to_string(&table, false);
        assert!(content.contains("No records"));
        assert!(!content.contains("Page "));
    }

    #[test]
    fn loading_placeholder() {
        let table: TableView<Position> = TableView::new();
        let content = render_to_string(&table, true);
        assert!(content.contains("Loading..."));
    }

    #[test]
    fn paginated_orders_show_footer() {
        let orders = SampleApi::default().orders(SAMPLE_BACKTEST_ID).unwrap();
        let table = TableView::with_snapshot(Snapshot::new(orders));
        let content = render_to_string(&table, false);
        assert!(content.contains("orderbook (23 rows)"));
        assert!(content.contains("Page 1 / 3"));
        assert!(content.contains("filter: all"));
        assert!(content.contains("Order ID"));
    }

    #[test]
    fn single_page_has_no_footer() {
        let mut orders = SampleApi::default().orders(SAMPLE_BACKTEST_ID).unwrap();
        orders.truncate(4);
        let table = TableView::with_snapshot(Snapshot::new(orders));
        let content = render_to_string(&table, false);
        assert!(!content.contains("Page "));
    }

    #[test]
    fn filtered_out_message() {
        let orders = SampleApi::default().orders(SAMPLE_BACKTEST_ID).unwrap();
        let mut table = TableView::with_snapshot(Snapshot::new(orders));
        table.filter_by("no-such-status").unwrap();
        let content = render_to_string(&table, false);
        assert!(content.contains("No records match the filter"));
    }

    #[test]
    fn display_formats() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(display_value(&Scalar::Missing, FieldKind::Number), "-");
        assert_eq!(display_value(&Scalar::Number(10.0), FieldKind::Number), "10");
        assert_eq!(display_value(&Scalar::Number(2500.456), FieldKind::Number), "2500.46");
        assert_eq!(display_value(&Scalar::Timestamp(ts), FieldKind::Timestamp), "2024-03-04 09:15");
    }
}
