//! Trade book rows and the summary shown above the table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::table::{FieldDef, FieldKind, FilterSpec, Record, Scalar, Schema};

/// One execution as returned by `GET /api/backtest/tradebook/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub backtest_id: i64,
    pub symbol: String,
    pub side: String,
    pub quantity: i64,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub order_id: Option<String>,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub pnl: f64,
}

static TRADE_FIELDS: &[FieldDef] = &[
    FieldDef { key: "symbol", label: "Symbol", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "side", label: "Side", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "quantity", label: "Quantity", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "price", label: "Price", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "timestamp", label: "Timestamp", kind: FieldKind::Timestamp, sortable: true },
    FieldDef { key: "order_id", label: "Order ID", kind: FieldKind::Text, sortable: false },
    FieldDef { key: "commission", label: "Commission", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "pnl", label: "P&L", kind: FieldKind::Number, sortable: true },
];

static TRADE_SCHEMA: Schema = Schema {
    name: "tradebook",
    fields: TRADE_FIELDS,
    columns: &["symbol", "side", "quantity", "price", "commission", "pnl", "timestamp"],
    export_columns: &[
        "symbol", "side", "quantity", "price", "timestamp", "order_id", "commission", "pnl",
    ],
    filter: Some(FilterSpec {
        field: "side",
        options: &["buy", "sell"],
    }),
    default_sort: "timestamp",
};

impl Record for Trade {
    fn schema() -> &'static Schema {
        &TRADE_SCHEMA
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Scalar<'_> {
        match key {
            "id" => Scalar::Number(self.id as f64),
            "symbol" => Scalar::Text(&self.symbol),
            "side" => Scalar::Text(&self.side),
            "quantity" => Scalar::Number(self.quantity as f64),
            "price" => Scalar::Number(self.price),
            "timestamp" => Scalar::Timestamp(self.timestamp),
            "order_id" => Scalar::from_opt_text(self.order_id.as_deref()),
            "commission" => Scalar::Number(self.commission),
            "pnl" => Scalar::Number(self.pnl),
            _ => Scalar::Missing,
        }
    }
}

/// Totals over the whole trade book (not the filtered view).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TradeSummary {
    pub total_pnl: f64,
    pub total_commission: f64,
    pub buy_count: usize,
    pub sell_count: usize,
}

impl TradeSummary {
    pub fn from_trades(trades: &[Trade]) -> Self {
        trades.iter().fold(Self::default(), |mut acc, t| {
            acc.total_pnl += t.pnl;
            acc.total_commission += t.commission;
            if t.side.eq_ignore_ascii_case("BUY") {
                acc.buy_count += 1;
            } else if t.side.eq_ignore_ascii_case("SELL") {
                acc.sell_count += 1;
            }
            acc
        })
    }
}
