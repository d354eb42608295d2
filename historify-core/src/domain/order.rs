//! Order book rows produced by a backtest run.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::table::{FieldDef, FieldKind, FilterSpec, Record, Scalar, Schema};

/// One order as returned by `GET /api/backtest/orderbook/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub backtest_id: i64,
    pub order_id: String,
    pub symbol: String,
    /// BUY or SELL.
    pub side: String,
    /// MARKET, LIMIT, or STOP.
    pub order_type: String,
    pub quantity: i64,
    /// None for market orders.
    pub price: Option<f64>,
    /// PENDING, FILLED, CANCELLED, or REJECTED.
    pub status: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub filled_quantity: i64,
    pub filled_price: Option<f64>,
}

impl Order {
    pub fn is_market(&self) -> bool {
        self.price.is_none()
    }
}

static ORDER_FIELDS: &[FieldDef] = &[
    FieldDef { key: "order_id", label: "Order ID", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "symbol", label: "Symbol", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "side", label: "Side", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "order_type", label: "Type", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "quantity", label: "Quantity", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "price", label: "Price", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "status", label: "Status", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "timestamp", label: "Timestamp", kind: FieldKind::Timestamp, sortable: true },
    FieldDef { key: "filled_quantity", label: "Filled Qty", kind: FieldKind::Number, sortable: false },
    FieldDef { key: "filled_price", label: "Filled Price", kind: FieldKind::Number, sortable: false },
];

static ORDER_SCHEMA: Schema = Schema {
    name: "orderbook",
    fields: ORDER_FIELDS,
    columns: &[
        "order_id", "symbol", "side", "order_type", "quantity", "price", "status", "timestamp",
    ],
    export_columns: &[
        "order_id",
        "symbol",
        "side",
        "order_type",
        "quantity",
        "price",
        "status",
        "timestamp",
        "filled_quantity",
        "filled_price",
    ],
    filter: Some(FilterSpec {
        field: "status",
        options: &["filled", "pending", "cancelled"],
    }),
    default_sort: "timestamp",
};

impl Record for Order {
    fn schema() -> &'static Schema {
        &ORDER_SCHEMA
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Scalar<'_> {
        match key {
            "id" => Scalar::Number(self.id as f64),
            "order_id" => Scalar::Text(&self.order_id),
            "symbol" => Scalar::Text(&self.symbol),
            "side" => Scalar::Text(&self.side),
            "order_type" => Scalar::Text(&self.order_type),
            "quantity" => Scalar::Number(self.quantity as f64),
            "price" => Scalar::from_opt_number(self.price),
            "status" => Scalar::Text(&self.status),
            "timestamp" => Scalar::Timestamp(self.timestamp),
            "filled_quantity" => Scalar::Number(self.filled_quantity as f64),
            "filled_price" => Scalar::from_opt_number(self.filled_price),
            _ => Scalar::Missing,
        }
    }
}
