//! Open positions at the end of a backtest.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::table::{FieldDef, FieldKind, Record, Scalar, Schema};

/// One position as returned by `GET /api/backtest/positions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub backtest_id: i64,
    pub symbol: String,
    /// Signed: negative is short.
    pub quantity: i64,
    pub avg_price: f64,
    pub current_price: Option<f64>,
    #[serde(default)]
    pub pnl: f64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    Long,
    Short,
    Flat,
}

impl PositionKind {
    pub fn label(self) -> &'static str {
        match self {
            PositionKind::Long => "LONG",
            PositionKind::Short => "SHORT",
            PositionKind::Flat => "FLAT",
        }
    }
}

impl Position {
    /// Cost value, `quantity * avg_price`.
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.avg_price
    }

    pub fn kind(&self) -> PositionKind {
        match self.quantity {
            q if q > 0 => PositionKind::Long,
            q if q < 0 => PositionKind::Short,
            _ => PositionKind::Flat,
        }
    }
}

static POSITION_FIELDS: &[FieldDef] = &[
    FieldDef { key: "symbol", label: "Symbol", kind: FieldKind::Text, sortable: true },
    FieldDef { key: "kind", label: "Type", kind: FieldKind::Text, sortable: false },
    FieldDef { key: "quantity", label: "Quantity", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "avg_price", label: "Avg Price", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "current_price", label: "Current Price", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "value", label: "Value", kind: FieldKind::Number, sortable: false },
    FieldDef { key: "pnl", label: "P&L", kind: FieldKind::Number, sortable: true },
    FieldDef { key: "timestamp", label: "Timestamp", kind: FieldKind::Timestamp, sortable: true },
];

static POSITION_SCHEMA: Schema = Schema {
    name: "positions",
    fields: POSITION_FIELDS,
    columns: &[
        "symbol", "kind", "quantity", "avg_price", "current_price", "value", "pnl", "timestamp",
    ],
    export_columns: &[
        "symbol", "quantity", "avg_price", "current_price", "value", "pnl", "timestamp",
    ],
    filter: None,
    default_sort: "timestamp",
};

impl Record for Position {
    fn schema() -> &'static Schema {
        &POSITION_SCHEMA
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Scalar<'_> {
        match key {
            "id" => Scalar::Number(self.id as f64),
            "symbol" => Scalar::Text(&self.symbol),
            "kind" => Scalar::Text(self.kind().label()),
            "quantity" => Scalar::Number(self.quantity as f64),
            "avg_price" => Scalar::Number(self.avg_price),
            "current_price" => Scalar::from_opt_number(self.current_price),
            "value" => Scalar::Number(self.value()),
            "pnl" => Scalar::Number(self.pnl),
            "timestamp" => Scalar::Timestamp(self.timestamp),
            _ => Scalar::Missing,
        }
    }
}

/// Totals over all positions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionSummary {
    pub total_value: f64,
    pub total_pnl: f64,
    /// Sum of absolute quantities.
    pub total_quantity: i64,
}

impl PositionSummary {
    pub fn from_positions(positions: &[Position]) -> Self {
        positions.iter().fold(Self::default(), |mut acc, p| {
            acc.total_value += p.value();
            acc.total_pnl += p.pnl;
            acc.total_quantity += p.quantity.abs();
            acc
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn make_position(id: i64, quantity: i64, avg_price: f64) -> Position {
        Position {
            id,
            backtest_id: 7,
            symbol: "HDFCBANK".into(),
            quantity,
            avg_price,
            current_price: Some(avg_price + 5.0),
            pnl: quantity as f64 * 5.0,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(15, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn kind_follows_sign() {
        assert_eq!(make_position(1, 5, 10.0).kind(), PositionKind::Long);
        assert_eq!(make_position(1, -5, 10.0).kind(), PositionKind::Short);
        assert_eq!(make_position(1, 0, 10.0).kind(), PositionKind::Flat);
    }

    #[test]
    fn summary_uses_absolute_quantity() {
        let positions = vec![make_position(1, 10, 100.0), make_position(2, -4, 50.0)];
        let s = PositionSummary::from_positions(&positions);
        assert_eq!(s.total_quantity, 14);
        assert!((s.total_value - 800.0).abs() < 1e-9);
        assert!((s.total_pnl - 30.0).abs() < 1e-9);
    }

    #[test]
    fn positions_have_no_filter() {
        assert!(Position::schema().filter.is_none());
    }
}
