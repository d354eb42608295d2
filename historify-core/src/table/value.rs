//! Scalar field values as seen by the table engine.
//!
//! Every record exposes its fields as borrowed `Scalar`s so the engine can
//! filter, compare, and render any record type without knowing it.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

/// Format used when a timestamp is rendered as text (locale independent).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One field value of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Text(&'a str),
    Number(f64),
    Timestamp(NaiveDateTime),
    /// Absent or null on the wire.
    Missing,
}

impl<'a> Scalar<'a> {
    pub fn from_opt_text(value: Option<&'a str>) -> Self {
        value.map_or(Scalar::Missing, Scalar::Text)
    }

    pub fn from_opt_number(value: Option<f64>) -> Self {
        value.map_or(Scalar::Missing, Scalar::Number)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Scalar::Missing)
    }

    /// Total order used for sorting.
    ///
    /// Missing sorts below everything. Values of different kinds (which a
    /// single schema never produces for one field) fall back to a fixed
    /// kind rank so the order stays total.
    pub fn compare(&self, other: &Scalar<'_>) -> Ordering {
        match (self, other) {
            (Scalar::Missing, Scalar::Missing) => Ordering::Equal,
            (Scalar::Missing, _) => Ordering::Less,
            (_, Scalar::Missing) => Ordering::Greater,
            (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
            (Scalar::Number(a), Scalar::Number(b)) => a.total_cmp(b),
            (Scalar::Timestamp(a), Scalar::Timestamp(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Equality test used by filter predicates. Text compares case-insensitively.
    pub fn matches(&self, wanted: &str) -> bool {
        match self {
            Scalar::Text(s) => s.eq_ignore_ascii_case(wanted),
            Scalar::Number(n) => wanted.trim().parse::<f64>().is_ok_and(|w| w == *n),
            Scalar::Timestamp(_) => self.render() == wanted,
            Scalar::Missing => false,
        }
    }

    /// Text form used by the CSV export.
    ///
    /// Numbers use the shortest representation that round-trips, so no
    /// precision is lost; timestamps use [`TIMESTAMP_FORMAT`].
    pub fn render(&self) -> String {
        match self {
            Scalar::Text(s) => (*s).to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            Scalar::Missing => String::new(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Scalar::Missing => 0,
            Scalar::Number(_) => 1,
            Scalar::Timestamp(_) => 2,
            Scalar::Text(_) => 3,
        }
    }
}
