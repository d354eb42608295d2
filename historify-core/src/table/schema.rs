//! Static table schemas and the `Record` trait.
//!
//! A schema declares the columns a record type shows, which of them can be
//! sorted, the one field that can be filtered (with its offered values), and
//! the column order used by the CSV export.

use super::value::Scalar;

/// Column kind, used for display alignment and documentation of the export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// Rendered as ISO 8601 `YYYY-MM-DDTHH:MM:SS` in exports.
    Timestamp,
}

/// One named field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub sortable: bool,
}

/// The filterable field of a table and the values offered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub field: &'static str,
    pub options: &'static [&'static str],
}

/// Everything the engine needs to know about a record type.
#[derive(Debug)]
pub struct Schema {
    /// Short table name, also the stem of the export file name.
    pub name: &'static str,
    /// All fields the record exposes (displayed or exported).
    pub fields: &'static [FieldDef],
    /// Keys of the columns shown in the table, in display order.
    pub columns: &'static [&'static str],
    /// Keys written by the CSV export, in column order.
    pub export_columns: &'static [&'static str],
    pub filter: Option<FilterSpec>,
    /// Sort field of a fresh view.
    pub default_sort: &'static str,
}

impl Schema {
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn is_sortable(&self, key: &str) -> bool {
        self.field(key).is_some_and(|f| f.sortable)
    }

    pub fn label(&self, key: &str) -> &'static str {
        self.field(key).map_or("", |f| f.label)
    }

    /// Column definitions in display order.
    pub fn display_fields(&self) -> impl Iterator<Item = &FieldDef> + '_ {
        self.columns.iter().filter_map(|k| self.field(k))
    }

    /// File name the export of this table is saved under.
    pub fn export_file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}

/// A row type the table engine can present.
pub trait Record {
    fn schema() -> &'static Schema;

    /// Stable identifier of the row.
    fn id(&self) -> i64;

    /// Value of a named field; unknown keys are `Missing`.
    fn field(&self, key: &str) -> Scalar<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FieldDef] = &[
        FieldDef { key: "symbol", label: "Symbol", kind: FieldKind::Text, sortable: true },
        FieldDef { key: "note", label: "Note", kind: FieldKind::Text, sortable: false },
    ];

    static SCHEMA: Schema = Schema {
        name: "demo",
        fields: FIELDS,
        columns: &["symbol", "note", "ghost"],
        export_columns: &["symbol"],
        filter: None,
        default_sort: "symbol",
    };

    #[test]
    fn lookup_and_sortability() {
        assert!(SCHEMA.is_sortable("symbol"));
        assert!(!SCHEMA.is_sortable("note"));
        assert!(!SCHEMA.is_sortable("ghost"));
        assert_eq!(SCHEMA.label("symbol"), "Symbol");
        assert_eq!(SCHEMA.label("ghost"), "");
    }

    #[test]
    fn display_fields_skip_unknown_keys() {
        let keys: Vec<_> = SCHEMA.display_fields().map(|f| f.key).collect();
        assert_eq!(keys, vec!["symbol", "note"]);
        assert_eq!(SCHEMA.export_file_name(), "demo.csv");
    }
}
