//! Generic results table: schema-driven filter, sort, paginate, and export.
//!
//! One engine serves the order book, trade book, and positions tables. Each
//! record type supplies a static [`Schema`] and implements [`Record`]; a
//! [`TableView`] holds the snapshot and view state of one table instance.

pub mod engine;
pub mod export;
pub mod schema;
pub mod snapshot;
pub mod table_view;
pub mod value;
pub mod view_state;

pub use engine::{filtered_sorted, present, total_pages, PageView, PAGE_SIZE};
pub use export::{serialize, ExportError, CSV_CONTENT_TYPE};
pub use schema::{FieldDef, FieldKind, FilterSpec, Record, Schema};
pub use snapshot::Snapshot;
pub use table_view::TableView;
pub use value::{Scalar, TIMESTAMP_FORMAT};
pub use view_state::{FilterPredicate, SortDirection, ViewError, ViewState};
