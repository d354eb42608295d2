//! Filter → sort → paginate derivation shared by every results table.
//!
//! `present` is a pure function of the snapshot, the view state, and the page
//! size. It never clamps the requested page: callers use [`total_pages`] to
//! bound their navigation and get an empty page back when they ask for one
//! past the end.

use std::cmp::Ordering;

use super::schema::Record;
use super::snapshot::Snapshot;
use super::view_state::{SortDirection, ViewState};

/// Rows per page for every results table.
pub const PAGE_SIZE: usize = 10;

/// One derived page plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, R> {
    pub records: Vec<&'a R>,
    /// The requested page (not clamped).
    pub page: usize,
    pub total_pages: usize,
    /// Rows that passed the filter.
    pub total_count: usize,
}

impl<R> PageView<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `ceil(count / page_size)`; zero rows means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Every row that passes the filter, in sort order.
///
/// The sort is stable, so rows that compare equal keep their snapshot order.
pub fn filtered_sorted<'a, R: Record>(snapshot: &'a Snapshot<R>, view: &ViewState) -> Vec<&'a R> {
    let mut rows: Vec<&R> = snapshot
        .records()
        .iter()
        .filter(|r| view.filter().accepts(*r))
        .collect();

    let field = view.sort_field();
    let direction = view.sort_direction();
    rows.sort_by(|a, b| compare_by(*a, *b, field, direction));
    rows
}

/// Derive the visible page.
pub fn present<'a, R: Record>(
    snapshot: &'a Snapshot<R>,
    view: &ViewState,
    page_size: usize,
) -> PageView<'a, R> {
    let rows = filtered_sorted(snapshot, view);
    let total_count = rows.len();
    let total_pages = total_pages(total_count, page_size);

    let start = view.page().saturating_sub(1).saturating_mul(page_size);
    let records = if view.page() == 0 || start >= total_count {
        Vec::new()
    } else {
        rows.into_iter().skip(start).take(page_size).collect()
    };

    PageView {
        records,
        page: view.page(),
        total_pages,
        total_count,
    }
}

/// Row comparator for one field and direction.
pub fn compare_by<R: Record>(a: &R, b: &R, field: &str, direction: SortDirection) -> Ordering {
    let ord = a.field(field).compare(&b.field(field));
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}
