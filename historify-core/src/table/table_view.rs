//! One table instance: its snapshot, its view state, and its page size.

use super::engine::{self, PageView, PAGE_SIZE};
use super::export::{self, ExportError};
use super::schema::{Record, Schema};
use super::snapshot::Snapshot;
use super::view_state::{ViewError, ViewState};

#[derive(Debug, Clone)]
pub struct TableView<R> {
    snapshot: Snapshot<R>,
    view: ViewState,
    page_size: usize,
}

impl<R: Record> TableView<R> {
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::empty())
    }

    pub fn with_snapshot(snapshot: Snapshot<R>) -> Self {
        Self {
            snapshot,
            view: ViewState::for_schema(R::schema()),
            page_size: PAGE_SIZE,
        }
    }

    pub fn schema(&self) -> &'static Schema {
        R::schema()
    }

    pub fn snapshot(&self) -> &Snapshot<R> {
        &self.snapshot
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Swap in a freshly fetched snapshot, keeping sort and filter.
    ///
    /// The page is pulled back into range so a shorter result set does not
    /// leave the view past its end.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot<R>) {
        self.snapshot = snapshot;
        let pages = self.total_pages();
        self.view.clamp_page(pages);
    }

    pub fn present(&self) -> PageView<'_, R> {
        engine::present(&self.snapshot, &self.view, self.page_size)
    }

    /// Rows that pass the filter, in sort order (what the export writes).
    pub fn filtered_sorted(&self) -> Vec<&R> {
        engine::filtered_sorted(&self.snapshot, &self.view)
    }

    pub fn total_pages(&self) -> usize {
        engine::total_pages(self.filtered_sorted().len(), self.page_size)
    }

    pub fn sort_by(&mut self, field: &str) -> Result<(), ViewError> {
        self.view.sort_by(R::schema(), field)
    }

    pub fn filter_by(&mut self, value: &str) -> Result<(), ViewError> {
        self.view.filter_by(R::schema(), value)
    }

    pub fn cycle_filter(&mut self) -> Result<(), ViewError> {
        self.view.cycle_filter(R::schema())
    }

    pub fn next_page(&mut self) {
        let pages = self.total_pages();
        self.view.next_page(pages);
    }

    pub fn prev_page(&mut self) {
        self.view.prev_page();
    }

    /// Export is offered only when the snapshot holds rows.
    pub fn can_export(&self) -> bool {
        !self.snapshot.is_empty()
    }

    /// Pagination controls appear only when there is more than one page.
    pub fn shows_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        export::serialize(self.filtered_sorted(), R::schema().export_columns)
    }
}

impl<R: Record> Default for TableView<R> {
    fn default() -> Self {
        Self::new()
    }
}
