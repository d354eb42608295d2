//! Local presentation parameters of one table.

use thiserror::Error;

use super::schema::{Record, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "\u{25b2}",
            SortDirection::Desc => "\u{25bc}",
        }
    }
}

/// Row filter: match everything, or one field equal to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPredicate {
    All,
    Equals { field: &'static str, value: String },
}

impl FilterPredicate {
    pub fn accepts<R: Record>(&self, record: &R) -> bool {
        match self {
            FilterPredicate::All => true,
            FilterPredicate::Equals { field, value } => record.field(field).matches(value),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FilterPredicate::All => "all",
            FilterPredicate::Equals { value, .. } => value,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("column '{0}' cannot be sorted")]
    NotSortable(String),

    #[error("column '{0}' cannot be filtered")]
    NotFilterable(String),
}

/// Sort, filter, and page of one table.
///
/// Any change to sort or filter puts the view back on page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    sort_field: &'static str,
    sort_direction: SortDirection,
    filter: FilterPredicate,
    page: usize,
}

impl ViewState {
    /// Fresh view: schema's default sort field, descending, no filter, page 1.
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            sort_field: schema.default_sort,
            sort_direction: SortDirection::Desc,
            filter: FilterPredicate::All,
            page: 1,
        }
    }

    pub fn sort_field(&self) -> &'static str {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Header click: the active field flips direction, a new field starts descending.
    pub fn sort_by(&mut self, schema: &Schema, field: &str) -> Result<(), ViewError> {
        let def = schema
            .field(field)
            .filter(|f| f.sortable)
            .ok_or_else(|| ViewError::NotSortable(field.to_string()))?;

        if self.sort_field == def.key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = def.key;
            self.sort_direction = SortDirection::Desc;
        }
        self.page = 1;
        Ok(())
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
        self.page = 1;
    }

    pub fn set_filter(&mut self, filter: FilterPredicate) {
        self.filter = filter;
        self.page = 1;
    }

    /// Filter the schema's filterable field by `value`; `"all"` clears the filter.
    pub fn filter_by(&mut self, schema: &Schema, value: &str) -> Result<(), ViewError> {
        let filterable = schema
            .filter
            .ok_or_else(|| ViewError::NotFilterable(schema.name.to_string()))?;
        if value.eq_ignore_ascii_case("all") {
            self.set_filter(FilterPredicate::All);
        } else {
            self.set_filter(FilterPredicate::Equals {
                field: filterable.field,
                value: value.to_string(),
            });
        }
        Ok(())
    }

    /// Advance to the next offered filter value, wrapping back to "all".
    pub fn cycle_filter(&mut self, schema: &Schema) -> Result<(), ViewError> {
        let filterable = schema
            .filter
            .ok_or_else(|| ViewError::NotFilterable(schema.name.to_string()))?;
        let next = match &self.filter {
            FilterPredicate::All => filterable.options.first().copied(),
            FilterPredicate::Equals { value, .. } => filterable
                .options
                .iter()
                .position(|o| o.eq_ignore_ascii_case(value))
                .and_then(|i| filterable.options.get(i + 1).copied()),
        };
        self.filter_by(schema, next.unwrap_or("all"))
    }

    /// Set the page without clamping; the engine returns an empty page when out of range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Next page, clamped to `total_pages`.
    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    /// Previous page, clamped to 1.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Pull the page back into `[1, total_pages]`.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }
}
