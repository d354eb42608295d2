//! Immutable, timestamped record batches.

use chrono::{DateTime, Utc};

/// Records fetched from one remote call.
///
/// There is no way to mutate the records after construction; a refetch builds
/// a new snapshot and replaces the old one wholesale.
#[derive(Debug, Clone)]
pub struct Snapshot<R> {
    records: Vec<R>,
    fetched_at: DateTime<Utc>,
}

impl<R> Snapshot<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self::at(records, Utc::now())
    }

    pub fn at(records: Vec<R>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            records,
            fetched_at,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self::empty()
    }
}
