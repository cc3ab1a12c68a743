//! Failure modes of table operations.
//!
//! A missing key is not an error: lookups and removals report it through
//! `Option`/`bool`. Only allocation can fail: the bucket array on
//! initialization or growth, and the entry arena on insert. A failed call
//! leaves the table exactly as it was.

use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to allocate a bucket array of {capacity} slots")]
    AllocationFailure {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("failed to reserve room for entry {} of the table", .len + 1)]
    EntryAllocationFailure {
        len: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("bucket array of {capacity} slots cannot be doubled without overflow")]
    CapacityOverflow { capacity: usize },
}

impl TableError {
    /// Bucket count the failed allocation was asked for (or the count that
    /// could not be doubled). `None` when the entry arena failed instead.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            TableError::AllocationFailure { capacity, .. } => Some(*capacity),
            TableError::CapacityOverflow { capacity } => Some(*capacity),
            TableError::EntryAllocationFailure { .. } => None,
        }
    }
}
