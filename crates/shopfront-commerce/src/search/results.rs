//! Search responses and pagination.

use crate::catalog::Product;
use serde::{Deserialize, Deserializer, Serialize};

/// One page from the search endpoint.
///
/// Missing or `null` fields default to an empty page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Product>,
    /// Matches for the whole query, independent of pagination.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

impl SearchPage {
    /// Create a page.
    pub fn new(results: Vec<Product>, total: u64) -> Self {
        Self { results, total }
    }

    /// Check if the page has no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Offset-based pagination info for a load-more list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Offset of the last page loaded.
    pub offset: u32,
    /// Items per page.
    pub limit: u32,
    /// Items currently shown.
    pub shown: u64,
    /// Total number of items.
    pub total: u64,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(offset: u32, limit: u32, shown: u64, total: u64) -> Self {
        Self {
            offset,
            limit,
            shown,
            total,
        }
    }

    /// Whether another page exists.
    pub fn has_more(&self) -> bool {
        self.shown < self.total
    }

    /// Offset the next page would be requested at.
    pub fn next_offset(&self) -> u32 {
        self.offset.saturating_add(self.limit)
    }

    /// Number of pages loaded so far (1-indexed).
    pub fn pages_loaded(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 || self.limit == 0 {
            1
        } else {
            self.total.div_ceil(u64::from(self.limit))
        }
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> u64 {
        if self.shown == 0 {
            0
        } else {
            1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        self.shown
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, 20, 0, 0)
    }
}
