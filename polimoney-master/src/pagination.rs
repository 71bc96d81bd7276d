//! Pagination and batching utilities
//!
//! Reads page through the municipality registry with fixed-size
//! LIMIT/OFFSET windows; writes are split into fixed-size batches.

/// A LIMIT/OFFSET read window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Page number (0-indexed)
    pub index: usize,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: usize,
    /// Maximum rows to return
    pub limit: usize,
}

impl Page {
    /// First page for the given page size
    pub fn first(page_size: usize) -> Self {
        Self {
            index: 0,
            offset: 0,
            limit: page_size,
        }
    }

    /// The page immediately after this one
    pub fn next(&self) -> Self {
        Self {
            index: self.index + 1,
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }

    /// Whether a page returning `returned` rows may be followed by more rows
    ///
    /// Only an exactly full page continues pagination; a short or empty page
    /// is the last one.
    pub fn has_more(&self, returned: usize) -> bool {
        returned == self.limit
    }
}

/// A slice range written in one insert call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// Batch number (1-indexed, as reported in logs)
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `total` rows into consecutive batches of at most `batch_size`
///
/// Returns no batches for zero rows. `batch_size` must be non-zero.
///
/// # Examples
/// ```
/// use polimoney_master::pagination::batches;
///
/// // 1200 rows = 3 batches (500 + 500 + 200)
/// let b = batches(1200, 500);
/// assert_eq!(b.len(), 3);
/// assert_eq!(b[2].index, 3);
/// assert_eq!(b[2].len(), 200);
/// ```
pub fn batches(total: usize, batch_size: usize) -> Vec<Batch> {
    debug_assert!(batch_size > 0, "batch_size must be non-zero");

    (0..total)
        .step_by(batch_size.max(1))
        .enumerate()
        .map(|(i, start)| Batch {
            index: i + 1,
            start,
            end: (start + batch_size.max(1)).min(total),
        })
        .collect()
}
