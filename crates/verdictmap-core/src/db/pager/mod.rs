//! Module: db::pager
//! Responsibility: fixed-size page slicing over one materialized result set.
//! Does not own: query execution, rendering, or per-session cursor storage.
//! Boundary: pure navigation contract consumed by the hosting session.

mod state;


use crate::db::result::{ColumnSchema, ResultSet, Row};
use derive_more::Display;
use std::{num::NonZeroUsize, ops::Range};
use thiserror::Error as ThisError;

// re-exports
pub use state::PageState;

///
/// CONSTANTS
///

/// Rows shown per page unless the host overrides it.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(10).expect("10 is non-zero");

///
/// PageEdge
/// Which end of the page range a rejected navigation ran into.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum PageEdge {
    #[display("first")]
    First,
    #[display("last")]
    Last,
}

///
/// PagerError
///
/// Recoverable navigation failures.
/// `EmptyInput` means no data exists; the other two mean data exists but
/// the requested move is invalid.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PagerError {
    #[error("no result set is available")]
    EmptyInput,

    #[error("page {page} is outside 1..={page_count}")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("already at the {edge} page")]
    AtBoundary { edge: PageEdge },
}

///
/// Page
/// One page of rows plus its 1-based page number.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page<'a> {
    pub number: usize,
    pub rows: &'a [Row],
}

impl Page<'_> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

///
/// ResultPager
///
/// Owns one result set and hands out read-only page slices.
/// Zero rows is a valid input and yields exactly one empty page.
///

#[derive(Clone, Debug)]
pub struct ResultPager {
    rows: ResultSet,
    page_size: NonZeroUsize,
}

impl ResultPager {
    /// Wrap a result set; `None` (no query result at all) is rejected.
    pub fn new(rows: Option<ResultSet>, page_size: NonZeroUsize) -> Result<Self, PagerError> {
        let rows = rows.ok_or(PagerError::EmptyInput)?;

        Ok(Self { rows, page_size })
    }

    pub fn with_default_page_size(rows: Option<ResultSet>) -> Result<Self, PagerError> {
        Self::new(rows, DEFAULT_PAGE_SIZE)
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size.get()
    }

    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn result_set(&self) -> &ResultSet {
        &self.rows
    }

    #[must_use]
    pub const fn columns(&self) -> &ColumnSchema {
        self.rows.columns()
    }

    /// `max(1, ceil(rows / page_size))`.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        let pages = self.rows.len().div_ceil(self.page_size.get());
        if pages == 0 { 1 } else { pages }
    }

    /// Row offsets covered by page `n`.
    pub fn page_bounds(&self, n: usize) -> Result<Range<usize>, PagerError> {
        self.check_page(n)?;

        let size = self.page_size.get();
        let start = (n - 1) * size;
        let end = (start + size).min(self.rows.len());

        Ok(start..end)
    }

    pub fn page(&self, n: usize) -> Result<&[Row], PagerError> {
        let bounds = self.page_bounds(n)?;

        Ok(&self.rows.rows()[bounds])
    }

    #[must_use]
    pub fn first(&self) -> Page<'_> {
        self.page_unchecked(1)
    }

    #[must_use]
    pub fn last(&self) -> Page<'_> {
        self.page_unchecked(self.page_count())
    }

    pub fn next(&self, current: usize) -> Result<Page<'_>, PagerError> {
        self.check_page(current)?;
        if current == self.page_count() {
            return Err(PagerError::AtBoundary {
                edge: PageEdge::Last,
            });
        }

        self.numbered(current + 1)
    }

    pub fn previous(&self, current: usize) -> Result<Page<'_>, PagerError> {
        self.check_page(current)?;
        if current == 1 {
            return Err(PagerError::AtBoundary {
                edge: PageEdge::First,
            });
        }

        self.numbered(current - 1)
    }

    /// Fetch page `n` together with its number.
    pub fn numbered(&self, n: usize) -> Result<Page<'_>, PagerError> {
        Ok(Page {
            number: n,
            rows: self.page(n)?,
        })
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    const fn check_page(&self, n: usize) -> Result<(), PagerError> {
        let page_count = self.page_count();
        if n == 0 || n > page_count {
            return Err(PagerError::PageOutOfRange { page: n, page_count });
        }

        Ok(())
    }

    // `1` and `page_count()` are always in range.
    fn page_unchecked(&self, n: usize) -> Page<'_> {
        let size = self.page_size.get();
        let start = ((n - 1) * size).min(self.rows.len());
        let end = (start + size).min(self.rows.len());

        Page {
            number: n,
            rows: &self.rows.rows()[start..end],
        }
    }
}
