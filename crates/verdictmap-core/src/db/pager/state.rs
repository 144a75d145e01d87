use crate::db::pager::{Page, PageEdge, PagerError, ResultPager};

///
/// PageState
///
/// Cursor over one pager: which page the user is looking at.
/// Holds `1 <= current <= page_count`; a rejected move leaves it unchanged.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageState {
    current: usize,
    total_rows: usize,
    page_count: usize,
}

impl PageState {
    /// Start on page 1 of the given pager.
    #[must_use]
    pub const fn for_pager(pager: &ResultPager) -> Self {
        Self {
            current: 1,
            total_rows: pager.total_rows(),
            page_count: pager.page_count(),
        }
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.current == 1
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current == self.page_count
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Jump to page 1; rejected when already there.
    pub fn go_first<'a>(&mut self, pager: &'a ResultPager) -> Result<Page<'a>, PagerError> {
        if self.is_first() {
            return Err(PagerError::AtBoundary {
                edge: PageEdge::First,
            });
        }

        Ok(self.settle(pager.first()))
    }

    /// Jump to the last page; rejected when already there.
    pub fn go_last<'a>(&mut self, pager: &'a ResultPager) -> Result<Page<'a>, PagerError> {
        if self.is_last() {
            return Err(PagerError::AtBoundary {
                edge: PageEdge::Last,
            });
        }

        Ok(self.settle(pager.last()))
    }

    pub fn go_next<'a>(&mut self, pager: &'a ResultPager) -> Result<Page<'a>, PagerError> {
        pager.next(self.current).map(|page| self.settle(page))
    }

    pub fn go_previous<'a>(&mut self, pager: &'a ResultPager) -> Result<Page<'a>, PagerError> {
        pager.previous(self.current).map(|page| self.settle(page))
    }

    /// Jump to an explicit page (the page picker). Re-selecting the current
    /// page is allowed and simply re-renders it.
    pub fn go_to<'a>(&mut self, pager: &'a ResultPager, n: usize) -> Result<Page<'a>, PagerError> {
        pager.numbered(n).map(|page| self.settle(page))
    }

    const fn settle<'a>(&mut self, page: Page<'a>) -> Page<'a> {
        self.current = page.number;
        page
    }
}
