use crate::{error::Error, store::JudgmentStore};
use std::num::NonZeroUsize;
use verdictmap_core::{
    db::{ColumnSchema, DEFAULT_PAGE_SIZE, Page, PageState, PagerError, ResultPager, Row},
    obs::{
        MetricsEvent, RejectKind,
        sink::{self, MetricsSink},
    },
};

/// Column carrying the judgment id in `caml` rows.
const JID_COLUMN: &str = "JID";

///
/// SearchOutcome
/// Summary of a finished search, for the host's header line.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchOutcome {
    pub jid: String,
    pub total_rows: usize,
    pub page_count: usize,
}

impl SearchOutcome {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_rows == 0
    }
}

///
/// PageView
/// One rendered page plus the cursor it came from.
///

#[derive(Clone, Copy, Debug)]
pub struct PageView<'a> {
    pub page: Page<'a>,
    pub state: PageState,
    pub columns: &'a ColumnSchema,
    page_size: usize,
}

impl<'a> PageView<'a> {
    #[must_use]
    pub const fn rows(&self) -> &'a [Row] {
        self.page.rows
    }

    /// 1-based overall row number of the first row on this page.
    #[must_use]
    pub const fn first_row_number(&self) -> usize {
        (self.page.number - 1) * self.page_size + 1
    }
}

///
/// CurrentResult
///

struct CurrentResult {
    jid: String,
    pager: ResultPager,
    state: PageState,
}

///
/// BrowseSession
///
/// Owns the store handle and the result currently on screen.
///

pub struct BrowseSession<S: JudgmentStore> {
    store: S,
    page_size: NonZeroUsize,
    current: Option<CurrentResult>,
    debug: bool,
    metrics: Option<&'static dyn MetricsSink>,
}

impl<S: JudgmentStore> BrowseSession<S> {
    // ------------------------------------------------------------------
    // Session configuration
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
            current: None,
            debug: false,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Enable debug logging for operations in this session.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Override the metrics sink for operations in this session.
    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn list_jids(&self) -> Result<Vec<String>, Error> {
        self.store.list_jids()
    }

    /// Run the per-judgment query and make its rows the current result.
    ///
    /// A query that matches nothing still replaces the current result;
    /// browsing it shows one empty page.
    pub fn search_by_jid(&mut self, jid: &str) -> Result<SearchOutcome, Error> {
        let rows = self.store.rows_by_jid(jid)?;
        let pager = ResultPager::new(Some(rows), self.page_size)?;
        let state = PageState::for_pager(&pager);

        let outcome = SearchOutcome {
            jid: jid.to_string(),
            total_rows: state.total_rows(),
            page_count: state.page_count(),
        };
        self.emit(MetricsEvent::ResultLoaded {
            rows: outcome.total_rows as u64,
        });

        if outcome.is_empty() {
            tracing::warn!(jid, "no data match the query");
        } else {
            tracing::info!(
                jid,
                rows = outcome.total_rows,
                pages = outcome.page_count,
                "search finished"
            );
        }

        self.current = Some(CurrentResult {
            jid: outcome.jid.clone(),
            pager,
            state,
        });

        Ok(outcome)
    }

    /// Drop the current result.
    pub fn clear(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn current_jid(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.jid.as_str())
    }

    #[must_use]
    pub fn total_rows(&self) -> Option<usize> {
        self.current.as_ref().map(|c| c.state.total_rows())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Re-render the page the cursor is on.
    pub fn current_page(&mut self) -> Result<PageView<'_>, Error> {
        self.navigate("current", |state, pager| pager.numbered(state.current()))
    }

    /// Page picker: jump to page `n`.
    pub fn show_page(&mut self, n: usize) -> Result<PageView<'_>, Error> {
        self.navigate("show", |state, pager| state.go_to(pager, n))
    }

    pub fn first_page(&mut self) -> Result<PageView<'_>, Error> {
        self.navigate("first", |state, pager| state.go_first(pager))
    }

    pub fn last_page(&mut self) -> Result<PageView<'_>, Error> {
        self.navigate("last", |state, pager| state.go_last(pager))
    }

    pub fn next_page(&mut self) -> Result<PageView<'_>, Error> {
        self.navigate("next", |state, pager| state.go_next(pager))
    }

    pub fn previous_page(&mut self) -> Result<PageView<'_>, Error> {
        self.navigate("previous", |state, pager| state.go_previous(pager))
    }

    /// Judgment id of the `row`-th row (0-based) on the current page.
    pub fn jid_at(&self, row: usize) -> Result<Option<String>, Error> {
        let current = self.current.as_ref().ok_or(PagerError::EmptyInput)?;
        let bounds = current.pager.page_bounds(current.state.current())?;
        if row >= bounds.len() {
            return Ok(None);
        }
        let absolute = bounds.start + row;

        Ok(current
            .pager
            .result_set()
            .value(absolute, JID_COLUMN)
            .filter(|v| !v.is_null())
            .map(ToString::to_string))
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn navigate<F>(&mut self, action: &'static str, op: F) -> Result<PageView<'_>, Error>
    where
        F: for<'p> FnOnce(&mut PageState, &'p ResultPager) -> Result<Page<'p>, PagerError>,
    {
        let debug = self.debug;
        let metrics = self.metrics;
        let page_size = self.page_size.get();

        let Some(current) = self.current.as_mut() else {
            emit_with(metrics, reject_event(&PagerError::EmptyInput));
            return Err(PagerError::EmptyInput.into());
        };

        let CurrentResult { pager, state, .. } = current;
        let pager: &ResultPager = pager;
        match op(state, pager) {
            Ok(page) => {
                emit_with(
                    metrics,
                    MetricsEvent::PageServed {
                        page: page.number as u64,
                        rows: page.rows.len() as u64,
                    },
                );
                if debug {
                    tracing::debug!(
                        action,
                        page = page.number,
                        of = state.page_count(),
                        rows = page.rows.len(),
                        "page served"
                    );
                }

                Ok(PageView {
                    page,
                    state: *state,
                    columns: pager.columns(),
                    page_size,
                })
            }
            Err(err) => {
                emit_with(metrics, reject_event(&err));
                if debug {
                    tracing::debug!(action, current = state.current(), %err, "navigation rejected");
                }

                Err(err.into())
            }
        }
    }

    fn emit(&self, event: MetricsEvent) {
        emit_with(self.metrics, event);
    }
}

const fn reject_event(err: &PagerError) -> MetricsEvent {
    let reason = match err {
        PagerError::EmptyInput => RejectKind::EmptyInput,
        PagerError::PageOutOfRange { .. } => RejectKind::OutOfRange,
        PagerError::AtBoundary { .. } => RejectKind::AtBoundary,
    };

    MetricsEvent::NavigationRejected { reason }
}

pub(super) fn emit_with(metrics: Option<&'static dyn MetricsSink>, event: MetricsEvent) {
    match metrics {
        Some(sink) => sink.record(event),
        None => sink::record(event),
    }
}
