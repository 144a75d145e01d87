//! Metrics sink boundary.
//!
//! Callers MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use std::cell::Cell;

thread_local! {
    static SINK_OVERRIDE: Cell<Option<&'static dyn MetricsSink>> = const { Cell::new(None) };
}

///
/// RejectKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RejectKind {
    EmptyInput,
    OutOfRange,
    AtBoundary,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ResultLoaded {
        rows: u64,
    },
    PageServed {
        page: u64,
        rows: u64,
    },
    NavigationRejected {
        reason: RejectKind,
    },
    JoinFinished {
        geometries: u64,
        matched: u64,
        dropped_aggregates: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Sync {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ResultLoaded { rows } => metrics::with_state_mut(|m| {
                m.ops.results_loaded = m.ops.results_loaded.saturating_add(1);
                m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows);
            }),

            MetricsEvent::PageServed { page, rows } => metrics::with_state_mut(|m| {
                m.ops.pages_served = m.ops.pages_served.saturating_add(1);
                m.ops.rows_served = m.ops.rows_served.saturating_add(rows);
                m.ops.max_page_seen = m.ops.max_page_seen.max(page);
            }),

            MetricsEvent::NavigationRejected { reason } => metrics::with_state_mut(|m| match reason {
                RejectKind::EmptyInput => {
                    m.ops.rejected_empty = m.ops.rejected_empty.saturating_add(1);
                }
                RejectKind::OutOfRange => {
                    m.ops.rejected_out_of_range = m.ops.rejected_out_of_range.saturating_add(1);
                }
                RejectKind::AtBoundary => {
                    m.ops.rejected_boundary = m.ops.rejected_boundary.saturating_add(1);
                }
            }),

            MetricsEvent::JoinFinished {
                geometries,
                matched,
                dropped_aggregates,
            } => metrics::with_state_mut(|m| {
                m.ops.joins = m.ops.joins.saturating_add(1);
                m.ops.join_geometries = m.ops.join_geometries.saturating_add(geometries);
                m.ops.join_matched = m.ops.join_matched.saturating_add(matched);
                m.ops.join_dropped_aggregates = m
                    .ops
                    .join_dropped_aggregates
                    .saturating_add(dropped_aggregates);
            }),
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the scoped override, or the global counters.
pub fn record(event: MetricsEvent) {
    match SINK_OVERRIDE.with(Cell::get) {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &'static dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<&'static dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| cell.set(self.0));
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.replace(Some(sink)));
    let _guard = Guard(prev);

    f()
}
