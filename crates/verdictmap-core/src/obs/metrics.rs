use serde::{Deserialize, Serialize};
use std::{cell::RefCell, time::SystemTime};

///
/// EventState
/// Ephemeral, in-memory counters since `since_ms`.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Results
    pub results_loaded: u64,
    pub rows_loaded: u64,

    // Paging
    pub pages_served: u64,
    pub rows_served: u64,
    pub max_page_seen: u64,

    // Rejected navigation
    pub rejected_empty: u64,
    pub rejected_out_of_range: u64,
    pub rejected_boundary: u64,

    // Region joins
    pub joins: u64,
    pub join_geometries: u64,
    pub join_matched: u64,
    pub join_dropped_aggregates: u64,
}

///
/// EventReport
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,

    /// Share of catalogue regions that carried a count, across all joins.
    pub join_coverage: f64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let counters = with_state(Clone::clone);
    let join_coverage = if counters.ops.join_geometries > 0 {
        counters.ops.join_matched as f64 / counters.ops.join_geometries as f64
    } else {
        0.0
    };

    EventReport {
        counters,
        join_coverage,
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
