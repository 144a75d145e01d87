//! Observability: in-process counters and the sink they flow through.
//!
//! Pager and joiner stay pure; the hosting session reports what it did
//! through [`sink::record`].

pub(crate) mod metrics;
pub mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState};
pub use sink::{MetricsEvent, MetricsSink, RejectKind, metrics_report, metrics_reset_all};
