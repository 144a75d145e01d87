use super::browse::emit_with;
use crate::{
    catalogue::GeometryCatalogue,
    error::{Error, StoreErrorKind},
    export::ChoroplethRenderer,
    store::{JudgmentStore, YearBucket},
};
use std::sync::Arc;
use verdictmap_core::{
    db::{JoinSummary, JoinedRecord, RegionJoiner},
    obs::{MetricsEvent, MetricsSink},
};

///
/// RegionTable
/// The joined table for one year bucket.
///

#[derive(Clone, Debug)]
pub struct RegionTable {
    pub year: YearBucket,
    pub records: Vec<JoinedRecord>,
    pub summary: JoinSummary,
}

impl RegionTable {
    /// Records that carry a count, in catalogue order.
    pub fn counted(&self) -> impl Iterator<Item = &JoinedRecord> {
        self.records.iter().filter(|r| r.has_count())
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.records.iter().filter_map(|r| r.count).sum()
    }
}

///
/// MapSession
///
/// Holds the shared geometry catalogue and the region table for the
/// year currently selected.
///

pub struct MapSession {
    catalogue: Arc<GeometryCatalogue>,
    current: Option<RegionTable>,
    debug: bool,
    metrics: Option<&'static dyn MetricsSink>,
}

impl MapSession {
    #[must_use]
    pub const fn new(catalogue: Arc<GeometryCatalogue>) -> Self {
        Self {
            catalogue,
            current: None,
            debug: false,
            metrics: None,
        }
    }

    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub fn catalogue(&self) -> &GeometryCatalogue {
        &self.catalogue
    }

    #[must_use]
    pub const fn current(&self) -> Option<&RegionTable> {
        self.current.as_ref()
    }

    /// Load one year's aggregates and join them onto the catalogue.
    ///
    /// Aggregates naming a region the catalogue does not know are dropped
    /// and logged; they never fail the selection.
    pub fn select_year<S: JudgmentStore>(
        &mut self,
        store: &S,
        year: YearBucket,
    ) -> Result<&RegionTable, Error> {
        let aggregates = store.aggregates_for_year(year)?;
        let outcome = RegionJoiner::join(&aggregates, self.catalogue.records());
        let summary = outcome.summary;

        emit_with(
            self.metrics,
            MetricsEvent::JoinFinished {
                geometries: summary.geometries as u64,
                matched: summary.matched as u64,
                dropped_aggregates: summary.dropped_aggregates.len() as u64,
            },
        );

        if !summary.dropped_aggregates.is_empty() {
            tracing::warn!(
                %year,
                dropped = ?summary.dropped_aggregates,
                "aggregate rows name regions missing from the catalogue"
            );
        }
        if self.debug {
            tracing::debug!(
                %year,
                aggregates = aggregates.len(),
                geometries = summary.geometries,
                matched = summary.matched,
                duplicates = summary.duplicate_aggregates,
                "region join finished"
            );
        }
        tracing::info!(%year, matched = summary.matched, of = summary.geometries, "year selected");

        Ok(&*self.current.insert(RegionTable {
            year,
            records: outcome.records,
            summary,
        }))
    }

    /// Same as [`Self::select_year`], taking the label as typed.
    pub fn select_year_label<S: JudgmentStore>(
        &mut self,
        store: &S,
        label: &str,
    ) -> Result<&RegionTable, Error> {
        let year = label.parse()?;

        self.select_year(store, year)
    }

    /// Hand the current table to a renderer.
    pub fn export<R: ChoroplethRenderer>(&self, renderer: &R) -> Result<R::Output, Error> {
        let table = self.current.as_ref().ok_or_else(|| {
            Error::store(StoreErrorKind::UnknownYear, "no year has been selected")
        })?;

        renderer.render(&table.records)
    }
}
