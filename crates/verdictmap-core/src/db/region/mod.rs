//! Module: db::region
//! Responsibility: name-keyed join of per-region counts onto the geometry catalogue.
//! Does not own: catalogue loading, aggregate queries, or rendering.
//! Boundary: produces the joined table handed unmodified to the renderer.


use crate::{db::result::ResultSet, geometry::Boundary, value::Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error as ThisError;

///
/// RegionError
/// Aggregate rows that cannot be read as `(name, count, code)`.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegionError {
    #[error("aggregate result has {found} columns, expected at least {expected}")]
    Shape { expected: usize, found: usize },

    #[error("aggregate row {row} is past the end of {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    #[error("aggregate row {row} has no region name")]
    MissingName { row: usize },

    #[error("aggregate row {row} has invalid count '{value}'")]
    InvalidCount { row: usize, value: String },
}

///
/// AggregateRecord
/// Judgment count for one region in one year bucket.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateRecord {
    pub region_name: String,
    pub count: u64,
    pub region_code: Option<String>,
}

impl AggregateRecord {
    pub fn new(
        region_name: impl Into<String>,
        count: u64,
        region_code: Option<impl Into<String>>,
    ) -> Self {
        Self {
            region_name: region_name.into(),
            count,
            region_code: region_code.map(Into::into),
        }
    }

    /// Read row `row` of an aggregate query result.
    ///
    /// Columns are positional: region name, count, then an optional
    /// region code. A null or empty code reads as absent.
    pub fn from_row(set: &ResultSet, row: usize) -> Result<Self, RegionError> {
        let found = set.columns().len();
        if found < 2 {
            return Err(RegionError::Shape { expected: 2, found });
        }

        let Some(cells) = set.rows().get(row) else {
            return Err(RegionError::RowOutOfRange {
                row,
                len: set.len(),
            });
        };

        let region_name = match &cells[0] {
            Value::Text(name) if !name.is_empty() => name.clone(),
            _ => return Err(RegionError::MissingName { row }),
        };

        let count = cells[1]
            .as_count()
            .ok_or_else(|| RegionError::InvalidCount {
                row,
                value: format!("{:?}", cells[1]),
            })?;

        let region_code = cells
            .get(2)
            .filter(|code| !code.is_null())
            .map(ToString::to_string)
            .filter(|code| !code.is_empty());

        Ok(Self {
            region_name,
            count,
            region_code,
        })
    }

    /// Read every row of an aggregate query result, in order.
    pub fn from_result_set(set: &ResultSet) -> Result<Vec<Self>, RegionError> {
        (0..set.len()).map(|row| Self::from_row(set, row)).collect()
    }
}

///
/// GeometryRecord
/// One catalogue entry: region name plus its boundary.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GeometryRecord {
    pub region_name: String,
    pub boundary: Boundary,
}

impl GeometryRecord {
    pub fn new(region_name: impl Into<String>, boundary: Boundary) -> Self {
        Self {
            region_name: region_name.into(),
            boundary,
        }
    }
}

///
/// JoinedRecord
///
/// A catalogue region annotated with its count.
/// `count == None` means no aggregate row named this region; it is not a zero.
///

#[derive(Clone, Debug, PartialEq)]
pub struct JoinedRecord {
    pub region_name: String,
    pub boundary: Boundary,
    pub count: Option<u64>,
    pub region_code: Option<String>,
}

impl JoinedRecord {
    #[must_use]
    pub const fn has_count(&self) -> bool {
        self.count.is_some()
    }
}

///
/// JoinSummary
/// Join accounting for diagnostics; never an error signal.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JoinSummary {
    pub geometries: usize,
    pub matched: usize,
    pub unmatched_geometries: usize,
    pub duplicate_aggregates: usize,
    pub dropped_aggregates: Vec<String>,
}

///
/// JoinOutcome
///

#[derive(Clone, Debug, PartialEq)]
pub struct JoinOutcome {
    pub records: Vec<JoinedRecord>,
    pub summary: JoinSummary,
}

impl JoinOutcome {
    #[must_use]
    pub fn into_records(self) -> Vec<JoinedRecord> {
        self.records
    }
}

///
/// RegionJoiner
///
/// Geometry is the reference frame: output has exactly one record per
/// geometry, in catalogue order. Aggregates naming no geometry are dropped.
/// Names match by exact string equality.
///

pub struct RegionJoiner;

impl RegionJoiner {
    #[must_use]
    pub fn join(aggregates: &[AggregateRecord], geometries: &[GeometryRecord]) -> JoinOutcome {
        // last write wins on duplicate names
        let by_name: HashMap<&str, &AggregateRecord> = aggregates
            .iter()
            .map(|agg| (agg.region_name.as_str(), agg))
            .collect();

        let mut summary = JoinSummary {
            geometries: geometries.len(),
            duplicate_aggregates: aggregates.len() - by_name.len(),
            ..JoinSummary::default()
        };

        let records: Vec<JoinedRecord> = geometries
            .iter()
            .map(|geom| {
                let hit = by_name.get(geom.region_name.as_str());
                if hit.is_some() {
                    summary.matched += 1;
                } else {
                    summary.unmatched_geometries += 1;
                }

                JoinedRecord {
                    region_name: geom.region_name.clone(),
                    boundary: geom.boundary.clone(),
                    count: hit.map(|agg| agg.count),
                    region_code: hit.and_then(|agg| agg.region_code.clone()),
                }
            })
            .collect();

        let known: HashSet<&str> = geometries
            .iter()
            .map(|geom| geom.region_name.as_str())
            .collect();
        let mut reported = HashSet::new();
        summary.dropped_aggregates = aggregates
            .iter()
            .map(|agg| agg.region_name.as_str())
            .filter(|name| !known.contains(name) && reported.insert(*name))
            .map(str::to_string)
            .collect();

        JoinOutcome { records, summary }
    }
}

/// Join counts onto geometries, discarding the diagnostics.
#[must_use]
pub fn join_regions(
    aggregates: &[AggregateRecord],
    geometries: &[GeometryRecord],
) -> Vec<JoinedRecord> {
    RegionJoiner::join(aggregates, geometries).into_records()
}
