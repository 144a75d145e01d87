//! Core runtime for VerdictMap: scalar values, materialized result sets,
//! the result pager, the region join, boundary descriptors, and metrics.
//!
//! Everything here works on in-memory data only; stores, catalogues, and
//! renderers live in the `verdictmap` facade.
#![warn(unreachable_pub)]

pub mod db;
pub mod error;
pub mod geometry;
pub mod obs;
pub mod value;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        db::{
            AggregateRecord, ColumnSchema, GeometryRecord, JoinedRecord, Page, PageEdge,
            PageState, PagerError, RegionJoiner, ResultPager, ResultSet, Row,
        },
        geometry::Boundary,
        value::Value,
    };
}
