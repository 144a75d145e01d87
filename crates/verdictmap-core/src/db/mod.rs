//! Tabular data processing: materialized results, paging, and region joins.

pub mod pager;
pub mod region;
pub mod result;

// re-exports
pub use pager::{DEFAULT_PAGE_SIZE, Page, PageEdge, PageState, PagerError, ResultPager};
pub use region::{
    AggregateRecord, GeometryRecord, JoinOutcome, JoinSummary, JoinedRecord, RegionError,
    RegionJoiner, join_regions,
};
pub use result::{ColumnSchema, ResultSet, ResultSetError, Row};
