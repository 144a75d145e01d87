//! Host-side sessions.
//!
//! The host owns exactly one "current result" and one "current region
//! table" at a time, held here explicitly instead of as ambient window
//! state. A new search or year selection replaces the previous value whole.

mod browse;
mod map;


// re-exports
pub use browse::{BrowseSession, PageView, SearchOutcome};
pub use map::{MapSession, RegionTable};
