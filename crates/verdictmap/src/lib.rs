//! ## Crate layout
//! - `catalogue`: the GeoJSON geometry catalogue, loaded once and shared.
//! - `config`: host configuration with defaults for every field.
//! - `error`: the public error taxonomy and user-facing messages.
//! - `export`: the rendering boundary and the GeoJSON exporter.
//! - `session`: browse and map sessions owning the current result/table.
//! - `store`: the judgment store boundary and its SQLite adapter.
//!
//! The pure pager and join live in `core` (`verdictmap-core`).

pub use verdictmap_core as core;

pub mod catalogue;
pub mod config;
pub mod error;
pub mod export;
pub mod session;
pub mod store;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        catalogue::GeometryCatalogue,
        config::Config,
        error::{Error, ErrorKind, PageErrorKind, StoreErrorKind},
        export::{ChoroplethRenderer, GeoJsonExporter},
        session::{BrowseSession, MapSession, PageView, RegionTable, SearchOutcome},
        store::{JudgmentStore, SqliteStore, YearBucket},
    };
    pub use verdictmap_core::prelude::*;
}
