use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use verdictmap_core::{
    db::{PageEdge, PagerError, RegionError, ResultSetError},
    error::{ErrorOrigin as CoreErrorOrigin, InternalError},
    geometry::GeometryError,
};

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    pub(crate) fn store(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store(kind), ErrorOrigin::Store, message)
    }

    pub(crate) fn catalogue(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Catalogue, ErrorOrigin::Catalogue, message)
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, message)
    }

    pub(crate) fn export(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Export, ErrorOrigin::Export, message)
    }

    /// Short message for the person at the keyboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match &self.kind {
            ErrorKind::Page(PageErrorKind::EmptyInput) => "No result!".to_string(),
            ErrorKind::Page(PageErrorKind::AtFirstPage) => {
                "This is already the first page!".to_string()
            }
            ErrorKind::Page(PageErrorKind::AtLastPage) => {
                "This is already the last page!".to_string()
            }
            ErrorKind::Page(PageErrorKind::OutOfRange) => {
                format!("Page not available: {}", self.message)
            }
            ErrorKind::Store(StoreErrorKind::UnknownYear) => {
                "You must select one Year to search.".to_string()
            }
            _ => self.message.clone(),
        }
    }

    #[must_use]
    pub const fn is_page_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Page(_))
    }
}

impl From<PagerError> for Error {
    fn from(err: PagerError) -> Self {
        let kind = match err {
            PagerError::EmptyInput => PageErrorKind::EmptyInput,
            PagerError::PageOutOfRange { .. } => PageErrorKind::OutOfRange,
            PagerError::AtBoundary {
                edge: PageEdge::First,
            } => PageErrorKind::AtFirstPage,
            PagerError::AtBoundary {
                edge: PageEdge::Last,
            } => PageErrorKind::AtLastPage,
        };

        Self::new(ErrorKind::Page(kind), ErrorOrigin::Pager, err.to_string())
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        match err.pager_detail() {
            Some(pager) => pager.clone().into(),
            None => Self::new(ErrorKind::Internal, err.origin.into(), err.message),
        }
    }
}

impl From<ResultSetError> for Error {
    fn from(err: ResultSetError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<RegionError> for Error {
    fn from(err: RegionError) -> Self {
        Self::new(
            ErrorKind::Store(StoreErrorKind::Malformed),
            ErrorOrigin::Region,
            err.to_string(),
        )
    }
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::catalogue(err.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::store(StoreErrorKind::Unavailable, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Internal, ErrorOrigin::Serialize, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Page(PageErrorKind),
    Store(StoreErrorKind),
    Catalogue,
    Config,
    Export,

    /// The caller cannot remediate this.
    Internal,
}

///
/// PageErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PageErrorKind {
    /// No result set exists to navigate.
    EmptyInput,

    /// Requested page number is outside the page range.
    OutOfRange,

    /// Navigation ran past page 1.
    AtFirstPage,

    /// Navigation ran past the last page.
    AtLastPage,
}

///
/// StoreErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    /// Database could not be opened or queried.
    Unavailable,

    /// Year label is not one of the known buckets.
    UnknownYear,

    /// Rows came back in a shape the caller cannot read.
    Malformed,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Catalogue,
    Config,
    Export,
    Geometry,
    Pager,
    Region,
    Result,
    Serialize,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Geometry => Self::Geometry,
            CoreErrorOrigin::Pager => Self::Pager,
            CoreErrorOrigin::Region => Self::Region,
            CoreErrorOrigin::Result => Self::Result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_errors_map_to_distinct_user_messages() {
        let empty: Error = PagerError::EmptyInput.into();
        let first: Error = PagerError::AtBoundary {
            edge: PageEdge::First,
        }
        .into();
        let last: Error = PagerError::AtBoundary {
            edge: PageEdge::Last,
        }
        .into();
        let range: Error = PagerError::PageOutOfRange {
            page: 9,
            page_count: 3,
        }
        .into();

        assert_eq!(empty.user_message(), "No result!");
        assert_eq!(first.user_message(), "This is already the first page!");
        assert_eq!(last.user_message(), "This is already the last page!");
        assert_eq!(
            range.user_message(),
            "Page not available: page 9 is outside 1..=3"
        );
        assert!(range.is_page_error());
    }

    #[test]
    fn internal_error_with_pager_detail_keeps_page_kind() {
        let internal = InternalError::from(PagerError::EmptyInput);
        let err: Error = internal.into();

        assert_eq!(err.kind, ErrorKind::Page(PageErrorKind::EmptyInput));
        assert_eq!(err.origin, ErrorOrigin::Pager);
    }

    #[test]
    fn result_shape_errors_are_internal() {
        let err: Error = ResultSetError::ArityMismatch {
            row: 0,
            expected: 2,
            found: 1,
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.origin, ErrorOrigin::Result);
    }

    #[test]
    fn error_round_trips_through_json() {
        let err = Error::store(StoreErrorKind::UnknownYear, "year '111' is not a bucket");
        let json = serde_json::to_string(&err).expect("error should serialize");
        let back: Error = serde_json::from_str(&json).expect("error should deserialize");

        assert_eq!(back, err);
    }
}
