use crate::{
    db::{pager::PagerError, region::RegionError, result::ResultSetError},
    geometry::GeometryError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured core error with a stable classification.
/// Every module-level core error converts into this shape so callers can
/// classify failures without matching on each module's enum.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub const fn pager_detail(&self) -> Option<&PagerError> {
        match &self.detail {
            Some(ErrorDetail::Pager(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Pager(PagerError),
}

impl From<PagerError> for InternalError {
    fn from(err: PagerError) -> Self {
        let class = match err {
            PagerError::EmptyInput => ErrorClass::NotFound,
            PagerError::PageOutOfRange { .. } | PagerError::AtBoundary { .. } => {
                ErrorClass::Navigation
            }
        };

        Self {
            class,
            origin: ErrorOrigin::Pager,
            message: err.to_string(),
            detail: Some(ErrorDetail::Pager(err)),
        }
    }
}

impl From<ResultSetError> for InternalError {
    fn from(err: ResultSetError) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Result,
            err.to_string(),
        )
    }
}

impl From<RegionError> for InternalError {
    fn from(err: RegionError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Region, err.to_string())
    }
}

impl From<GeometryError> for InternalError {
    fn from(err: GeometryError) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Geometry,
            err.to_string(),
        )
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Navigation,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Navigation => "navigation",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Geometry,
    Pager,
    Region,
    Result,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Geometry => "geometry",
            Self::Pager => "pager",
            Self::Region => "region",
            Self::Result => "result",
        };
        write!(f, "{label}")
    }
}
