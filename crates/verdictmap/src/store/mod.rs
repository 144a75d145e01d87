//! Store collaborator: the read-only judgment database.
//!
//! The session only sees [`JudgmentStore`]; the SQLite adapter is one
//! implementation of it.

mod sqlite;

use crate::error::{Error, StoreErrorKind};
use derive_more::Display;
use std::str::FromStr;
use verdictmap_core::db::{AggregateRecord, ResultSet};

// re-exports
pub use sqlite::SqliteStore;

///
/// YearBucket
///
/// The fixed set of period labels that have an aggregate table.
/// Table names come from this enum, never from raw user text.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum YearBucket {
    #[display("107")]
    Y107,
    #[display("108")]
    Y108,
    #[display("109")]
    Y109,
    #[display("110")]
    Y110,
}

impl YearBucket {
    pub const ALL: [Self; 4] = [Self::Y107, Self::Y108, Self::Y109, Self::Y110];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Y107 => "107",
            Self::Y108 => "108",
            Self::Y109 => "109",
            Self::Y110 => "110",
        }
    }

    /// Name of the per-year aggregate table.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        self.label()
    }
}

impl FromStr for YearBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Self::ALL
            .into_iter()
            .find(|year| year.label() == s)
            .ok_or_else(|| {
                Error::store(
                    StoreErrorKind::UnknownYear,
                    format!("year '{s}' is not one of 107, 108, 109, 110"),
                )
            })
    }
}

///
/// JudgmentStore
///
/// Read-only access to the judgment dataset.
///

pub trait JudgmentStore {
    /// Distinct non-null judgment ids, sorted.
    fn list_jids(&self) -> Result<Vec<String>, Error>;

    /// Every judgment row carrying the given id, in store order.
    fn rows_by_jid(&self, jid: &str) -> Result<ResultSet, Error>;

    /// Per-region judgment counts for one year bucket.
    fn aggregates_for_year(&self, year: YearBucket) -> Result<Vec<AggregateRecord>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn year_buckets_parse_from_labels() {
        assert_eq!("108".parse::<YearBucket>(), Ok(YearBucket::Y108));
        assert_eq!(" 110 ".parse::<YearBucket>(), Ok(YearBucket::Y110));
        assert_eq!(YearBucket::Y107.to_string(), "107");
    }

    #[test]
    fn unknown_year_is_a_typed_error() {
        let err = "111".parse::<YearBucket>().expect_err("111 is not a bucket");

        assert_eq!(err.kind, ErrorKind::Store(StoreErrorKind::UnknownYear));
        assert_eq!(err.user_message(), "You must select one Year to search.");
    }
}
