use crate::{
    error::Error,
    store::{JudgmentStore, YearBucket},
};
use rusqlite::{Connection, OpenFlags, Params, params, types::ValueRef};
use std::path::Path;
use verdictmap_core::{
    db::{AggregateRecord, ColumnSchema, ResultSet, Row},
    value::Value,
};

///
/// SqliteStore
/// Read-only adapter over the judgment SQLite database.
///

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;

        Ok(Self { conn })
    }

    /// Wrap an already-open connection (in-memory databases in tests).
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn query(&self, sql: &str, args: impl Params) -> Result<ResultSet, Error> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
        let width = names.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(args)?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(to_value(row.get_ref(idx)?));
            }
            rows.push(Row::new(values));
        }

        Ok(ResultSet::new(ColumnSchema::new(names)?, rows)?)
    }
}

impl JudgmentStore for SqliteStore {
    fn list_jids(&self) -> Result<Vec<String>, Error> {
        let set = self.query(
            "SELECT DISTINCT JID FROM caml WHERE JID IS NOT NULL ORDER BY JID",
            params![],
        )?;

        Ok(set.rows().iter().map(|row| row[0].to_string()).collect())
    }

    fn rows_by_jid(&self, jid: &str) -> Result<ResultSet, Error> {
        self.query("SELECT * FROM caml WHERE JID = ?1", params![jid])
    }

    fn aggregates_for_year(&self, year: YearBucket) -> Result<Vec<AggregateRecord>, Error> {
        let sql = format!("SELECT * FROM \"{}\"", year.table_name());
        let set = self.query(&sql, params![])?;

        Ok(AggregateRecord::from_result_set(&set)?)
    }
}

fn to_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let conn = Connection::open_in_memory().expect("in-memory db should open");
        conn.execute_batch(
            r#"
            CREATE TABLE caml (JID TEXT, JYEAR INTEGER, JTITLE TEXT);
            INSERT INTO caml VALUES ('B-2', 108, 'second');
            INSERT INTO caml VALUES ('A-1', 107, 'first');
            INSERT INTO caml VALUES ('A-1', 107, 'first appeal');
            INSERT INTO caml VALUES (NULL, 109, 'orphan');
            CREATE TABLE "107" ("City/County" TEXT, "Count" INTEGER, "CountySN" TEXT);
            INSERT INTO "107" VALUES ('臺北市', 4, '63000');
            INSERT INTO "107" VALUES ('金門縣', 1, NULL);
            "#,
        )
        .expect("fixture should load");

        SqliteStore::from_connection(conn)
    }

    #[test]
    fn jids_are_distinct_sorted_and_non_null() {
        let jids = store().list_jids().expect("jids should load");

        assert_eq!(jids, vec!["A-1".to_string(), "B-2".to_string()]);
    }

    #[test]
    fn rows_by_jid_keeps_store_columns_and_order() {
        let set = store().rows_by_jid("A-1").expect("rows should load");

        assert_eq!(set.columns().names(), ["JID", "JYEAR", "JTITLE"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.value(1, "JTITLE"), Some(&Value::from("first appeal")));
        assert_eq!(set.value(0, "JYEAR"), Some(&Value::Int(107)));
    }

    #[test]
    fn unknown_jid_is_an_empty_result_not_an_error() {
        let set = store().rows_by_jid("Z-9").expect("query should run");

        assert!(set.is_empty());
        assert_eq!(set.columns().len(), 3);
    }

    #[test]
    fn year_table_reads_as_aggregates() {
        let aggs = store()
            .aggregates_for_year(YearBucket::Y107)
            .expect("aggregates should load");

        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0], AggregateRecord::new("臺北市", 4, Some("63000")));
        assert_eq!(aggs[1].region_code, None);
    }

    #[test]
    fn missing_year_table_is_a_store_error() {
        let err = store()
            .aggregates_for_year(YearBucket::Y110)
            .expect_err("table 110 does not exist");

        assert_eq!(
            err.kind,
            crate::error::ErrorKind::Store(crate::error::StoreErrorKind::Unavailable)
        );
    }
}
