//! End-to-end: SQLite store -> browse session paging, and
//! SQLite year table + GeoJSON catalogue -> map session -> GeoJSON export.

use proptest::prelude::*;
use rusqlite::{Connection, params};
use std::{num::NonZeroUsize, sync::Arc};
use verdictmap::prelude::*;

const CATALOGUE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "name": "臺北市" },
          "geometry": { "type": "Polygon",
            "coordinates": [[[121.4, 25.0], [121.6, 25.0], [121.6, 25.2], [121.4, 25.0]]] } },
        { "type": "Feature", "properties": { "name": "新北市" },
          "geometry": { "type": "Polygon",
            "coordinates": [[[121.2, 24.8], [121.9, 24.8], [121.9, 25.3], [121.2, 24.8]]] } },
        { "type": "Feature", "properties": { "name": "連江縣" },
          "geometry": { "type": "MultiPolygon",
            "coordinates": [[[[119.9, 26.1], [120.0, 26.1], [120.0, 26.2], [119.9, 26.1]]]] } }
    ]
}"#;

fn store_with_rows(rows: usize) -> SqliteStore {
    let conn = Connection::open_in_memory().expect("in-memory db should open");
    conn.execute_batch(
        r#"
        CREATE TABLE caml (JID TEXT, Seq INTEGER, JTITLE TEXT);
        CREATE TABLE "107" ("City/County" TEXT, "Count" INTEGER, "CountySN" TEXT);
        INSERT INTO "107" VALUES ('臺北市', 12, '63000');
        INSERT INTO "107" VALUES ('新北市', 30, '65000');
        INSERT INTO "107" VALUES ('台北市', 3, NULL);
        CREATE TABLE "108" ("City/County" TEXT, "Count" INTEGER, "CountySN" TEXT);
        "#,
    )
    .expect("schema should load");

    for seq in 0..rows {
        let seq = i64::try_from(seq).expect("small index");
        conn.execute(
            "INSERT INTO caml VALUES (?1, ?2, ?3)",
            params!["110,台上,1", seq, format!("row {seq}")],
        )
        .expect("row should insert");
    }
    conn.execute(
        "INSERT INTO caml VALUES ('109,台上,7', 0, 'other')",
        params![],
    )
    .expect("row should insert");

    SqliteStore::from_connection(conn)
}

fn catalogue() -> Arc<GeometryCatalogue> {
    Arc::new(GeometryCatalogue::from_geojson_str(CATALOGUE).expect("catalogue should parse"))
}

#[test]
fn twenty_three_rows_page_through_the_session() {
    let mut browse = BrowseSession::new(store_with_rows(23));

    assert_eq!(
        browse.list_jids().expect("jids should load"),
        vec!["109,台上,7".to_string(), "110,台上,1".to_string()]
    );

    let outcome = browse.search_by_jid("110,台上,1").expect("search should run");
    assert_eq!((outcome.total_rows, outcome.page_count), (23, 3));

    let sizes: Vec<usize> = [
        browse.current_page().map(|v| v.rows().len()),
        browse.next_page().map(|v| v.rows().len()),
        browse.next_page().map(|v| v.rows().len()),
    ]
    .into_iter()
    .collect::<Result<_, _>>()
    .expect("three pages exist");
    assert_eq!(sizes, vec![10, 10, 3]);

    let last = browse.current_page().expect("page 3");
    assert_eq!(
        last.rows()[0].values()[last.columns.index_of("Seq").expect("Seq column")],
        Value::Int(20)
    );

    let err = browse.next_page().expect_err("no page 4");
    assert_eq!(err.kind, ErrorKind::Page(PageErrorKind::AtLastPage));

    browse.first_page().expect("back to 1");
    let err = browse.previous_page().expect_err("no page 0");
    assert_eq!(err.user_message(), "This is already the first page!");

    assert_eq!(
        browse.jid_at(2).expect("row exists"),
        Some("110,台上,1".to_string())
    );
}

#[test]
fn unmatched_search_is_one_empty_page() {
    let mut browse = BrowseSession::new(store_with_rows(5));

    let outcome = browse.search_by_jid("no such id").expect("search should run");
    assert_eq!((outcome.total_rows, outcome.page_count), (0, 1));
    assert!(browse.current_page().expect("page 1").rows().is_empty());

    let err = browse.show_page(2).expect_err("only one page");
    assert_eq!(err.kind, ErrorKind::Page(PageErrorKind::OutOfRange));
}

#[test]
fn year_join_keeps_every_region_and_drops_unknown_names() {
    let store = store_with_rows(0);
    let mut map = MapSession::new(catalogue());

    let table = map
        .select_year_label(&store, "107")
        .expect("year 107 should join");
    let counts: Vec<(&str, Option<u64>)> = table
        .records
        .iter()
        .map(|r| (r.region_name.as_str(), r.count))
        .collect();

    assert_eq!(
        counts,
        vec![("臺北市", Some(12)), ("新北市", Some(30)), ("連江縣", None)]
    );
    // variant spelling is not normalized
    assert_eq!(table.summary.dropped_aggregates, vec!["台北市".to_string()]);

    let doc = map
        .export(&GeoJsonExporter::in_memory())
        .expect("export should succeed");
    let features = doc["features"].as_array().expect("features array");
    assert_eq!(features.len(), 3);
    assert_eq!(features[0]["properties"]["CountySN"], "63000");
    assert!(features[2]["properties"]["Count"].is_null());
    assert_eq!(features[2]["geometry"]["type"], "MultiPolygon");
}

#[test]
fn empty_year_table_yields_all_absent_counts() {
    let store = store_with_rows(0);
    let mut map = MapSession::new(catalogue());

    let table = map
        .select_year(&store, YearBucket::Y108)
        .expect("empty table still joins");

    assert_eq!(table.records.len(), 3);
    assert!(table.records.iter().all(|r| r.count.is_none()));
    assert_eq!(table.total_count(), 0);
}

#[test]
fn missing_year_table_is_unavailable() {
    let store = store_with_rows(0);
    let mut map = MapSession::new(catalogue()).debug();

    let err = map
        .select_year(&store, YearBucket::Y109)
        .expect_err("no 109 table");

    assert_eq!(err.kind, ErrorKind::Store(StoreErrorKind::Unavailable));
    assert!(map.current().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn walking_next_visits_every_row_once(rows in 0usize..40, size in 1usize..12) {
        let page_size = NonZeroUsize::new(size).expect("size is positive");
        let mut browse = BrowseSession::new(store_with_rows(rows)).with_page_size(page_size);
        browse.search_by_jid("110,台上,1").expect("search should run");

        let mut seen = browse.current_page().expect("page 1").rows().len();
        while let Ok(view) = browse.next_page() {
            seen += view.rows().len();
        }

        prop_assert_eq!(seen, rows);
        prop_assert_eq!(browse.total_rows(), Some(rows));
    }
}
