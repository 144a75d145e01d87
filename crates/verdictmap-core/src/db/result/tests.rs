use super::*;

fn schema() -> ColumnSchema {
    ColumnSchema::new(["JID", "JYEAR", "JTITLE"]).expect("schema should build")
}

#[test]
fn schema_rejects_duplicate_names() {
    let err = ColumnSchema::new(["JID", "JTITLE", "JID"]).expect_err("duplicate should fail");

    assert_eq!(
        err,
        ResultSetError::DuplicateColumn {
            name: "JID".to_string(),
            first: 0,
            second: 2,
        }
    );
}

#[test]
fn result_set_rejects_short_rows() {
    let rows = vec![
        Row::from_iter([Value::from("A1"), Value::Int(107), Value::from("t")]),
        Row::from_iter([Value::from("A2"), Value::Int(108)]),
    ];

    let err = ResultSet::new(schema(), rows).expect_err("arity mismatch should fail");
    assert_eq!(
        err,
        ResultSetError::ArityMismatch {
            row: 1,
            expected: 3,
            found: 2,
        }
    );
}

#[test]
fn named_lookup_follows_schema_positions() {
    let rows = vec![Row::from_iter([
        Value::from("A1"),
        Value::Int(109),
        Value::Null,
    ])];
    let set = ResultSet::new(schema(), rows).expect("result set should build");

    assert_eq!(set.column_index("JYEAR"), Some(1));
    assert_eq!(set.value(0, "JID"), Some(&Value::from("A1")));
    assert_eq!(set.value(0, "JTITLE"), Some(&Value::Null));
    assert_eq!(set.value(0, "MISSING"), None);
    assert_eq!(set.value(1, "JID"), None);
}

#[test]
fn empty_result_keeps_schema() {
    let set = ResultSet::empty(schema());

    assert!(set.is_empty());
    assert_eq!(set.columns().names().len(), 3);
}
