//! Module: db::result
//! Responsibility: materialized, schema-checked query rows.
//! Does not own: query execution or pagination.
//! Boundary: the shape every store adapter must produce.

#[cfg(test)]
mod tests;

use crate::value::Value;
use derive_more::Deref;
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// ResultSetError
/// Shape violations detected while materializing a result set.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResultSetError {
    #[error("duplicate column name '{name}' at positions {first} and {second}")]
    DuplicateColumn {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("row {row} has {found} values, expected {expected}")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

///
/// ColumnSchema
///
/// Ordered column names plus a name → position lookup built once.
///

#[derive(Clone, Debug, Default)]
pub struct ColumnSchema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnSchema {
    pub fn new<I, S>(names: I) -> Result<Self, ResultSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(names.len());

        for (idx, name) in names.iter().enumerate() {
            if let Some(first) = positions.insert(name.clone(), idx) {
                return Err(ResultSetError::DuplicateColumn {
                    name: name.clone(),
                    first,
                    second: idx,
                });
            }
        }

        Ok(Self { names, positions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

///
/// Row
/// One materialized row; values are positional against the owning schema.
///

#[derive(Clone, Debug, Deref, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl<V: Into<Value>> FromIterator<V> for Row {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

///
/// ResultSet
///
/// Materialized output of one query execution.
/// Row order is the query's order and never changes after construction.
///

#[derive(Clone, Debug)]
pub struct ResultSet {
    columns: ColumnSchema,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Build a result set, checking every row against the column schema.
    pub fn new(columns: ColumnSchema, rows: Vec<Row>) -> Result<Self, ResultSetError> {
        let expected = columns.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find_map(|(idx, row)| (row.len() != expected).then_some((idx, row.len())))
        {
            return Err(ResultSetError::ArityMismatch {
                row,
                expected,
                found,
            });
        }

        Ok(Self { columns, rows })
    }

    /// Zero-row result with the given schema.
    #[must_use]
    pub const fn empty(columns: ColumnSchema) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn columns(&self) -> &ColumnSchema {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.index_of(name)
    }

    /// Named cell lookup; `None` when either the row or column is unknown.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.index_of(column)?;

        self.rows.get(row).and_then(|r| r.get(col))
    }
}
