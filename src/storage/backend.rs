//! # Table Backend Trait
//!
//! The storage abstraction injected into the record store. Backends move
//! raw text tables; typing is done by the reader and writer on top.

use std::fmt;
use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::errors::StorageResult;

/// An untyped table: header row plus data rows, all cells as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// A table with a header and no rows
    pub fn with_header(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Builds a table from decoded rows, the first being the header
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows.remove(0);
        Self { header, rows }
    }

    /// Returns the index of a named column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Returns true if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each row as a header-keyed mapping, in header column order.
    ///
    /// Cells beyond the header are dropped; missing trailing cells are absent.
    pub fn to_maps(&self) -> Vec<ArchivedRow> {
        self.rows
            .iter()
            .map(|row| {
                ArchivedRow(
                    self.header
                        .iter()
                        .zip(row.iter())
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                )
            })
            .collect()
    }
}

/// One untyped table row keyed by column name.
///
/// Keeps the column order of the table header, and serializes as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivedRow(Vec<(String, String)>);

impl ArchivedRow {
    /// Returns the cell under `column`
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in header order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<&str> for ArchivedRow {
    type Output = str;

    fn index(&self, column: &str) -> &str {
        match self.get(column) {
            Some(value) => value,
            None => panic!("no column '{}' in row", column),
        }
    }
}

impl Serialize for ArchivedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Backend trait for table storage
pub trait TableBackend: Send + Sync + fmt::Debug {
    /// Loads a whole table.
    ///
    /// Returns `Ok(None)` if the table has never been created; an absent
    /// table is not an error.
    fn load(&self, table: &str) -> StorageResult<Option<RawTable>>;

    /// Replaces the entire contents of a table
    fn replace(&self, table: &str, contents: &RawTable) -> StorageResult<()>;

    /// Appends one row, writing `header` first if the table is empty or absent
    fn append(&self, table: &str, header: &[String], row: &[String]) -> StorageResult<()>;

    /// Returns true if the table has been created
    fn exists(&self, table: &str) -> StorageResult<bool>;
}
