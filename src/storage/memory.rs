//! # In-Memory Backend
//!
//! Keeps tables in a map. Used as the storage fake in tests and for
//! ephemeral runs; semantics match [`LocalBackend`](super::LocalBackend)
//! minus the text encoding.

use std::collections::HashMap;
use std::sync::RwLock;

use super::backend::{RawTable, TableBackend};
use super::errors::{StorageError, StorageResult};

/// In-memory table backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, RawTable>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table with raw contents, bypassing any typing
    pub fn insert_raw(&self, table: &str, contents: RawTable) -> StorageResult<()> {
        self.replace(table, &contents)
    }

    /// Number of tables created so far
    pub fn table_count(&self) -> StorageResult<usize> {
        Ok(self.read_guard()?.len())
    }

    fn read_guard(
        &self,
    ) -> StorageResult<std::sync::RwLockReadGuard<'_, HashMap<String, RawTable>>> {
        self.tables
            .read()
            .map_err(|_| StorageError::unavailable_no_source("memory backend lock poisoned"))
    }

    fn write_guard(
        &self,
    ) -> StorageResult<std::sync::RwLockWriteGuard<'_, HashMap<String, RawTable>>> {
        self.tables
            .write()
            .map_err(|_| StorageError::unavailable_no_source("memory backend lock poisoned"))
    }
}

impl TableBackend for MemoryBackend {
    fn load(&self, table: &str) -> StorageResult<Option<RawTable>> {
        Ok(self.read_guard()?.get(table).cloned())
    }

    fn replace(&self, table: &str, contents: &RawTable) -> StorageResult<()> {
        self.write_guard()?
            .insert(table.to_string(), contents.clone());
        Ok(())
    }

    fn append(&self, table: &str, header: &[String], row: &[String]) -> StorageResult<()> {
        let mut tables = self.write_guard()?;
        let entry = tables.entry(table.to_string()).or_default();
        if entry.header.is_empty() && entry.rows.is_empty() {
            entry.header = header.to_vec();
        }
        entry.rows.push(row.to_vec());
        Ok(())
    }

    fn exists(&self, table: &str) -> StorageResult<bool> {
        Ok(self.read_guard()?.contains_key(table))
    }
}
