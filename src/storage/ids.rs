//! Identifier allocator
//!
//! The next id of an entity type is one past the highest id seen: the
//! larger of the live table's maximum and a caller-held floor (the highest
//! id already issued or observed in this process). With no floor and an
//! empty or absent table the first id is `1`. Ids freed by deletion are
//! never reused within a process run, even when the deleted row held the
//! maximum.
//!
//! Not safe for concurrent invocation on its own: callers must serialize
//! allocation with the append that consumes the id.

use super::backend::TableBackend;
use super::errors::{StorageError, StorageResult};
use super::reader::parse_id;
use crate::schema::{EntityKind, ID_COLUMN};

/// Computes the next free id for a given set of existing ids
pub fn next_after<I: IntoIterator<Item = u64>>(ids: I) -> Option<u64> {
    ids.into_iter().max().unwrap_or(0).checked_add(1)
}

/// Scans live tables to allocate ids.
pub struct IdAllocator<'a> {
    backend: &'a dyn TableBackend,
}

impl<'a> IdAllocator<'a> {
    pub fn new(backend: &'a dyn TableBackend) -> Self {
        Self { backend }
    }

    /// Returns the next id for `kind`, from the live table alone.
    pub fn next_id(&self, kind: EntityKind) -> StorageResult<u64> {
        self.next_id_above(kind, 0)
    }

    /// Returns the next id for `kind` that is also greater than `floor`.
    ///
    /// Only the `id` column is inspected.
    ///
    /// # Errors
    ///
    /// - `TOURNEY_CORRUPT_RECORD` if an id is not an integer
    /// - `TOURNEY_STORAGE_UNAVAILABLE` if the table exists but cannot be read
    pub fn next_id_above(&self, kind: EntityKind, floor: u64) -> StorageResult<u64> {
        let table = kind.table_name();
        let mut ids = self.live_ids(kind)?;
        ids.push(floor);

        next_after(ids).ok_or_else(|| StorageError::corrupt_header(table, "id space exhausted"))
    }

    /// Every id in the live table of `kind`, in table order
    pub fn live_ids(&self, kind: EntityKind) -> StorageResult<Vec<u64>> {
        let table = kind.table_name();

        let raw = match self.backend.load(table)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let col = raw.column(ID_COLUMN).ok_or_else(|| {
            StorageError::corrupt_header(table, format!("missing column '{}'", ID_COLUMN))
        })?;

        let mut ids = Vec::with_capacity(raw.rows.len());
        for (i, row) in raw.rows.iter().enumerate() {
            let cell = row
                .get(col)
                .ok_or_else(|| StorageError::corrupt_row(table, i + 1, "missing id cell"))?;
            ids.push(parse_id(table, i + 1, cell)?);
        }
        Ok(ids)
    }
}
