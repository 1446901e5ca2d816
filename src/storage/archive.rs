//! Archive writer: append-only log of deleted records
//!
//! Each entity type has its own archive table (`<table>_deleted`) with the
//! same header as the live table. Entries are never rewritten or removed.

use super::backend::{ArchivedRow, TableBackend};
use super::errors::StorageResult;
use super::writer::append_aligned;
use crate::model::{Entity, Stored};
use crate::schema::EntityKind;

/// Appends to and reads back per-type archives.
pub struct ArchiveWriter<'a> {
    backend: &'a dyn TableBackend,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new(backend: &'a dyn TableBackend) -> Self {
        Self { backend }
    }

    /// Appends a snapshot of a deleted record.
    ///
    /// The header is written only if the archive is empty or absent; an
    /// existing header decides the column order of the row.
    pub fn append<E: Entity>(&self, record: &Stored<E>) -> StorageResult<()> {
        append_aligned(
            self.backend,
            E::KIND.archive_name(),
            E::schema().header(),
            record,
        )
    }

    /// Returns every archived row as a field-name → text mapping.
    ///
    /// Values are not typed and keep the archive's column order. An absent
    /// archive reads as empty.
    pub fn read_raw(&self, kind: EntityKind) -> StorageResult<Vec<ArchivedRow>> {
        Ok(self
            .backend
            .load(kind.archive_name())?
            .map(|table| table.to_maps())
            .unwrap_or_default())
    }
}
