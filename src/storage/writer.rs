//! Storage writer: serializes typed records into a live table
//!
//! Two write paths:
//! - `write_all` replaces the whole table (used by update and delete)
//! - `append` adds one row, header first if the table is new (used by create)
//!
//! A rewrite always emits the canonical header. An append has to live under
//! whatever header the table already carries, so the row is laid out in that
//! header's order.

use super::backend::{RawTable, TableBackend};
use super::errors::{StorageError, StorageResult};
use crate::model::{Entity, Stored};
use crate::schema::{EntityKind, FieldValue};

/// Typed writer over a table backend.
pub struct TableWriter<'a> {
    backend: &'a dyn TableBackend,
}

impl<'a> TableWriter<'a> {
    pub fn new(backend: &'a dyn TableBackend) -> Self {
        Self { backend }
    }

    /// Replaces the live table of `E` with exactly `records`, in order.
    pub fn write_all<E: Entity>(&self, records: &[Stored<E>]) -> StorageResult<()> {
        let table = RawTable::new(
            E::schema().header(),
            records.iter().map(encode_record).collect(),
        );
        self.backend.replace(E::KIND.table_name(), &table)
    }

    /// Appends one record to the live table of `E`.
    pub fn append<E: Entity>(&self, record: &Stored<E>) -> StorageResult<()> {
        append_aligned(self.backend, E::KIND.table_name(), E::schema().header(), record)
    }

    /// Creates an empty live table (header only) if it does not exist yet.
    ///
    /// Returns whether the table was created.
    pub fn initialize(&self, kind: EntityKind) -> StorageResult<bool> {
        let table = kind.table_name();
        if self.backend.exists(table)? {
            return Ok(false);
        }
        self.backend
            .replace(table, &RawTable::with_header(kind.schema().header()))?;
        Ok(true)
    }
}

/// Appends `record` to `table`, matching the column order of its stored header.
///
/// Columns the schema does not know get empty cells. A stored header that
/// lacks a schema column is corrupt; appending under it would write a row no
/// reader could parse.
pub(crate) fn append_aligned<E: Entity>(
    backend: &dyn TableBackend,
    table: &str,
    header: Vec<String>,
    record: &Stored<E>,
) -> StorageResult<()> {
    let cells = encode_record(record);

    let stored_header = match backend.load(table)? {
        Some(raw) if !raw.header.is_empty() && raw.header != header => raw.header,
        _ => return backend.append(table, &header, &cells),
    };

    let mut row = vec![String::new(); stored_header.len()];
    for (name, cell) in header.iter().zip(cells) {
        let col = stored_header.iter().position(|h| h == name).ok_or_else(|| {
            StorageError::corrupt_header(table, format!("missing column '{}'", name))
        })?;
        row[col] = cell;
    }

    backend.append(table, &stored_header, &row)
}

/// Renders a record as table cells: id first, then fields in schema order
pub fn encode_record<E: Entity>(record: &Stored<E>) -> Vec<String> {
    std::iter::once(record.id.to_string())
        .chain(record.record.to_values().iter().map(FieldValue::encode))
        .collect()
}
