//! Storage reader: parses a live table into typed records
//!
//! Columns are located by header name, so a table whose columns were
//! reordered by hand still parses. Any row that cannot be converted fails
//! the whole read; there is no row-skipping.

use super::backend::{RawTable, TableBackend};
use super::errors::{StorageError, StorageResult};
use crate::model::{Entity, Stored};
use crate::schema::{Schema, ID_COLUMN};

/// Typed reader over a table backend.
pub struct TableReader<'a> {
    backend: &'a dyn TableBackend,
}

impl<'a> TableReader<'a> {
    pub fn new(backend: &'a dyn TableBackend) -> Self {
        Self { backend }
    }

    /// Reads every live record of `E`, in table order.
    ///
    /// An absent table reads as empty.
    ///
    /// # Errors
    ///
    /// - `TOURNEY_CORRUPT_RECORD` if the header lacks a schema column, a row
    ///   has the wrong number of cells, or a cell fails type conversion
    /// - `TOURNEY_STORAGE_UNAVAILABLE` if the table cannot be read
    pub fn read_all<E: Entity>(&self) -> StorageResult<Vec<Stored<E>>> {
        let table = E::KIND.table_name();
        match self.backend.load(table)? {
            Some(raw) => decode_table::<E>(table, &raw),
            None => Ok(Vec::new()),
        }
    }
}

/// Parses an `id` cell
pub(crate) fn parse_id(table: &str, row: usize, cell: &str) -> StorageResult<u64> {
    cell.trim().parse::<u64>().map_err(|_| {
        StorageError::corrupt_row(
            table,
            row,
            format!("field '{}': expected integer id, got '{}'", ID_COLUMN, cell),
        )
    })
}

/// Position of the id and of every schema field within a header
struct ColumnLayout {
    id: usize,
    fields: Vec<usize>,
    width: usize,
}

impl ColumnLayout {
    fn resolve(table: &str, header: &[String], schema: &Schema) -> StorageResult<Self> {
        let find = |name: &str| {
            header.iter().position(|h| h == name).ok_or_else(|| {
                StorageError::corrupt_header(table, format!("missing column '{}'", name))
            })
        };

        let id = find(ID_COLUMN)?;
        let fields = schema
            .fields
            .iter()
            .map(|def| find(def.name))
            .collect::<StorageResult<Vec<_>>>()?;

        Ok(Self {
            id,
            fields,
            width: header.len(),
        })
    }
}

fn decode_table<E: Entity>(table: &str, raw: &RawTable) -> StorageResult<Vec<Stored<E>>> {
    // Zero-byte file: never written, nothing to parse
    if raw.header.is_empty() && raw.rows.is_empty() {
        return Ok(Vec::new());
    }

    let schema = E::schema();
    let layout = ColumnLayout::resolve(table, &raw.header, schema)?;

    raw.rows
        .iter()
        .enumerate()
        .map(|(i, row)| decode_row::<E>(table, i + 1, &layout, schema, row))
        .collect()
}

fn decode_row<E: Entity>(
    table: &str,
    row_num: usize,
    layout: &ColumnLayout,
    schema: &Schema,
    row: &[String],
) -> StorageResult<Stored<E>> {
    if row.len() != layout.width {
        return Err(StorageError::corrupt_row(
            table,
            row_num,
            format!("expected {} cells, found {}", layout.width, row.len()),
        ));
    }

    let id = parse_id(table, row_num, &row[layout.id])?;

    let mut values = Vec::with_capacity(schema.len());
    for (def, &col) in schema.fields.iter().zip(&layout.fields) {
        let value = def.field_type.decode(&row[col]).map_err(|reason| {
            StorageError::corrupt_row(table, row_num, format!("field '{}': {}", def.name, reason))
        })?;
        values.push(value);
    }

    let record =
        E::from_values(values).map_err(|reason| StorageError::corrupt_row(table, row_num, reason))?;

    Ok(Stored::new(id, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Match, Team};
    use crate::storage::errors::Location;
    use crate::storage::MemoryBackend;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn team_header() -> Vec<String> {
        strings(&["id", "name", "country", "group", "points", "goals_for", "goals_against"])
    }

    #[test]
    fn test_absent_table_is_empty() {
        let backend = MemoryBackend::new();
        let teams = TableReader::new(&backend).read_all::<Team>().unwrap();
        assert!(teams.is_empty());
    }

    #[test]
    fn test_reads_typed_rows_in_order() {
        let backend = MemoryBackend::new();
        backend
            .insert_raw(
                "teams",
                RawTable::new(
                    team_header(),
                    vec![
                        strings(&["4", "Chile FC", "Chile", "B", "3", "2", "1"]),
                        strings(&["2", "Brazil FC", "Brazil", "A", "0", "0", "0"]),
                    ],
                ),
            )
            .unwrap();

        let teams = TableReader::new(&backend).read_all::<Team>().unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].id, 4);
        assert_eq!(teams[0].record.points, 3);
        assert_eq!(teams[1].record.name, "Brazil FC");
    }

    #[test]
    fn test_reordered_columns_parse() {
        let backend = MemoryBackend::new();
        backend
            .insert_raw(
                "teams",
                RawTable::new(
                    strings(&["name", "goals_against", "id", "country", "group", "points", "goals_for"]),
                    vec![strings(&["Brazil FC", "5", "9", "Brazil", "A", "1", "2"])],
                ),
            )
            .unwrap();

        let teams = TableReader::new(&backend).read_all::<Team>().unwrap();
        assert_eq!(teams[0].id, 9);
        assert_eq!(teams[0].record.goals_against, 5);
        assert_eq!(teams[0].record.goals_for, 2);
    }

    #[test]
    fn test_non_numeric_id_names_row() {
        let backend = MemoryBackend::new();
        backend
            .insert_raw(
                "teams",
                RawTable::new(
                    team_header(),
                    vec![
                        strings(&["1", "Brazil FC", "Brazil", "A", "0", "0", "0"]),
                        strings(&["two", "Chile FC", "Chile", "B", "0", "0", "0"]),
                    ],
                ),
            )
            .unwrap();

        let err = TableReader::new(&backend).read_all::<Team>().unwrap_err();
        assert!(err.is_corrupt());
        assert_eq!(err.location(), Some(Location::Row(2)));
        assert!(err.message().contains("'id'"));
    }

    #[test]
    fn test_bad_date_names_field() {
        let backend = MemoryBackend::new();
        backend
            .insert_raw(
                "matches",
                RawTable::new(
                    strings(&["id", "date", "home_team_id", "away_team_id", "home_goals", "away_goals", "phase"]),
                    vec![strings(&["1", "18/12/2022", "1", "2", "3", "3", "final"])],
                ),
            )
            .unwrap();

        let err = TableReader::new(&backend).read_all::<Match>().unwrap_err();
        assert!(err.message().contains("field 'date'"));
    }

    #[test]
    fn test_missing_column_is_corrupt_header() {
        let backend = MemoryBackend::new();
        backend
            .insert_raw(
                "teams",
                RawTable::new(strings(&["id", "name"]), vec![strings(&["1", "Brazil FC"])]),
            )
            .unwrap();

        let err = TableReader::new(&backend).read_all::<Team>().unwrap_err();
        assert_eq!(err.location(), Some(Location::Header));
        assert!(err.message().contains("'country'"));
    }

    #[test]
    fn test_short_row_is_corrupt() {
        let backend = MemoryBackend::new();
        backend
            .insert_raw(
                "teams",
                RawTable::new(team_header(), vec![strings(&["1", "Brazil FC"])]),
            )
            .unwrap();

        let err = TableReader::new(&backend).read_all::<Team>().unwrap_err();
        assert_eq!(err.location(), Some(Location::Row(1)));
    }
}
