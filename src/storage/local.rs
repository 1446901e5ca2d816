//! # Local Filesystem Backend
//!
//! One CSV file per table: `<root>/<table>.csv`.
//!
//! Full rewrites go through a sibling temp file that is fsynced and then
//! renamed over the table, so a reader opening the table after a rewrite
//! returns never observes a partially written row. Appends are fsynced
//! before returning.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::backend::{RawTable, TableBackend};
use super::codec;
use super::errors::{Location, StorageError, StorageResult};

/// Local filesystem table backend
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a backend rooted at `root` without touching the filesystem
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a backend, creating the root directory if missing
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let backend = Self::new(root);
        fs::create_dir_all(&backend.root).map_err(|e| {
            StorageError::unavailable_io(
                format!("failed to create data directory: {}", backend.root.display()),
                e,
            )
        })?;
        Ok(backend)
    }

    /// Returns the data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path of a table
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{}.csv", table))
    }

    fn ensure_root(&self, table: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            StorageError::unavailable(
                table,
                format!("failed to create data directory: {}", self.root.display()),
                e,
            )
        })
    }
}

impl TableBackend for LocalBackend {
    fn load(&self, table: &str) -> StorageResult<Option<RawTable>> {
        let path = self.table_path(table);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(StorageError::corrupt_at(
                    table,
                    Location::Line(1),
                    format!("table is not valid UTF-8: {}", e),
                ));
            }
            Err(e) => {
                return Err(StorageError::unavailable(
                    table,
                    format!("failed to read table: {}", path.display()),
                    e,
                ));
            }
        };

        let rows = codec::decode(&text).map_err(|e| {
            StorageError::corrupt_at(table, Location::Line(e.line), e.reason)
        })?;

        Ok(Some(RawTable::from_rows(rows)))
    }

    fn replace(&self, table: &str, contents: &RawTable) -> StorageResult<()> {
        self.ensure_root(table)?;

        let path = self.table_path(table);
        let temp_path = self.root.join(format!("{}.csv.tmp", table));
        let encoded = codec::encode_table(&contents.header, &contents.rows);

        {
            let mut file = File::create(&temp_path).map_err(|e| {
                StorageError::unavailable(
                    table,
                    format!("failed to create temp file: {}", temp_path.display()),
                    e,
                )
            })?;

            file.write_all(encoded.as_bytes()).map_err(|e| {
                StorageError::unavailable(table, "failed to write table contents", e)
            })?;

            file.sync_all()
                .map_err(|e| StorageError::unavailable(table, "fsync failed after rewrite", e))?;
        }

        fs::rename(&temp_path, &path).map_err(|e| {
            StorageError::unavailable(
                table,
                format!(
                    "failed to rename {} to {}",
                    temp_path.display(),
                    path.display()
                ),
                e,
            )
        })?;

        tracing::trace!(table, rows = contents.rows.len(), "table rewritten");
        Ok(())
    }

    fn append(&self, table: &str, header: &[String], row: &[String]) -> StorageResult<()> {
        self.ensure_root(table)?;

        let path = self.table_path(table);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                StorageError::unavailable(
                    table,
                    format!("failed to open table: {}", path.display()),
                    e,
                )
            })?;

        let len = file
            .metadata()
            .map_err(|e| StorageError::unavailable(table, "failed to read table metadata", e))?
            .len();

        // Header and row go out in one write
        let mut buf = String::new();
        if len == 0 {
            buf.push_str(&codec::encode_row(header));
            buf.push('\n');
        }
        buf.push_str(&codec::encode_row(row));
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .map_err(|e| StorageError::unavailable(table, "failed to append row", e))?;

        file.sync_all()
            .map_err(|e| StorageError::unavailable(table, "fsync failed after append", e))?;

        Ok(())
    }

    fn exists(&self, table: &str) -> StorageResult<bool> {
        Ok(self.table_path(table).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absent_table_loads_as_none() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());

        assert!(backend.load("teams").unwrap().is_none());
        assert!(!backend.exists("teams").unwrap());
    }

    #[test]
    fn test_open_creates_nested_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("a").join("b");

        let backend = LocalBackend::open(&root).unwrap();
        assert!(backend.root().is_dir());
    }

    #[test]
    fn test_append_writes_header_once() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());
        let header = strings(&["id", "name"]);

        backend.append("teams", &header, &strings(&["1", "a"])).unwrap();
        backend.append("teams", &header, &strings(&["2", "b"])).unwrap();

        let text = fs::read_to_string(backend.table_path("teams")).unwrap();
        assert_eq!(text, "id,name\n1,a\n2,b\n");
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());
        fs::write(backend.table_path("teams"), "").unwrap();

        backend
            .append("teams", &strings(&["id"]), &strings(&["1"]))
            .unwrap();

        let text = fs::read_to_string(backend.table_path("teams")).unwrap();
        assert_eq!(text, "id\n1\n");
    }

    #[test]
    fn test_replace_overwrites_and_leaves_no_temp() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());
        let header = strings(&["id", "name"]);

        backend.append("teams", &header, &strings(&["1", "a"])).unwrap();
        backend
            .replace(
                "teams",
                &RawTable::new(header.clone(), vec![strings(&["2", "b, c"])]),
            )
            .unwrap();

        let table = backend.load("teams").unwrap().unwrap();
        assert_eq!(table.header, header);
        assert_eq!(table.rows, vec![strings(&["2", "b, c"])]);
        assert!(!temp.path().join("teams.csv.tmp").exists());
    }

    #[test]
    fn test_empty_file_loads_as_empty_table() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());
        fs::write(backend.table_path("reports"), "").unwrap();

        let table = backend.load("reports").unwrap().unwrap();
        assert!(table.header.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_quoting_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());
        fs::write(backend.table_path("teams"), "id,name\n1,\"open\n").unwrap();

        let err = backend.load("teams").unwrap_err();
        assert!(err.is_corrupt());
        assert_eq!(err.location(), Some(Location::Line(2)));
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path());
        fs::write(backend.table_path("teams"), [0x69, 0x64, 0x0a, 0xff, 0xfe]).unwrap();

        assert!(backend.load("teams").unwrap_err().is_corrupt());
    }
}
