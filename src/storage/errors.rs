//! Storage error types
//!
//! Error codes:
//! - TOURNEY_STORAGE_UNAVAILABLE: I/O failure other than "table absent"
//! - TOURNEY_CORRUPT_RECORD: a stored row or header cannot be parsed
//!
//! Neither is retried. A single corrupt row fails the whole read.

use std::fmt;
use std::io;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Table exists but cannot be read or written
    StorageUnavailable,
    /// Stored data fails to parse or convert to its declared type
    CorruptRecord,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageUnavailable => "TOURNEY_STORAGE_UNAVAILABLE",
            StorageErrorCode::CorruptRecord => "TOURNEY_CORRUPT_RECORD",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where in the stored data a problem was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based data row (header excluded)
    Row(usize),
    /// 1-based physical line of the table file
    Line(usize),
    /// Header row
    Header,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Row(n) => write!(f, "row {}", n),
            Location::Line(n) => write!(f, "line {}", n),
            Location::Header => write!(f, "header"),
        }
    }
}

/// Storage error with table and location context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Table the error concerns, if known
    table: Option<String>,
    /// Offending location inside the table
    location: Option<Location>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StorageError {
    /// I/O failure on a table that exists (or must be created)
    pub fn unavailable(table: &str, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageUnavailable,
            message: message.into(),
            table: Some(table.to_string()),
            location: None,
            source: Some(source),
        }
    }

    /// I/O failure not tied to a single table
    pub fn unavailable_io(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::StorageUnavailable,
            message: message.into(),
            table: None,
            location: None,
            source: Some(source),
        }
    }

    /// Storage failure without an IO source (lock poisoning, task failure)
    pub fn unavailable_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::StorageUnavailable,
            message: message.into(),
            table: None,
            location: None,
            source: None,
        }
    }

    /// Corrupt data at a known location
    pub fn corrupt_at(table: &str, location: Location, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::CorruptRecord,
            message: reason.into(),
            table: Some(table.to_string()),
            location: Some(location),
            source: None,
        }
    }

    /// Corrupt data row (1-based, header excluded)
    pub fn corrupt_row(table: &str, row: usize, reason: impl Into<String>) -> Self {
        Self::corrupt_at(table, Location::Row(row), reason)
    }

    /// Corrupt or unusable header row
    pub fn corrupt_header(table: &str, reason: impl Into<String>) -> Self {
        Self::corrupt_at(table, Location::Header, reason)
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table name, if known
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns the offending location, if known
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns whether this error reports corrupt stored data
    pub fn is_corrupt(&self) -> bool {
        self.code == StorageErrorCode::CorruptRecord
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        match (&self.table, &self.location) {
            (Some(table), Some(location)) => write!(f, " (table: {}, {})", table, location)?,
            (Some(table), None) => write!(f, " (table: {})", table)?,
            _ => {}
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
