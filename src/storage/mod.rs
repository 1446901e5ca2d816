//! Table storage subsystem
//!
//! Holds the persistent state of every entity type as flat delimited-text
//! tables: one live table and one append-only archive per type.
//!
//! # Design Principles
//!
//! - Backends move raw text tables; typing lives in the reader/writer
//! - Absent table reads as empty, never as an error
//! - Full-table rewrite on update/delete, append on create
//! - Archive rows are never rewritten
//! - Corruption fails the read; nothing is skipped or retried

mod archive;
mod backend;
mod codec;
mod errors;
mod ids;
mod local;
mod memory;
mod reader;
mod writer;

pub use archive::ArchiveWriter;
pub use backend::{ArchivedRow, RawTable, TableBackend};
pub use codec::{decode, encode_row, encode_table, CodecError};
pub use errors::{Location, StorageError, StorageErrorCode, StorageResult};
pub use ids::{next_after, IdAllocator};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use reader::TableReader;
pub use writer::{encode_record, TableWriter};
