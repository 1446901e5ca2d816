//! Record store subsystem
//!
//! [`RecordStore`] runs CRUD for one entity type on top of the storage
//! layer; [`Database`] bundles the three stores over one shared backend.

mod errors;
mod record_store;

use std::path::PathBuf;
use std::sync::Arc;

use crate::model::{Match, Report, Team};
use crate::schema::EntityKind;
use crate::storage::{ArchivedRow, LocalBackend, MemoryBackend, TableBackend, TableWriter};

pub use errors::{StoreError, StoreResult};
pub use record_store::RecordStore;

/// The three record stores sharing one backend.
pub struct Database {
    pub teams: Arc<RecordStore<Team>>,
    pub matches: Arc<RecordStore<Match>>,
    pub reports: Arc<RecordStore<Report>>,
    backend: Arc<dyn TableBackend>,
}

impl Database {
    /// Opens stores over an existing backend
    pub fn open(backend: Arc<dyn TableBackend>) -> Self {
        Self {
            teams: Arc::new(RecordStore::new(Arc::clone(&backend))),
            matches: Arc::new(RecordStore::new(Arc::clone(&backend))),
            reports: Arc::new(RecordStore::new(Arc::clone(&backend))),
            backend,
        }
    }

    /// Opens stores over `data_dir`, creating the directory if needed.
    pub fn open_local(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let backend = LocalBackend::open(data_dir)?;
        Ok(Self::open(Arc::new(backend)))
    }

    /// Volatile database for tests
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryBackend::new()))
    }

    pub fn backend(&self) -> &Arc<dyn TableBackend> {
        &self.backend
    }

    /// Writes a header-only live table for every kind that has none.
    ///
    /// Returns the kinds whose table was created.
    pub fn initialize_tables(&self) -> StoreResult<Vec<EntityKind>> {
        let writer = TableWriter::new(self.backend.as_ref());
        let mut created = Vec::new();
        for kind in EntityKind::ALL {
            if writer.initialize(kind)? {
                created.push(kind);
            }
        }
        Ok(created)
    }

    /// Archive rows of `kind`, dispatched to the matching store
    pub async fn history(&self, kind: EntityKind) -> StoreResult<Vec<ArchivedRow>> {
        match kind {
            EntityKind::Team => self.teams.history().await,
            EntityKind::Match => self.matches.history().await,
            EntityKind::Report => self.reports.history().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_tables_once() {
        let db = Database::in_memory();

        let created = db.initialize_tables().unwrap();
        assert_eq!(created, EntityKind::ALL.to_vec());
        assert!(db.initialize_tables().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_local_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("data");

        let db = Database::open_local(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(db.teams.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_dispatch_by_kind() {
        let db = Database::in_memory();
        let team = db
            .teams
            .create(Team::new("Brazil FC", "Brazil", "A"))
            .await
            .unwrap();
        db.teams.delete(team.id).await.unwrap();

        assert_eq!(db.history(EntityKind::Team).await.unwrap().len(), 1);
        assert!(db.history(EntityKind::Report).await.unwrap().is_empty());
    }
}
