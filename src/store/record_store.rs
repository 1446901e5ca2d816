//! Record store: CRUD orchestration for one entity type
//!
//! Every operation re-reads the live table; there is no cache.
//!
//! Mutations (`create`, `update`, `delete`) take the per-type write lock for
//! their whole read-modify-write sequence, so two concurrent mutations of the
//! same type run one after the other and neither overwrites the other's
//! result. The lock also guards the highest id this store has issued or
//! seen, so an id freed by deleting the maximum row is not handed out again.
//! Reads take no lock: rewrites replace the table atomically, so a
//! reader sees either the old or the new contents.
//!
//! Storage work runs on tokio's blocking pool.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task;

use super::errors::{StoreError, StoreResult};
use crate::model::{Entity, Filterable, Stored};
use crate::storage::{
    ArchiveWriter, ArchivedRow, IdAllocator, StorageError, TableBackend, TableReader,
    TableWriter,
};

/// CRUD operations over the live table and archive of entity type `E`.
pub struct RecordStore<E: Entity> {
    backend: Arc<dyn TableBackend>,
    /// Serializes mutations; holds the highest id issued or seen
    write_lock: Arc<Mutex<u64>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RecordStore<E> {
    /// Creates a store over a shared backend
    pub fn new(backend: Arc<dyn TableBackend>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(0)),
            _entity: PhantomData,
        }
    }

    /// Runs a storage operation on the blocking pool.
    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TableBackend) -> StoreResult<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(task_failed)?
    }

    /// Runs a storage operation while holding the write lock.
    ///
    /// The guard moves into the blocking task, so a request dropped mid-write
    /// still keeps the lock until the write finishes. `op` receives the
    /// high-water id.
    async fn run_exclusive<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TableBackend, &mut u64) -> StoreResult<T> + Send + 'static,
    {
        let mut guard = Arc::clone(&self.write_lock).lock_owned().await;
        let backend = Arc::clone(&self.backend);
        task::spawn_blocking(move || op(backend.as_ref(), &mut *guard))
            .await
            .map_err(task_failed)?
    }

    /// Validates, assigns the next id and appends the record.
    ///
    /// The id is one past the larger of the live maximum and the high-water
    /// mark; the mark only advances once the append succeeds.
    pub async fn create(&self, candidate: E) -> StoreResult<Stored<E>> {
        candidate.validate()?;

        let stored = self
            .run_exclusive(move |backend, high_water| {
                let id = IdAllocator::new(backend).next_id_above(E::KIND, *high_water)?;
                let stored = Stored::new(id, candidate);
                TableWriter::new(backend).append(&stored)?;
                *high_water = id;
                Ok(stored)
            })
            .await?;

        tracing::info!(entity = %E::KIND, id = stored.id, "record created");
        Ok(stored)
    }

    /// Returns every live record in table order
    pub async fn list_all(&self) -> StoreResult<Vec<Stored<E>>> {
        let records = self
            .run(|backend| Ok(TableReader::new(backend).read_all::<E>()?))
            .await?;

        tracing::debug!(entity = %E::KIND, count = records.len(), "records listed");
        Ok(records)
    }

    /// Linear scan for one id
    pub async fn get_by_id(&self, id: u64) -> StoreResult<Stored<E>> {
        self.list_all()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound {
                entity: E::KIND,
                id,
            })
    }

    /// Replaces every field of record `id`, keeping its id and position.
    ///
    /// The table is rewritten only when the id exists.
    pub async fn update(&self, id: u64, replacement: E) -> StoreResult<Stored<E>> {
        replacement.validate()?;

        let updated = self
            .run_exclusive(move |backend, _| {
                let mut records = TableReader::new(backend).read_all::<E>()?;
                let Some(slot) = records.iter_mut().find(|record| record.id == id) else {
                    return Ok(None);
                };
                slot.record = replacement;
                let updated = slot.clone();

                TableWriter::new(backend).write_all(&records)?;
                Ok(Some(updated))
            })
            .await?;

        match updated {
            Some(record) => {
                tracing::info!(entity = %E::KIND, id, "record updated");
                Ok(record)
            }
            None => {
                tracing::warn!(entity = %E::KIND, id, "update target not found");
                Err(StoreError::NotFound {
                    entity: E::KIND,
                    id,
                })
            }
        }
    }

    /// Removes record `id` from the live table and archives it.
    ///
    /// Returns whether a record was removed. The table is rewritten only
    /// when the id exists.
    pub async fn delete(&self, id: u64) -> StoreResult<bool> {
        let removed = self
            .run_exclusive(move |backend, high_water| {
                let records = TableReader::new(backend).read_all::<E>()?;
                if let Some(max) = records.iter().map(|record| record.id).max() {
                    *high_water = (*high_water).max(max);
                }
                let (removed, kept): (Vec<_>, Vec<_>) =
                    records.into_iter().partition(|record| record.id == id);

                if removed.is_empty() {
                    return Ok(0);
                }

                TableWriter::new(backend).write_all(&kept)?;

                let archive = ArchiveWriter::new(backend);
                for record in &removed {
                    archive.append(record)?;
                }
                Ok(removed.len())
            })
            .await?;

        if removed > 0 {
            tracing::info!(entity = %E::KIND, id, "record deleted and archived");
        } else {
            tracing::warn!(entity = %E::KIND, id, "delete target not found");
        }
        Ok(removed > 0)
    }

    /// Raw archive rows of deleted records, fields as text
    pub async fn history(&self) -> StoreResult<Vec<ArchivedRow>> {
        self.run(|backend| Ok(ArchiveWriter::new(backend).read_raw(E::KIND)?))
            .await
    }
}

impl<E: Filterable> RecordStore<E> {
    /// Records whose filter field equals `value`, ignoring case
    pub async fn filter_by(&self, value: &str) -> StoreResult<Vec<Stored<E>>> {
        let records = self.list_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.record.matches_filter(value))
            .collect())
    }
}

fn task_failed(err: task::JoinError) -> StoreError {
    StoreError::Storage(StorageError::unavailable_no_source(format!(
        "storage task failed: {}",
        err
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Report, Team};
    use crate::storage::{MemoryBackend, RawTable};
    use chrono::NaiveDate;

    fn store<E: Entity>() -> (Arc<MemoryBackend>, RecordStore<E>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = RecordStore::new(backend.clone() as Arc<dyn TableBackend>);
        (backend, store)
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let (_backend, teams) = store::<Team>();

        let first = teams.create(Team::new("Brazil FC", "Brazil", "A")).await.unwrap();
        let second = teams.create(Team::new("Chile FC", "Chile", "B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_invalid_create_touches_nothing() {
        let (backend, teams) = store::<Team>();

        let err = teams.create(Team::new("BR", "B", "")).await.unwrap_err();
        match err {
            StoreError::Validation(v) => assert_eq!(v.violations().len(), 3),
            other => panic!("expected validation error, got {other}"),
        }
        assert_eq!(backend.table_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_skips_rewrite() {
        let (backend, teams) = store::<Team>();

        let err = teams
            .update(5, Team::new("Brazil FC", "Brazil", "A"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!backend.exists("teams").unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let (backend, teams) = store::<Team>();
        teams.create(Team::new("Brazil FC", "Brazil", "A")).await.unwrap();

        assert!(!teams.delete(9).await.unwrap());
        assert!(!backend.exists("teams_deleted").unwrap());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_deleting_lower_id() {
        let (_backend, teams) = store::<Team>();
        teams.create(Team::new("Brazil FC", "Brazil", "A")).await.unwrap();
        teams.create(Team::new("Chile FC", "Chile", "B")).await.unwrap();

        assert!(teams.delete(1).await.unwrap());
        let third = teams.create(Team::new("Peru FC", "Peru", "C")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_deleting_max() {
        let (_backend, teams) = store::<Team>();
        teams.create(Team::new("Brazil FC", "Brazil", "A")).await.unwrap();
        teams.create(Team::new("Chile FC", "Chile", "B")).await.unwrap();

        assert!(teams.delete(2).await.unwrap());
        let third = teams.create(Team::new("Peru FC", "Peru", "C")).await.unwrap();
        assert_eq!(third.id, 3);

        assert!(teams.delete(1).await.unwrap());
        assert!(teams.delete(3).await.unwrap());
        let fourth = teams.create(Team::new("Chile FC", "Chile", "B")).await.unwrap();
        assert_eq!(fourth.id, 4);
    }

    #[tokio::test]
    async fn test_deleted_max_of_preexisting_table_not_reused() {
        let (backend, teams) = store::<Team>();
        let row = |id: &str| -> Vec<String> {
            [id, "Brazil FC", "Brazil", "A", "0", "0", "0"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        };
        backend
            .insert_raw(
                "teams",
                RawTable::new(Team::schema().header(), vec![row("1"), row("5")]),
            )
            .unwrap();

        assert!(teams.delete(5).await.unwrap());
        let created = teams.create(Team::new("Peru FC", "Peru", "C")).await.unwrap();
        assert_eq!(created.id, 6);
    }

    #[tokio::test]
    async fn test_filter_reports_by_type() {
        let (_backend, reports) = store::<Report>();
        let date = NaiveDate::from_ymd_opt(2022, 12, 1).unwrap();
        for (name, kind) in [("Daily one", "Summary"), ("Squad list", "roster"), ("Daily two", "summary")] {
            reports
                .create(Report {
                    name: name.to_string(),
                    report_type: kind.to_string(),
                    generated_date: date,
                    file_path: format!("{}.pdf", name),
                })
                .await
                .unwrap();
        }

        let found = reports.filter_by("SUMMARY").await.unwrap();
        let ids: Vec<u64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(reports.filter_by("budget").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_table_fails_reads_and_writes() {
        let (backend, teams) = store::<Team>();
        backend
            .insert_raw(
                "teams",
                RawTable::new(
                    Team::schema().header(),
                    vec![vec!["x".into(), "Brazil FC".into(), "Brazil".into(), "A".into(), "0".into(), "0".into(), "0".into()]],
                ),
            )
            .unwrap();

        assert!(matches!(teams.list_all().await, Err(StoreError::Storage(_))));
        assert!(matches!(
            teams.create(Team::new("Chile FC", "Chile", "B")).await,
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(teams.delete(1).await, Err(StoreError::Storage(_))));
    }
}
