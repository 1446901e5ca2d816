//! Concurrent Mutation Tests
//!
//! Mutations of one entity type are serialized by the store:
//! - parallel creates receive distinct, gap-free ids
//! - parallel updates of different records are all kept
//! - parallel deletes archive each record exactly once

use std::collections::BTreeSet;
use std::sync::Arc;

use tempfile::TempDir;
use tourneydb::model::Team;
use tourneydb::store::Database;

const WORKERS: usize = 16;

fn open_on_disk() -> (TempDir, Arc<Database>) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open_local(temp.path()).unwrap();
    (temp, Arc::new(db))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_get_distinct_ids() {
    let (_temp, db) = open_on_disk();

    let handles: Vec<_> = (0..WORKERS)
        .map(|i| {
            let db = Arc::clone(&db);
            tokio::spawn(async move {
                db.teams
                    .create(Team::new(format!("Team {:02}", i), "Chile", "A"))
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    let expected: BTreeSet<u64> = (1..=WORKERS as u64).collect();
    assert_eq!(ids, expected);
    assert_eq!(db.teams.list_all().await.unwrap().len(), WORKERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_updates_lose_nothing() {
    let (_temp, db) = open_on_disk();
    for i in 0..WORKERS {
        db.teams
            .create(Team::new(format!("Team {:02}", i), "Chile", "A"))
            .await
            .unwrap();
    }

    let handles: Vec<_> = (1..=WORKERS as u64)
        .map(|id| {
            let db = Arc::clone(&db);
            tokio::spawn(async move {
                let mut team = Team::new(format!("Updated {:02}", id), "Peru", "B");
                team.points = id as i64;
                db.teams.update(id, team).await.unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let teams = db.teams.list_all().await.unwrap();
    assert_eq!(teams.len(), WORKERS);
    for (position, team) in teams.iter().enumerate() {
        assert_eq!(team.id, position as u64 + 1);
        assert_eq!(team.record.points, team.id as i64);
        assert_eq!(team.record.country, "Peru");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_deletes_archive_once() {
    let (_temp, db) = open_on_disk();
    for i in 0..WORKERS {
        db.teams
            .create(Team::new(format!("Team {:02}", i), "Chile", "A"))
            .await
            .unwrap();
    }

    // Two deleters per id; exactly one of each pair wins.
    let handles: Vec<_> = (1..=WORKERS as u64)
        .flat_map(|id| [id, id])
        .map(|id| {
            let db = Arc::clone(&db);
            tokio::spawn(async move { db.teams.delete(id).await.unwrap() })
        })
        .collect();

    let mut removed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            removed += 1;
        }
    }

    assert_eq!(removed, WORKERS);
    assert!(db.teams.list_all().await.unwrap().is_empty());
    assert_eq!(db.teams.history().await.unwrap().len(), WORKERS);
}
