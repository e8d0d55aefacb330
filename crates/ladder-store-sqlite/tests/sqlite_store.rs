// crates/ladder-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Game Store Tests
// Description: Exercises schema bootstrap, persistence, ordering, and batches.
// ============================================================================
//! ## Overview
//! Validates the durable store against the interface contracts: descending
//! enumeration with native tie order, single-call batch resolution, UNIQUE
//! conflicts, and persistence across reopen.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use ladder_core::IdentityError;
use ladder_core::IdentityStore;
use ladder_core::ScoreStore;
use ladder_core::UserId;
use ladder_store_sqlite::SqliteGameStore;
use ladder_store_sqlite::SqliteStoreConfig;
use ladder_store_sqlite::SqliteStoreError;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SqliteGameStore {
    let config = SqliteStoreConfig::new(dir.path().join("ladder.db"));
    SqliteGameStore::new(&config).expect("open store")
}

#[test]
fn create_assigns_unique_ids() {
    let store = SqliteGameStore::in_memory().expect("open");
    let alice = store.create("alice", "hash-a").expect("create alice");
    let bob = store.create("bob", "hash-b").expect("create bob");

    assert_ne!(alice.id, bob.id);
    assert!(store.exists(&alice.id).expect("exists"));
    assert!(store.exists_by_name("bob").expect("exists by name"));
    assert!(!store.exists(&UserId::from("nope")).expect("exists"));
}

#[test]
fn duplicate_name_is_a_conflict() {
    let store = SqliteGameStore::in_memory().expect("open");
    store.create("alice", "hash").expect("create");

    let err = store.create("alice", "hash2").expect_err("duplicate");
    assert!(matches!(err, IdentityError::Conflict(_)));
}

#[test]
fn get_by_name_roundtrips_the_record() {
    let store = SqliteGameStore::in_memory().expect("open");
    let created = store.create("alice", "phc-hash").expect("create");

    let fetched = store.get_by_name("alice").expect("lookup").expect("present");
    assert_eq!(fetched, created);
    assert!(store.get_by_name("missing").expect("lookup").is_none());
}

#[test]
fn resolve_many_omits_unknown_ids() {
    let store = SqliteGameStore::in_memory().expect("open");
    let alice = store.create("alice", "h").expect("create");
    let bob = store.create("bob", "h").expect("create");

    let ids = vec![alice.id.clone(), UserId::from("ghost"), bob.id.clone()];
    let users = store.resolve_many(&ids).expect("resolve");

    assert_eq!(users.len(), 2);
    let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
    assert!(names.contains(&"alice"));
    assert!(names.contains(&"bob"));
}

#[test]
fn resolve_many_with_empty_input_is_empty() {
    let store = SqliteGameStore::in_memory().expect("open");
    assert!(store.resolve_many(&[]).expect("resolve").is_empty());
}

#[test]
fn best_score_upsert_and_point_read() {
    let store = SqliteGameStore::in_memory().expect("open");
    let user = UserId::from("u1");

    assert!(store.best_score(&user).expect("read").is_none());

    store.set_best_score(&user, 50.0).expect("write");
    let entry = store.best_score(&user).expect("read").expect("entry");
    assert_eq!(entry.score, 50.0);

    // Unconditional upsert: equal and higher writes both succeed in place.
    store.set_best_score(&user, 50.0).expect("equal rewrite");
    store.set_best_score(&user, 80.0).expect("raise");
    let entry = store.best_score(&user).expect("read").expect("entry");
    assert_eq!(entry.score, 80.0);
}

#[test]
fn negative_or_non_finite_scores_are_rejected() {
    let store = SqliteGameStore::in_memory().expect("open");
    let user = UserId::from("u1");

    assert!(store.set_best_score(&user, -1.0).is_err());
    assert!(store.set_best_score(&user, f64::NAN).is_err());
    assert!(store.best_score(&user).expect("read").is_none());
}

#[test]
fn enumeration_is_descending_with_id_tie_order() {
    let store = SqliteGameStore::in_memory().expect("open");
    store.set_best_score(&UserId::from("a"), 100.0).expect("write");
    store.set_best_score(&UserId::from("c"), 150.0).expect("write");
    store.set_best_score(&UserId::from("b"), 150.0).expect("write");

    let entries = store.scores_descending().expect("enumerate");
    let ids: Vec<&str> = entries.iter().map(|entry| entry.user_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(entries[0].score, 150.0);
    assert_eq!(entries[2].score, 100.0);
}

#[test]
fn state_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    {
        let store = store_in(&dir);
        store.create("alice", "hash").expect("create");
        store.set_best_score(&UserId::from("a"), 42.0).expect("write");
    }

    let reopened = store_in(&dir);
    assert!(reopened.exists_by_name("alice").expect("exists"));
    let entries = reopened.scores_descending().expect("enumerate");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].score, 42.0);
}

#[test]
fn readiness_probes_succeed_on_open_store() {
    let store = SqliteGameStore::in_memory().expect("open");
    ScoreStore::readiness(&store).expect("score readiness");
    IdentityStore::readiness(&store).expect("identity readiness");
}

#[test]
fn zero_busy_timeout_fails_validation() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = SqliteStoreConfig::new(dir.path().join("ladder.db"));
    config.busy_timeout_ms = 0;

    let err = SqliteGameStore::new(&config).expect_err("invalid config");
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn newer_schema_version_fails_closed() {
    let dir = TempDir::new().expect("tempdir");
    {
        let store = store_in(&dir);
        drop(store);
    }
    {
        let connection =
            rusqlite::Connection::open(dir.path().join("ladder.db")).expect("raw open");
        connection
            .execute("UPDATE store_meta SET version = 999", [])
            .expect("bump version");
    }

    let config = SqliteStoreConfig::new(dir.path().join("ladder.db"));
    let err = SqliteGameStore::new(&config).expect_err("version mismatch");
    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}
