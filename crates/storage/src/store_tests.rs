// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behaviour every `JobStore` implementation must share.

use super::*;
use crate::{FileJobStore, MemoryJobStore};
use bk_core::test_support::job_with_targets;
use bk_core::OperationOutcome;
use tempfile::TempDir;

type Fixture = (Box<dyn JobStore>, Option<TempDir>);

fn memory() -> Fixture {
    (Box::new(MemoryJobStore::new()), None)
}

fn file() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = FileJobStore::open(dir.path().join("jobs")).unwrap();
    (Box::new(store), Some(dir))
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn missing_job_is_none(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    assert!(store.get(&JobId::from("nope")).unwrap().is_none());
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn put_then_get_returns_whole_job(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let job = job_with_targets("campaign-1", 3);

    store.put(&job).unwrap();

    assert_eq!(store.get(&job.id).unwrap(), Some(job));
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn clear_removes_job_once(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let job = job_with_targets("campaign-1", 1);
    store.put(&job).unwrap();

    assert!(store.clear(&job.id).unwrap());
    assert!(!store.clear(&job.id).unwrap());
    assert!(store.get(&job.id).unwrap().is_none());
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn checkpoint_records_in_order(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let job = job_with_targets("campaign-1", 3);
    store.put(&job).unwrap();

    let first = CheckpointEntry::new("c-0", OperationOutcome::succeeded());
    let second = CheckpointEntry::new("c-1", OperationOutcome::failed("invalid number"));
    store.record_outcome(&job.id, &first).unwrap();
    store.record_outcome(&job.id, &second).unwrap();

    assert_eq!(store.checkpoint(&job.id).unwrap().entries, vec![first, second]);
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn put_resets_checkpoint(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let job = job_with_targets("campaign-1", 2);
    store.put(&job).unwrap();
    store
        .record_outcome(&job.id, &CheckpointEntry::new("c-0", OperationOutcome::succeeded()))
        .unwrap();

    store.put(&job).unwrap();

    assert!(store.checkpoint(&job.id).unwrap().is_empty());
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn clear_drops_checkpoint(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let job = job_with_targets("campaign-1", 1);
    store.put(&job).unwrap();
    store
        .record_outcome(&job.id, &CheckpointEntry::new("c-0", OperationOutcome::succeeded()))
        .unwrap();

    store.clear(&job.id).unwrap();

    assert!(store.checkpoint(&job.id).unwrap().is_empty());
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn record_for_missing_job_is_not_found(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let entry = CheckpointEntry::new("c-0", OperationOutcome::succeeded());

    let err = store.record_outcome(&JobId::from("ghost"), &entry).unwrap_err();

    assert!(matches!(err, StoreError::NotFound(id) if id == "ghost"));
}

#[yare::parameterized(memory = { crate::store::tests::memory }, file = { crate::store::tests::file })]
fn jobs_are_isolated_by_id(fixture: fn() -> Fixture) {
    let (store, _dir) = fixture();
    let a = job_with_targets("a", 1);
    let b = job_with_targets("b", 2);
    store.put(&a).unwrap();
    store.put(&b).unwrap();

    store.clear(&a.id).unwrap();

    assert_eq!(store.get(&b.id).unwrap(), Some(b));
}

#[test]
fn arc_store_delegates() {
    let store = Arc::new(MemoryJobStore::new());
    let job = job_with_targets("shared", 1);

    JobStore::put(&store, &job).unwrap();

    assert_eq!(store.get(&job.id).unwrap(), Some(job));
}
