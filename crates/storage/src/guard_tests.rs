// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn local_guard_grants_once_while_held() {
    let guard = LocalFlightGuard::new();
    let id = JobId::from("campaign-1");

    let permit = guard.try_acquire(&id).unwrap();
    assert!(permit.is_some());
    assert!(guard.try_acquire(&id).unwrap().is_none());
    assert!(guard.is_held(&id));
}

#[test]
fn local_guard_releases_on_drop() {
    let guard = LocalFlightGuard::new();
    let id = JobId::from("campaign-1");

    drop(guard.try_acquire(&id).unwrap());

    assert!(!guard.is_held(&id));
    assert!(guard.try_acquire(&id).unwrap().is_some());
}

#[test]
fn local_guard_is_per_job() {
    let guard = LocalFlightGuard::new();
    let _a = guard.try_acquire(&JobId::from("a")).unwrap().unwrap();

    assert!(guard.try_acquire(&JobId::from("b")).unwrap().is_some());
}

#[test]
fn local_guard_clones_share_holds() {
    let guard = LocalFlightGuard::new();
    let other = guard.clone();
    let id = JobId::from("campaign-1");

    let _permit = guard.try_acquire(&id).unwrap().unwrap();

    assert!(other.try_acquire(&id).unwrap().is_none());
}

#[test]
fn file_guard_excludes_second_holder() {
    let dir = TempDir::new().unwrap();
    // Two guards on one directory stand in for two processes
    let first = FileFlightGuard::open(dir.path()).unwrap();
    let second = FileFlightGuard::open(dir.path()).unwrap();
    let id = JobId::from("campaign-1");

    let permit = first.try_acquire(&id).unwrap().unwrap();
    assert_eq!(permit.job_id(), &id);
    assert!(second.try_acquire(&id).unwrap().is_none());

    drop(permit);
    assert!(second.try_acquire(&id).unwrap().is_some());
}

#[test]
fn file_guard_rejects_unsafe_ids() {
    let dir = TempDir::new().unwrap();
    let guard = FileFlightGuard::open(dir.path()).unwrap();

    let err = guard.try_acquire(&JobId::from("../x")).unwrap_err();

    assert!(matches!(err, StoreError::InvalidId(_)));
}

#[test]
fn permit_debug_names_kind() {
    let guard = LocalFlightGuard::new();
    let permit = guard.try_acquire(&JobId::from("j")).unwrap().unwrap();
    assert!(format!("{permit:?}").contains("local"));
}
