// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A run interrupted part way picks up where it stopped.

use crate::prelude::*;
use std::io::Write;

#[tokio::test(start_paused = true)]
async fn restarted_dispatcher_skips_recorded_targets() {
    let state = StateDir::new();
    let job = job_with_targets("reset-creds", 4);
    state.store().put(&job).unwrap();

    // First process: each call takes 1s; stop it while c-2 is in flight
    let first_op = FakeOperation::new().with_latency(Duration::from_secs(1)).fail("c-1", "locked");
    let first = state.dispatcher(first_op.clone(), unthrottled());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        trigger.cancel();
    });

    let stopped = expect_cancelled(first.dispatch(&job.id, cancel).await.unwrap());
    assert_eq!((stopped.succeeded, stopped.failed), (1, 2));
    assert_eq!(first_op.call_order(), ids(&["c-0", "c-1", "c-2"]));
    assert!(state.job_file("reset-creds").exists());
    drop(first);

    // Second process over the same directory
    let second_op = FakeOperation::new();
    let second = state.dispatcher(second_op.clone(), unthrottled());

    let summary =
        expect_completed(second.dispatch(&job.id, CancellationToken::new()).await.unwrap());

    assert_eq!(second_op.call_order(), ids(&["c-2", "c-3"]));
    assert_eq!(summary.resumed, 2);
    assert_eq!((summary.succeeded, summary.failed), (3, 1));
    let view = second.reporter().view();
    assert_eq!(
        view.snapshot.get("c-1").unwrap().status,
        TargetStatus::Failed { error: "locked".to_string() }
    );
    assert!(!state.job_file("reset-creds").exists());
}

#[tokio::test]
async fn torn_checkpoint_tail_is_ignored() {
    let state = StateDir::new();
    let job = job_with_targets("torn", 3);
    let store = state.store();
    store.put(&job).unwrap();
    store.record_outcome(&job.id, &CheckpointEntry::new("c-0", OperationOutcome::succeeded())).unwrap();
    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(state.progress_file("torn"))
            .unwrap();
        file.write_all(br#"{"targetId":"c-1","succ"#).unwrap();
    }

    let operation = FakeOperation::new();
    let dispatcher = state.dispatcher(operation.clone(), unthrottled());
    let summary =
        expect_completed(dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap());

    assert_eq!(summary.resumed, 1);
    assert_eq!(operation.call_order(), ids(&["c-1", "c-2"]));
}

#[tokio::test]
async fn replacing_a_job_discards_its_old_progress() {
    let state = StateDir::new();
    let store = state.store();
    let job = job_with_targets("weekly", 2);
    store.put(&job).unwrap();
    store.record_outcome(&job.id, &CheckpointEntry::new("c-0", OperationOutcome::succeeded())).unwrap();

    store.put(&job).unwrap();

    let operation = FakeOperation::new();
    let dispatcher = state.dispatcher(operation.clone(), unthrottled());
    let summary =
        expect_completed(dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap());

    assert_eq!(summary.resumed, 0);
    assert_eq!(operation.calls().len(), 2);
}
