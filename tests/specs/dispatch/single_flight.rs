// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two dispatchers sharing a state directory never run the same job at once.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn second_dispatcher_is_turned_away_while_first_runs() {
    let state = StateDir::new();
    let job = job_with_targets("promo", 3);
    state.store().put(&job).unwrap();

    let first_op = FakeOperation::new().with_latency(Duration::from_millis(100));
    let second_op = FakeOperation::new();
    let first = state.dispatcher(first_op.clone(), unthrottled());
    let second = state.dispatcher(second_op.clone(), unthrottled());

    let (a, b) = tokio::join!(
        first.dispatch(&job.id, CancellationToken::new()),
        second.dispatch(&job.id, CancellationToken::new()),
    );

    expect_completed(a.unwrap());
    assert_eq!(b.unwrap(), DispatchOutcome::AlreadyRunning);
    assert_eq!(first_op.calls().len(), 3);
    assert!(second_op.calls().is_empty());
}

#[tokio::test]
async fn lock_is_released_when_the_run_ends() {
    let state = StateDir::new();
    let job = job_with_targets("promo", 1);
    state.store().put(&job).unwrap();
    let dispatcher = state.dispatcher(FakeOperation::new(), unthrottled());
    expect_completed(dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap());

    // Store the same id again: a new job, not a re-run of the old one
    state.store().put(&job).unwrap();
    let operation = FakeOperation::new();
    let other = state.dispatcher(operation.clone(), unthrottled());

    expect_completed(other.dispatch(&job.id, CancellationToken::new()).await.unwrap());
    assert_eq!(operation.calls().len(), 1);
}
