// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A job goes from the store, through every target, and out of the store.

use crate::prelude::*;

#[tokio::test]
async fn campaign_runs_every_target_and_clears_the_job() {
    let state = StateDir::new();
    let job = BatchJob::builder()
        .id("campaign-2026-10")
        .targets(vec![
            Target::new("cust-1").name("Ada").contact("+15550101"),
            Target::new("cust-2").name("Grace").contact("+15550102"),
            Target::new("cust-3").name("Linus").contact("not-a-number"),
        ])
        .build();
    state.store().put(&job).unwrap();
    let stored: serde_json::Value =
        serde_json::from_slice(&std::fs::read(state.job_file("campaign-2026-10")).unwrap()).unwrap();
    assert_eq!(stored["targets"][2]["contact"], "not-a-number");
    assert!(stored.get("operationParams").is_some());

    let operation = FakeOperation::new().fail("cust-3", "invalid number");
    let dispatcher = state.dispatcher(operation.clone(), unthrottled());

    let summary =
        expect_completed(dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap());

    assert_eq!((summary.total, summary.succeeded, summary.failed), (3, 2, 1));
    assert_eq!(operation.call_order(), ids(&["cust-1", "cust-2", "cust-3"]));
    assert!(!state.job_file("campaign-2026-10").exists());
    assert!(!state.progress_file("campaign-2026-10").exists());

    let view = dispatcher.reporter().view();
    let failed = view.snapshot.get("cust-3").unwrap();
    assert_eq!(failed.status.error_detail(), Some("invalid number"));
    assert_eq!(failed.target.display.name.as_deref(), Some("Linus"));
    assert!(dispatcher.reporter().progress().completed);
}

#[tokio::test]
async fn restarting_a_finished_campaign_leaves_its_progress_alone() {
    let state = StateDir::new();
    let job = job_with_targets("campaign-rerun", 2);
    state.store().put(&job).unwrap();
    let operation = FakeOperation::new();
    let dispatcher = state.dispatcher(operation.clone(), unthrottled());
    expect_completed(dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap());

    let again = dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap();

    assert_eq!(again, DispatchOutcome::AlreadyFinished);
    assert_eq!(operation.calls().len(), 2);
    let progress = dispatcher.reporter().progress();
    assert!(progress.completed);
    assert_eq!(progress.percent_complete(), 100.0);
}

#[tokio::test]
async fn job_without_targets_is_a_job_level_error() {
    let state = StateDir::new();
    let job = job_with_targets("empty-list", 0);
    state.store().put(&job).unwrap();
    let operation = FakeOperation::new();
    let dispatcher = state.dispatcher(operation.clone(), unthrottled());

    let err = dispatcher.dispatch(&job.id, CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, DispatchError::NoTargets(_)));
    assert!(operation.calls().is_empty());
    assert!(dispatcher.reporter().job_error().is_some());
    assert!(!state.job_file("empty-list").exists());
}

#[tokio::test]
async fn start_without_a_stored_job_is_not_found() {
    let state = StateDir::new();
    let dispatcher = state.dispatcher(FakeOperation::new(), unthrottled());

    let err = dispatcher.dispatch(&JobId::from("never-stored"), CancellationToken::new()).await;

    assert!(matches!(err, Err(DispatchError::NotFound(_))));
    assert!(matches!(dispatcher.reporter().state(), RunState::Aborted(_)));
}

#[tokio::test]
async fn job_id_that_cannot_be_a_file_name_is_rejected() {
    let state = StateDir::new();
    let dispatcher = state.dispatcher(FakeOperation::new(), unthrottled());

    let err = dispatcher.dispatch(&JobId::from("../escape"), CancellationToken::new()).await;

    assert!(matches!(err, Err(DispatchError::Store(_))));
}
