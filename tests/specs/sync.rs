// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client sync layer against a live daemon over HTTP.

use crate::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tx_client::{claim_next, HttpRemote, RemoteError, RemoteStore, SyncClient, SyncConfig, SyncHandle};
use tx_daemon::http::{CreateJob, JobUpdate};

fn request(id: &str, requester: &str) -> CreateJob {
    CreateJob {
        id: Some(id.to_string()),
        requester: requester.into(),
        model: "tx-7b".to_string(),
        prompt: "summarize the changelog".to_string(),
        system_prompt: None,
        input_tokens: 20,
        estimated_cost: 150,
    }
}

async fn daemon_with_worker() -> Arc<HttpRemote> {
    let (base_url, _ctx) = spawn_daemon().await;
    let remote = Arc::new(HttpRemote::new(base_url));
    remote
        .register_worker(RegisterWorker {
            address: "w1".into(),
            name: "gpu-node-1".to_string(),
            models: vec!["tx-7b".to_string()],
        })
        .await
        .unwrap();
    remote
}

#[tokio::test]
async fn full_round_trip_over_the_wire() {
    let remote = daemon_with_worker().await;
    let client = SyncClient::new(remote.clone());
    let w1 = WorkerId::new("w1");

    client.create_job(request("job-1", "req-1")).await.unwrap();

    // Worker side: poll and claim.
    let claimed = claim_next(remote.as_ref(), &w1).await.unwrap().expect("a claimable job");
    assert_eq!(claimed.id, "job-1");
    assert_eq!(claimed.status, JobStatus::Assigned);

    // Drive to completion through PATCH ops.
    remote
        .update_job(&"job-1".into(), JobUpdate::StartProcessing { worker: w1.clone() })
        .await
        .unwrap();
    remote
        .update_job(&"job-1".into(), JobUpdate::StartStreaming { worker: w1.clone() })
        .await
        .unwrap();
    remote
        .update_job(
            &"job-1".into(),
            JobUpdate::AppendOutput { worker: w1.clone(), chunk: "ok".to_string(), tokens: 1 },
        )
        .await
        .unwrap();
    let job = remote
        .update_job(
            &"job-1".into(),
            JobUpdate::Complete { worker: w1.clone(), output: "ok".to_string(), actual_cost: 90 },
        )
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.actual_cost, Some(90));

    // Aggregates agree with what just happened.
    let stats = remote.stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.terminal, 1);
    assert_eq!(stats.total_actual_cost, 90);
    assert!(remote.pairings().await.unwrap().is_empty());
}

#[tokio::test]
async fn wire_errors_carry_daemon_status_codes() {
    let remote = daemon_with_worker().await;

    let err = remote.fetch_job(&"job-ghost".into()).await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 404, .. }), "got {err:?}");

    remote.create_job(request("job-1", "req-1")).await.unwrap();
    let err = remote.create_job(request("job-1", "req-1")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 409, .. }), "got {err:?}");

    let err = remote
        .update_job(
            &"job-1".into(),
            JobUpdate::Complete {
                worker: WorkerId::new("w1"),
                output: String::new(),
                actual_cost: 0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 400, .. }), "got {err:?}");
}

#[tokio::test]
async fn polling_sync_converges_on_daemon_state() {
    let remote = daemon_with_worker().await;
    remote.create_job(request("job-1", "req-1")).await.unwrap();
    remote.create_job(request("job-2", "req-2")).await.unwrap();

    let handle = SyncHandle::spawn(
        remote.clone(),
        SyncConfig::default().interval(Duration::from_millis(50)),
    );
    tokio::time::sleep(Duration::from_millis(250)).await;

    let snapshot = handle.cache().snapshot();
    assert_eq!(snapshot.len(), 2);
    // Newest first.
    assert!(snapshot[0].created_at_ms >= snapshot[1].created_at_ms);

    handle.shutdown().await;
}

#[tokio::test]
async fn requester_cancels_over_the_wire() {
    let remote = daemon_with_worker().await;
    let client = SyncClient::new(remote.clone());
    client.create_job(request("job-1", "req-1")).await.unwrap();

    let job = client.cancel_job(&"job-1".into(), &"req-1".into()).await.unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);

    // A worker can no longer claim it.
    let claimed = claim_next(remote.as_ref(), &WorkerId::new("w1")).await.unwrap();
    assert!(claimed.is_none());
}
