// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mid-stream failure and cancellation scenarios for the stream driver.

use crate::prelude::*;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tx_daemon::{run_job, BackendError, InferenceBackend, InferenceRequest, TokenChunk};

/// Emits a few chunks, then drops the stream without a done event.
struct DyingBackend;

#[async_trait]
impl InferenceBackend for DyingBackend {
    async fn generate(
        &self,
        _request: InferenceRequest,
    ) -> Result<mpsc::Receiver<TokenChunk>, BackendError> {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let _ = tx.send(TokenChunk::text("partial ")).await;
            let _ = tx.send(TokenChunk::text("answer")).await;
            // Upstream dies here; the channel closes with no done.
        });
        Ok(rx)
    }
}

#[tokio::test]
async fn mid_stream_death_resolves_to_failed_and_stays_failed() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");
    coordinator.create(job_config("job-j3", "req-carol")).unwrap();
    coordinator.claim(&"job-j3".into(), &w1).unwrap();

    let job = run_job(&coordinator, &DyingBackend, &"job-j3".into(), &w1, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("stream ended unexpectedly"));
    assert_eq!(job.output, "partial answer");
    assert!(job.completed_at_ms.is_some());

    // The failure is final: no re-claim, no late completion.
    let err = coordinator.claim(&"job-j3".into(), &WorkerId::new("w2")).unwrap_err();
    assert!(matches!(err, ClaimError::InvalidState { .. }), "got {err:?}");
    assert!(coordinator
        .complete(&"job-j3".into(), &w1, "answer".to_string(), 10)
        .is_err());
}

#[tokio::test]
async fn operator_fail_during_streaming_wins_over_the_driver() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");
    coordinator.create(job_config("job-1", "req-1")).unwrap();
    coordinator.claim(&"job-1".into(), &w1).unwrap();
    coordinator.start_processing(&"job-1".into(), &w1).unwrap();
    coordinator.start_streaming(&"job-1".into(), &w1).unwrap();

    // The upstream timeout is reported while chunks are still in flight.
    coordinator.fail(&"job-1".into(), None, "upstream timeout").unwrap();

    // Late driver writes bounce off the terminal record.
    let err = coordinator.append_output(&"job-1".into(), &w1, "late", 1).unwrap_err();
    assert!(matches!(err, ClaimError::InvalidState { .. }), "got {err:?}");
    let job = coordinator.store().get(&"job-1".into()).unwrap();
    assert_eq!(job.error.as_deref(), Some("upstream timeout"));
}

#[tokio::test]
async fn cancellation_always_lands_terminal() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");
    coordinator.create(job_config("job-1", "req-1")).unwrap();
    coordinator.claim(&"job-1".into(), &w1).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let job = run_job(&coordinator, &DyingBackend, &"job-1".into(), &w1, cancel.clone())
        .await
        .unwrap();
    assert!(job.is_terminal());
    assert_eq!(job.status, JobStatus::Failed);

    // Re-running the abort path changes nothing.
    let again = run_job(&coordinator, &DyingBackend, &"job-1".into(), &w1, cancel)
        .await
        .unwrap_err();
    assert!(matches!(again, ClaimError::InvalidTransition(_)), "got {again:?}");
    assert_eq!(coordinator.store().get(&"job-1".into()).unwrap(), job);
}
