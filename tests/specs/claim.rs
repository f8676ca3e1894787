// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim coordination under contention, and the cancellation scenarios.

use crate::prelude::*;

#[test]
fn many_workers_one_winner() {
    let coordinator = coordinator();
    // More contenders than the default registry.
    for n in 3..=8 {
        coordinator.registry().register(
            RegisterWorker {
                address: format!("w{n}").into(),
                name: format!("w{n}"),
                models: vec![],
            },
            coordinator.clock(),
        );
    }
    coordinator.create(job_config("job-hot", "req-1")).unwrap();

    let handles: Vec<_> = (1..=8)
        .map(|n| {
            let coordinator = coordinator.clone();
            std::thread::spawn(move || {
                coordinator.claim(&"job-hot".into(), &WorkerId::new(format!("w{n}")))
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one winner: {results:?}");
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(ClaimError::AlreadyClaimed(_)))));

    // The stored assignment is the winner's, permanently.
    let job = coordinator.store().get(&"job-hot".into()).unwrap();
    assert_eq!(job.assigned_worker, winners[0].assigned_worker);
    assert_eq!(job.status, JobStatus::Assigned);
}

#[test]
fn cancelled_job_is_never_claimable() {
    let coordinator = coordinator();
    coordinator.create(job_config("job-j2", "req-bob")).unwrap();

    // Requester withdraws before any worker arrives.
    let job = coordinator.cancel(&"job-j2".into(), &"req-bob".into()).unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(job.completed_at_ms.is_some());

    // Late claims are rejected with the actual state, not a race error.
    let err = coordinator.claim(&"job-j2".into(), &WorkerId::new("w1")).unwrap_err();
    assert_eq!(
        err,
        ClaimError::InvalidState {
            id: "job-j2".into(),
            status: JobStatus::Cancelled,
            expected: JobStatus::Pending,
        }
    );
}

#[test]
fn cancellation_is_requester_only_and_pending_only() {
    let coordinator = coordinator();
    coordinator.create(job_config("job-1", "req-1")).unwrap();

    let err = coordinator.cancel(&"job-1".into(), &"req-mallory".into()).unwrap_err();
    assert_eq!(err, ClaimError::NotRequester { id: "job-1".into() });

    coordinator.claim(&"job-1".into(), &WorkerId::new("w1")).unwrap();
    let err = coordinator.cancel(&"job-1".into(), &"req-1".into()).unwrap_err();
    assert_eq!(
        err,
        ClaimError::InvalidState {
            id: "job-1".into(),
            status: JobStatus::Assigned,
            expected: JobStatus::Pending,
        }
    );
}

#[test]
fn terminal_records_are_immutable_history() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");
    coordinator.create(job_config("job-1", "req-1")).unwrap();
    coordinator.claim(&"job-1".into(), &w1).unwrap();
    coordinator.start_processing(&"job-1".into(), &w1).unwrap();
    coordinator.complete(&"job-1".into(), &w1, "done".to_string(), 50).unwrap();

    let before = coordinator.store().get(&"job-1".into()).unwrap();
    assert!(coordinator.complete(&"job-1".into(), &w1, "done".to_string(), 50).is_err());
    assert!(coordinator.fail(&"job-1".into(), None, "nope").is_err());
    assert!(coordinator.cancel(&"job-1".into(), &"req-1".into()).is_err());
    assert_eq!(coordinator.store().get(&"job-1".into()).unwrap(), before);
}
