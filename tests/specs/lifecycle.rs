// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full-lifecycle scenarios through the coordinator, with the role
//! projections and stats checked along the way.

use crate::prelude::*;

#[test]
fn requester_submits_worker_streams_to_completion() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");

    // Requester submits.
    let job = coordinator.create(job_config("job-j1", "req-alice")).unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.phase(), Phase::Queued);

    // Worker claims and processes.
    coordinator.clock().advance_ms(250);
    coordinator.claim(&"job-j1".into(), &w1).unwrap();
    coordinator.start_processing(&"job-j1".into(), &w1).unwrap();
    coordinator.start_streaming(&"job-j1".into(), &w1).unwrap();
    for chunk in ["The", " answer", " is", " 42."] {
        coordinator.append_output(&"job-j1".into(), &w1, chunk, 1).unwrap();
    }
    coordinator.clock().advance_ms(1_750);
    let job = coordinator
        .complete(&"job-j1".into(), &w1, "The answer is 42.".to_string(), 320)
        .unwrap();

    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.phase(), Phase::Terminal);
    assert_eq!(job.output, "The answer is 42.");
    assert_eq!(job.output_tokens, 4);
    assert_eq!(job.actual_cost, Some(320));
    assert_eq!(job.processing_duration_ms(), Some(1_750));

    // Requester's view: reviewable once complete.
    let view = RequesterJobView::project(&job, false);
    assert_eq!(view.phase, Phase::Terminal);
    assert!(view.can_review);
    assert!(!RequesterJobView::project(&job, true).can_review);

    // Stats reflect the single completed job.
    let stats = coordinator.store().stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.terminal, 1);
    assert_eq!(stats.total_actual_cost, 320);
    assert_eq!(stats.avg_processing_ms, 1_750.0);
}

#[test]
fn worker_views_hide_the_requester_from_non_assignees() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");
    let w2 = WorkerId::new("w2");

    coordinator.create(job_config("job-1", "req-alice")).unwrap();
    coordinator.claim(&"job-1".into(), &w1).unwrap();
    let job = coordinator.store().get(&"job-1".into()).unwrap();

    let mine = WorkerJobView::project(&job, Some(&w1));
    assert!(mine.is_mine);
    assert_eq!(mine.requester, Some(RequesterId::new("req-alice")));

    let theirs = WorkerJobView::project(&job, Some(&w2));
    assert!(!theirs.is_mine);
    assert_eq!(theirs.requester, None);

    let anonymous = WorkerJobView::project(&job, None);
    assert!(!anonymous.is_mine);
    assert_eq!(anonymous.requester, None);
}

#[test]
fn pairings_track_only_in_flight_assignments() {
    let coordinator = coordinator();
    let w1 = WorkerId::new("w1");

    coordinator.create(job_config("job-a", "req-1")).unwrap();
    coordinator.create(job_config("job-b", "req-2")).unwrap();
    coordinator.claim(&"job-a".into(), &w1).unwrap();

    let pairings = coordinator.store().active_pairings();
    assert_eq!(pairings.len(), 1);
    assert_eq!(pairings[0].job_id, "job-a");
    assert_eq!(pairings[0].requester, "req-1");
    assert_eq!(pairings[0].worker, "w1");

    // Completion dissolves the pairing.
    coordinator.start_processing(&"job-a".into(), &w1).unwrap();
    coordinator.complete(&"job-a".into(), &w1, String::new(), 10).unwrap();
    assert!(coordinator.store().active_pairings().is_empty());
}
