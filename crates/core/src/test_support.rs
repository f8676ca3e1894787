// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::job::{Job, JobConfig};
use crate::status::JobStatus;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::status::{JobStatus, Phase};
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Pending),
            Just(JobStatus::Assigned),
            Just(JobStatus::Running),
            Just(JobStatus::Streaming),
            Just(JobStatus::Complete),
            Just(JobStatus::Failed),
            Just(JobStatus::Cancelled),
        ]
    }

    pub fn arb_phase() -> impl Strategy<Value = Phase> {
        prop_oneof![Just(Phase::Queued), Just(Phase::Processing), Just(Phase::Terminal)]
    }
}

// ── Factory functions ───────────────────────────────────────────────────

/// A config for a plain pending job.
pub fn job_config(id: &str, requester: &str) -> JobConfig {
    JobConfig::builder(id, requester, "tx-7b", "write a haiku about gradients")
        .input_tokens(12)
        .estimated_cost(100)
        .build()
}

/// A pending job owned by `requester`.
pub fn pending_job(id: &str, requester: &str) -> Job {
    Job::new_with_epoch_ms(job_config(id, requester), 1_000_000)
}

/// A job claimed (and possibly further along) by `worker`.
pub fn processing_job(id: &str, requester: &str, worker: &str, status: JobStatus) -> Job {
    let mut job = pending_job(id, requester);
    job.status = status;
    job.assigned_worker = Some(worker.into());
    job.started_at_ms = Some(1_000_500);
    job
}

/// A terminal complete job with known cost and duration.
pub fn complete_job(id: &str, requester: &str, worker: &str, actual_cost: u64) -> Job {
    let mut job = processing_job(id, requester, worker, JobStatus::Complete);
    job.output = "finished output".to_string();
    job.output_tokens = 42;
    job.actual_cost = Some(actual_cost);
    job.completed_at_ms = Some(1_003_500);
    job
}
