// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requester↔worker pairing, derived on demand.
//!
//! A pairing exists while a job has an assigned worker and has not yet
//! reached a terminal status. Pairings are never stored; they are a pure
//! function of the job set.

use crate::id::JobId;
use crate::job::Job;
use crate::requester::RequesterId;
use crate::status::JobStatus;
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

/// The live association between a requester and the worker currently
/// handling their job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPairing {
    pub job_id: JobId,
    pub requester: RequesterId,
    pub worker: WorkerId,
    pub status: JobStatus,
}

impl JobPairing {
    /// Derive the pairing for one job. `None` when the job has no
    /// assigned worker or is terminal.
    pub fn for_job(job: &Job) -> Option<JobPairing> {
        if job.is_terminal() {
            return None;
        }
        let worker = job.assigned_worker.clone()?;
        Some(JobPairing {
            job_id: job.id.clone(),
            requester: job.requester.clone(),
            worker,
            status: job.status,
        })
    }
}

/// All current pairings over a job set: every job with an assigned worker
/// whose phase is not terminal. The basis for "who is working with whom
/// right now".
pub fn active_pairings<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Vec<JobPairing> {
    jobs.into_iter().filter_map(JobPairing::for_job).collect()
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod tests;
