// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-side claim polling.

use tracing::debug;

use crate::remote::{RemoteError, RemoteStore};
use tx_core::{Job, JobStatus, WorkerId};
use tx_daemon::http::JobUpdate;

/// Fetch the pending queue and claim the first job we win, oldest first.
///
/// A lost race (daemon 409) just moves on to the next candidate; any
/// other rejection aborts. `Ok(None)` means nothing was claimable.
pub async fn claim_next(
    remote: &dyn RemoteStore,
    worker: &WorkerId,
) -> Result<Option<Job>, RemoteError> {
    let pending = remote.fetch_jobs(Some(JobStatus::Pending), None).await?;
    // Listings are newest first; claim from the back of the queue.
    for job in pending.into_iter().rev() {
        match remote.update_job(&job.id, JobUpdate::Claim { worker: worker.clone() }).await {
            Ok(claimed) => return Ok(Some(claimed)),
            Err(err) if err.is_conflict() => {
                debug!(job = %job.id, "lost claim race; trying next");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "worker_loop_tests.rs"]
mod tests;
