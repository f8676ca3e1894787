// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim coordination and validated transitions.
//!
//! Every status-bearing write goes through here: look up the job, consult
//! the state machine for `(current, target)`, reject with a typed error,
//! otherwise commit under the store lock. The claim itself is a
//! compare-and-swap — at most one worker ever wins a pending job, and no
//! claim can ever succeed again afterwards, including after failure or
//! cancellation.
//!
//! Expected rejections are `Err` values the caller inspects; nothing in
//! this module panics.

use tracing::{debug, info};

use crate::registry::WorkerRegistry;
use crate::store::JobStore;
use tx_core::{
    validate_transition, Clock, Job, JobConfig, JobId, JobStatus, RequesterId, TransitionError,
    WorkerId,
};

/// Rejection of a claim or transition operation. None of these are
/// retried internally; callers decide what to do next.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("job {0} not found")]
    JobNotFound(JobId),

    #[error("worker {0} is not registered")]
    WorkerNotFound(WorkerId),

    #[error("job {0} already exists")]
    Duplicate(JobId),

    /// The job is not in the state the operation requires (for claim:
    /// anything but pending, including already-terminal).
    #[error("job {id} is {status}; expected {expected}")]
    InvalidState { id: JobId, status: JobStatus, expected: JobStatus },

    /// Lost the claim race: another worker holds the job.
    #[error("job {0} was already claimed by another worker")]
    AlreadyClaimed(JobId),

    /// Continuation op from a worker that does not hold the claim.
    #[error("job {id} is assigned to a different worker")]
    NotAssignee { id: JobId },

    /// Cancellation attempted by someone other than the job's requester.
    #[error("job {id} belongs to a different requester")]
    NotRequester { id: JobId },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

/// Serializes all job mutations over the single shared store.
#[derive(Clone)]
pub struct Coordinator<C: Clock> {
    store: JobStore,
    registry: WorkerRegistry,
    clock: C,
}

impl<C: Clock> Coordinator<C> {
    pub fn new(clock: C) -> Self {
        Self { store: JobStore::new(), registry: WorkerRegistry::new(), clock }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Create and store a new pending job.
    pub fn create(&self, config: JobConfig) -> Result<Job, ClaimError> {
        let job = Job::new(config, &self.clock);
        let id = job.id.clone();
        if !self.store.insert(job.clone()) {
            return Err(ClaimError::Duplicate(id));
        }
        info!(job = %id, requester = %job.requester, "job created");
        Ok(job)
    }

    /// Assign exactly one worker to a pending job.
    ///
    /// Compare-and-swap under the store lock: the precondition (pending,
    /// unassigned) is re-checked at write time, so of any number of
    /// concurrent attempts exactly one commits and the rest observe the
    /// winner's write and fail with [`ClaimError::AlreadyClaimed`].
    pub fn claim(&self, id: &JobId, worker: &WorkerId) -> Result<Job, ClaimError> {
        if !self.registry.contains(worker) {
            return Err(ClaimError::WorkerNotFound(worker.clone()));
        }
        let now = self.clock.epoch_ms();
        let claimed = self.store.update_with(id, ClaimError::JobNotFound(id.clone()), |job| {
            match job.status {
                JobStatus::Pending if job.assigned_worker.is_none() => {
                    validate_transition(job.status, JobStatus::Assigned)?;
                    job.status = JobStatus::Assigned;
                    job.assigned_worker = Some(worker.clone());
                    job.started_at_ms = Some(now);
                    Ok(job.clone())
                }
                // A worker already holds (or held) the job.
                JobStatus::Pending | JobStatus::Assigned => {
                    Err(ClaimError::AlreadyClaimed(id.clone()))
                }
                status => Err(ClaimError::InvalidState {
                    id: id.clone(),
                    status,
                    expected: JobStatus::Pending,
                }),
            }
        })?;
        info!(job = %id, worker = %worker, "job claimed");
        Ok(claimed)
    }

    /// assigned → running; only the assigned worker.
    pub fn start_processing(&self, id: &JobId, worker: &WorkerId) -> Result<Job, ClaimError> {
        self.transition(id, Some(worker), JobStatus::Running, |_| {})
    }

    /// running → streaming; only the assigned worker.
    pub fn start_streaming(&self, id: &JobId, worker: &WorkerId) -> Result<Job, ClaimError> {
        self.transition(id, Some(worker), JobStatus::Streaming, |_| {})
    }

    /// Accumulate a streamed chunk onto the job record. Not a status
    /// transition; legal only while streaming, and only for the assignee.
    pub fn append_output(
        &self,
        id: &JobId,
        worker: &WorkerId,
        chunk: &str,
        tokens: u64,
    ) -> Result<Job, ClaimError> {
        self.store.update_with(id, ClaimError::JobNotFound(id.clone()), |job| {
            if !job.is_assigned_to(worker) {
                return Err(ClaimError::NotAssignee { id: id.clone() });
            }
            if job.status != JobStatus::Streaming {
                return Err(ClaimError::InvalidState {
                    id: id.clone(),
                    status: job.status,
                    expected: JobStatus::Streaming,
                });
            }
            job.output.push_str(chunk);
            job.output_tokens += tokens;
            Ok(job.clone())
        })
    }

    /// running|streaming → complete, with the final output and cost.
    pub fn complete(
        &self,
        id: &JobId,
        worker: &WorkerId,
        output: String,
        actual_cost: u64,
    ) -> Result<Job, ClaimError> {
        let job = self.transition(id, Some(worker), JobStatus::Complete, |job| {
            job.output = output;
            job.actual_cost = Some(actual_cost);
        })?;
        info!(job = %id, worker = %worker, cost = actual_cost, "job complete");
        Ok(job)
    }

    /// assigned|running|streaming → failed, with the upstream error.
    ///
    /// With `Some(worker)` the caller must hold the claim; `None` is the
    /// operator path and may fail any active job.
    pub fn fail(
        &self,
        id: &JobId,
        worker: Option<&WorkerId>,
        error: impl Into<String>,
    ) -> Result<Job, ClaimError> {
        let error = error.into();
        let job = self.transition(id, worker, JobStatus::Failed, |job| {
            job.error = Some(error);
        })?;
        info!(job = %id, error = %job.error.as_deref().unwrap_or_default(), "job failed");
        Ok(job)
    }

    /// Like [`Coordinator::fail`], but a no-op success when the job has
    /// already reached a terminal status. This is what makes stream
    /// cancellation idempotent: however many times the abort path runs,
    /// the job ends terminal and is never failed twice. The terminal check
    /// and the failure commit happen under one store lock, so a racing
    /// terminal resolution is observed, never double-applied.
    pub fn fail_if_active(&self, id: &JobId, error: impl Into<String>) -> Result<Job, ClaimError> {
        let error = error.into();
        let now = self.clock.epoch_ms();
        self.store.update_with(id, ClaimError::JobNotFound(id.clone()), |job| {
            if job.is_terminal() {
                debug!(job = %id, status = %job.status, "fail_if_active: already terminal");
                return Ok(job.clone());
            }
            validate_transition(job.status, JobStatus::Failed)?;
            job.status = JobStatus::Failed;
            job.error = Some(error);
            job.completed_at_ms = Some(now);
            info!(job = %id, "job failed");
            Ok(job.clone())
        })
    }

    /// pending → cancelled; the only requester-initiated transition.
    /// Pending-only as an operation, even though the table also admits
    /// cancelling an assigned job.
    pub fn cancel(&self, id: &JobId, requester: &RequesterId) -> Result<Job, ClaimError> {
        let now = self.clock.epoch_ms();
        let job = self.store.update_with(id, ClaimError::JobNotFound(id.clone()), |job| {
            if &job.requester != requester {
                return Err(ClaimError::NotRequester { id: id.clone() });
            }
            if job.status != JobStatus::Pending {
                return Err(ClaimError::InvalidState {
                    id: id.clone(),
                    status: job.status,
                    expected: JobStatus::Pending,
                });
            }
            validate_transition(job.status, JobStatus::Cancelled)?;
            job.status = JobStatus::Cancelled;
            job.completed_at_ms = Some(now);
            Ok(job.clone())
        })?;
        info!(job = %id, requester = %requester, "job cancelled");
        Ok(job)
    }

    /// Shared validate-then-commit path for worker-driven transitions.
    fn transition(
        &self,
        id: &JobId,
        assignee: Option<&WorkerId>,
        to: JobStatus,
        apply: impl FnOnce(&mut Job),
    ) -> Result<Job, ClaimError> {
        let now = self.clock.epoch_ms();
        self.store.update_with(id, ClaimError::JobNotFound(id.clone()), |job| {
            if let Some(worker) = assignee {
                if !job.is_assigned_to(worker) {
                    return Err(ClaimError::NotAssignee { id: id.clone() });
                }
            }
            validate_transition(job.status, to)?;
            job.status = to;
            if to.is_terminal() {
                job.completed_at_ms = Some(now);
            }
            apply(job);
            Ok(job.clone())
        })
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
