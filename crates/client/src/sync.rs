// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling sync and optimistic writes.
//!
//! [`SyncHandle`] keeps a [`JobCache`] converging toward the daemon by
//! polling on an interval; a failed tick logs and leaves the cache as it
//! was. [`SyncClient`] applies writes to the cache first and then mirrors
//! them to the daemon — eventual consistency, not two-phase commit: a
//! failed mirror is logged, never rolled back, and the next successful
//! poll reconciles whatever the daemon actually decided.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::JobCache;
use crate::remote::{RemoteError, RemoteStore};
use tx_core::{
    validate_transition, Clock, Job, JobConfig, JobId, JobStatus, RequesterId, SystemClock,
};
use tx_daemon::http::{CreateJob, JobUpdate};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// What the polling loop fetches each tick.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub interval: Duration,
    pub status: Option<JobStatus>,
    pub requester: Option<RequesterId>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL, status: None, requester: None }
    }
}

impl SyncConfig {
    tx_core::setters! {
        set {
            interval: Duration,
        }
        option {
            status: JobStatus,
            requester: RequesterId,
        }
    }
}

/// Running poll loop plus the cache it feeds.
pub struct SyncHandle {
    cache: JobCache,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn spawn(remote: Arc<dyn RemoteStore>, config: SyncConfig) -> Self {
        let cache = JobCache::new();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(remote, config, cache.clone(), cancel.clone()));
        Self { cache, cancel, task }
    }

    pub fn cache(&self) -> &JobCache {
        &self.cache
    }

    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

async fn poll_loop(
    remote: Arc<dyn RemoteStore>,
    config: SyncConfig,
    cache: JobCache,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match remote.fetch_jobs(config.status, config.requester.as_ref()).await {
                    Ok(jobs) => {
                        debug!(count = jobs.len(), "sync tick merged");
                        cache.merge(jobs);
                    }
                    Err(err) => warn!(error = %err, "sync fetch failed; cache retained"),
                }
            }
        }
    }
}

/// Write-through client: cache first, daemon second.
#[derive(Clone)]
pub struct SyncClient<C: Clock = SystemClock> {
    remote: Arc<dyn RemoteStore>,
    cache: JobCache,
    clock: C,
}

impl SyncClient<SystemClock> {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self::with_clock(remote, JobCache::new(), SystemClock)
    }
}

impl<C: Clock> SyncClient<C> {
    pub fn with_clock(remote: Arc<dyn RemoteStore>, cache: JobCache, clock: C) -> Self {
        Self { remote, cache, clock }
    }

    pub fn cache(&self) -> &JobCache {
        &self.cache
    }

    /// Record the job locally as pending, then mirror the create.
    pub async fn create_job(&self, req: CreateJob) -> Result<Job, RemoteError> {
        if let Some(id) = req.id.as_deref().filter(|s| !s.trim().is_empty()) {
            let mut builder =
                JobConfig::builder(id, req.requester.clone(), req.model.clone(), req.prompt.clone())
                    .input_tokens(req.input_tokens)
                    .estimated_cost(req.estimated_cost);
            if let Some(system_prompt) = &req.system_prompt {
                builder = builder.system_prompt(system_prompt.clone());
            }
            self.cache.apply(Job::new(builder.build(), &self.clock));
        }
        match self.remote.create_job(req).await {
            Ok(job) => {
                self.cache.apply(job.clone());
                Ok(job)
            }
            Err(err) => {
                warn!(error = %err, "create mirror failed; keeping local record");
                Err(err)
            }
        }
    }

    /// Project the op onto the cached record, then mirror it. The local
    /// projection only commits transitions the table would allow; the
    /// daemon's answer replaces it either way on success.
    pub async fn update_job(&self, id: &JobId, op: JobUpdate) -> Result<Job, RemoteError> {
        if let Some(mut job) = self.cache.get(id) {
            if project(&mut job, &op, self.clock.epoch_ms()) {
                self.cache.apply(job);
            }
        }
        match self.remote.update_job(id, op).await {
            Ok(job) => {
                self.cache.apply(job.clone());
                Ok(job)
            }
            Err(err) => {
                warn!(job = %id, error = %err, "update mirror failed; keeping local record");
                Err(err)
            }
        }
    }

    /// Cancel locally (pending only), then mirror the delete.
    pub async fn cancel_job(&self, id: &JobId, requester: &RequesterId) -> Result<Job, RemoteError> {
        if let Some(mut job) = self.cache.get(id) {
            let op = JobUpdate::Cancel { requester: requester.clone() };
            if project(&mut job, &op, self.clock.epoch_ms()) {
                self.cache.apply(job);
            }
        }
        match self.remote.cancel_job(id, requester).await {
            Ok(job) => {
                self.cache.apply(job.clone());
                Ok(job)
            }
            Err(err) => {
                warn!(job = %id, error = %err, "cancel mirror failed; keeping local record");
                Err(err)
            }
        }
    }
}

/// Optimistic local application of one lifecycle op. Returns false (and
/// leaves the record untouched) when the transition would be illegal.
fn project(job: &mut Job, op: &JobUpdate, now: u64) -> bool {
    let transition = |job: &mut Job, to: JobStatus| -> bool {
        if validate_transition(job.status, to).is_err() {
            return false;
        }
        job.status = to;
        if to.is_terminal() {
            job.completed_at_ms = Some(now);
        }
        true
    };
    match op {
        JobUpdate::Claim { worker } => {
            if job.assigned_worker.is_some() || !transition(job, JobStatus::Assigned) {
                return false;
            }
            job.assigned_worker = Some(worker.clone());
            job.started_at_ms = Some(now);
            true
        }
        JobUpdate::StartProcessing { .. } => transition(job, JobStatus::Running),
        JobUpdate::StartStreaming { .. } => transition(job, JobStatus::Streaming),
        JobUpdate::AppendOutput { chunk, tokens, .. } => {
            if job.status != JobStatus::Streaming {
                return false;
            }
            job.output.push_str(chunk);
            job.output_tokens += tokens;
            true
        }
        JobUpdate::Complete { output, actual_cost, .. } => {
            if !transition(job, JobStatus::Complete) {
                return false;
            }
            job.output = output.clone();
            job.actual_cost = Some(*actual_cost);
            true
        }
        JobUpdate::Fail { error, .. } => {
            if !transition(job, JobStatus::Failed) {
                return false;
            }
            job.error = Some(error.clone());
            true
        }
        JobUpdate::Cancel { requester } => {
            // Cancellation is a pending-only operation, narrower than the
            // table's cancelled edges.
            if &job.requester != requester || job.status != JobStatus::Pending {
                return false;
            }
            transition(job, JobStatus::Cancelled)
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
