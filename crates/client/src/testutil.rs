// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles shared by the client test modules.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::remote::{RemoteError, RemoteStore};
use tx_core::{FakeClock, Job, JobConfig, JobId, JobPairing, JobStatus, PipelineStats, RequesterId};
use tx_daemon::coordinator::Coordinator;
use tx_daemon::http::{ApiError, CreateJob, JobUpdate};
use tx_daemon::registry::{RegisterWorker, WorkerRecord};
use tx_daemon::store::JobFilter;

fn reject(err: impl Into<ApiError>) -> RemoteError {
    let err = err.into();
    RemoteError::Status { status: err.status().as_u16(), message: err.to_string() }
}

/// A daemon in a box: the real coordinator behind the RemoteStore seam,
/// with a switch to make fetches fail.
pub struct InProcessRemote {
    pub coordinator: Coordinator<FakeClock>,
    fetch_fails: Mutex<bool>,
    write_fails: Mutex<bool>,
    stale_snapshot: Mutex<Option<Vec<Job>>>,
}

impl InProcessRemote {
    pub fn new() -> Arc<Self> {
        let coordinator = Coordinator::new(FakeClock::new());
        coordinator.registry().register(
            RegisterWorker { address: "w1".into(), name: "w1".to_string(), models: vec![] },
            coordinator.clock(),
        );
        Arc::new(Self {
            coordinator,
            fetch_fails: Mutex::new(false),
            write_fails: Mutex::new(false),
            stale_snapshot: Mutex::new(None),
        })
    }

    pub fn set_fetch_fails(&self, fails: bool) {
        *self.fetch_fails.lock() = fails;
    }

    pub fn set_write_fails(&self, fails: bool) {
        *self.write_fails.lock() = fails;
    }

    /// Make the next fetches answer with a fixed stale listing, as if the
    /// store moved on after the snapshot was taken.
    pub fn set_stale_snapshot(&self, jobs: Vec<Job>) {
        *self.stale_snapshot.lock() = Some(jobs);
    }

    fn check_writable(&self) -> Result<(), RemoteError> {
        if *self.write_fails.lock() {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for InProcessRemote {
    async fn create_job(&self, req: CreateJob) -> Result<Job, RemoteError> {
        self.check_writable()?;
        let id = match req.id.as_deref() {
            None => JobId::generate(),
            Some(id) if !id.trim().is_empty() => JobId::new(id),
            Some(_) => return Err(reject(ApiError::bad_request("job id must not be blank"))),
        };
        let mut builder = JobConfig::builder(id, req.requester, req.model, req.prompt)
            .input_tokens(req.input_tokens)
            .estimated_cost(req.estimated_cost);
        if let Some(system_prompt) = req.system_prompt {
            builder = builder.system_prompt(system_prompt);
        }
        self.coordinator.create(builder.build()).map_err(reject)
    }

    async fn fetch_jobs(
        &self,
        status: Option<JobStatus>,
        requester: Option<&RequesterId>,
    ) -> Result<Vec<Job>, RemoteError> {
        if *self.fetch_fails.lock() {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        if let Some(stale) = self.stale_snapshot.lock().clone() {
            return Ok(stale);
        }
        let filter = JobFilter { status, requester: requester.cloned() };
        Ok(self.coordinator.store().list(&filter))
    }

    async fn fetch_job(&self, id: &JobId) -> Result<Job, RemoteError> {
        self.coordinator
            .store()
            .get(id)
            .ok_or_else(|| reject(tx_daemon::ClaimError::JobNotFound(id.clone())))
    }

    async fn update_job(&self, id: &JobId, op: JobUpdate) -> Result<Job, RemoteError> {
        self.check_writable()?;
        let coordinator = &self.coordinator;
        let result = match op {
            JobUpdate::Claim { worker } => coordinator.claim(id, &worker),
            JobUpdate::StartProcessing { worker } => coordinator.start_processing(id, &worker),
            JobUpdate::StartStreaming { worker } => coordinator.start_streaming(id, &worker),
            JobUpdate::AppendOutput { worker, chunk, tokens } => {
                coordinator.append_output(id, &worker, &chunk, tokens)
            }
            JobUpdate::Complete { worker, output, actual_cost } => {
                coordinator.complete(id, &worker, output, actual_cost)
            }
            JobUpdate::Fail { worker, error } => coordinator.fail(id, worker.as_ref(), error),
            JobUpdate::Cancel { requester } => coordinator.cancel(id, &requester),
        };
        result.map_err(reject)
    }

    async fn cancel_job(&self, id: &JobId, requester: &RequesterId) -> Result<Job, RemoteError> {
        self.coordinator.cancel(id, requester).map_err(reject)
    }

    async fn register_worker(&self, req: RegisterWorker) -> Result<WorkerRecord, RemoteError> {
        Ok(self.coordinator.registry().register(req, self.coordinator.clock()))
    }

    async fn pairings(&self) -> Result<Vec<JobPairing>, RemoteError> {
        Ok(self.coordinator.store().active_pairings())
    }

    async fn stats(&self) -> Result<PipelineStats, RemoteError> {
        Ok(self.coordinator.store().stats())
    }
}

pub fn create_request(id: &str, requester: &str) -> CreateJob {
    CreateJob {
        id: Some(id.to_string()),
        requester: requester.into(),
        model: "tx-7b".to_string(),
        prompt: "say hello".to_string(),
        system_prompt: None,
        input_tokens: 5,
        estimated_cost: 100,
    }
}
