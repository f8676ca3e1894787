// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authoritative job record store.
//!
//! Exactly one instance backs the whole daemon; every route handler and
//! the coordinator share it. Status-bearing writes go through
//! [`JobStore::update_with`] under the store lock, so concurrent claim
//! attempts resolve deterministically rather than last-write-wins.
//!
//! The store carries no business rules. Transition validation lives in
//! the coordinator; this module only holds records and answers queries.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use tx_core::{active_pairings, Job, JobId, JobPairing, JobStatus, PipelineStats, RequesterId};

/// Filter for job listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub requester: Option<RequesterId>,
}

impl JobFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: JobStatus) -> Self {
        Self { status: Some(status), requester: None }
    }

    pub fn with_requester(requester: impl Into<RequesterId>) -> Self {
        Self { status: None, requester: Some(requester.into()) }
    }

    fn matches(&self, job: &Job) -> bool {
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(requester) = &self.requester {
            if &job.requester != requester {
                return false;
            }
        }
        true
    }
}

/// Shared in-memory job map. Cheap to clone; clones share the same records.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job. Returns false (and leaves the store untouched)
    /// when the id is already present.
    pub fn insert(&self, job: Job) -> bool {
        let mut jobs = self.jobs.lock();
        if jobs.contains_key(&job.id) {
            return false;
        }
        jobs.insert(job.id.clone(), job);
        true
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.lock().get(id).cloned()
    }

    pub fn contains(&self, id: &JobId) -> bool {
        self.jobs.lock().contains_key(id)
    }

    /// Jobs matching the filter, newest-first by creation time.
    pub fn list(&self, filter: &JobFilter) -> Vec<Job> {
        let jobs = self.jobs.lock();
        let mut out: Vec<Job> = jobs.values().filter(|j| filter.matches(j)).cloned().collect();
        out.sort_by(|a, b| {
            b.created_at_ms.cmp(&a.created_at_ms).then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        out
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    /// Aggregate statistics over every stored job.
    pub fn stats(&self) -> PipelineStats {
        PipelineStats::compute(self.jobs.lock().values())
    }

    /// Current requester↔worker pairings over every stored job.
    pub fn active_pairings(&self) -> Vec<JobPairing> {
        let mut pairings = active_pairings(self.jobs.lock().values());
        pairings.sort_by(|a, b| a.job_id.as_str().cmp(b.job_id.as_str()));
        pairings
    }

    /// Run a validated mutation against one job while holding the store
    /// lock. `missing` is returned when the id is unknown; `op` observes
    /// the current record and either commits its changes or bails with a
    /// typed error, leaving the record as it found it only if it hasn't
    /// written yet (ops validate before writing).
    pub(crate) fn update_with<T, E>(
        &self,
        id: &JobId,
        missing: E,
        op: impl FnOnce(&mut Job) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut jobs = self.jobs.lock();
        match jobs.get_mut(id) {
            Some(job) => op(job),
            None => Err(missing),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
