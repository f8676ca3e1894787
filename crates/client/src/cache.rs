// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local job snapshot.
//!
//! The cache only ever moves toward what it was last told: merges replace
//! records by id and never drop the rest, so a failed refresh leaves the
//! previous snapshot fully intact.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use tx_core::{Job, JobId, PipelineStats};

/// Shared cache of job records keyed by id.
#[derive(Clone, Default)]
pub struct JobCache {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert one record.
    pub fn apply(&self, job: Job) {
        self.jobs.lock().insert(job.id.clone(), job);
    }

    /// Merge a fetched batch: replace each record by id, leave records
    /// absent from the batch untouched. Idempotent.
    pub fn merge(&self, fetched: Vec<Job>) {
        let mut jobs = self.jobs.lock();
        for job in fetched {
            jobs.insert(job.id.clone(), job);
        }
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.lock().get(id).cloned()
    }

    /// Snapshot of all cached jobs, newest first.
    pub fn snapshot(&self) -> Vec<Job> {
        let jobs = self.jobs.lock();
        let mut out: Vec<Job> = jobs.values().cloned().collect();
        out.sort_by(|a, b| {
            b.created_at_ms.cmp(&a.created_at_ms).then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        out
    }

    /// Pipeline stats over the cached snapshot.
    pub fn stats(&self) -> PipelineStats {
        PipelineStats::compute(self.jobs.lock().values())
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
