// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role-scoped job projections.
//!
//! Explicit typed view constructors, one per role. Pure functions of
//! `(job, caller context)` — no store, no mutation — so each field a role
//! may see is spelled out here and nowhere else.

use crate::id::JobId;
use crate::job::Job;
use crate::requester::RequesterId;
use crate::status::{JobStatus, Phase};
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

/// What the requester sees: the full job, plus derived fields. The
/// requester owns the job and is entitled to worker identity and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequesterJobView {
    pub id: JobId,
    pub requester: RequesterId,
    pub status: JobStatus,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_worker: Option<WorkerId>,
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub output: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub estimated_cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    /// True when the job is complete and the requester has not yet
    /// reviewed the result.
    pub can_review: bool,
}

impl RequesterJobView {
    pub fn project(job: &Job, has_review: bool) -> Self {
        Self {
            id: job.id.clone(),
            requester: job.requester.clone(),
            status: job.status,
            phase: job.phase(),
            assigned_worker: job.assigned_worker.clone(),
            model: job.model.clone(),
            prompt: job.prompt.clone(),
            system_prompt: job.system_prompt.clone(),
            output: job.output.clone(),
            input_tokens: job.input_tokens,
            output_tokens: job.output_tokens,
            estimated_cost: job.estimated_cost,
            actual_cost: job.actual_cost,
            error: job.error.clone(),
            created_at_ms: job.created_at_ms,
            started_at_ms: job.started_at_ms,
            completed_at_ms: job.completed_at_ms,
            can_review: job.status == JobStatus::Complete && !has_review,
        }
    }
}

/// What a worker sees. For a pending job the worker has not claimed,
/// only what it needs to decide whether to claim: prompt, model, budget.
/// Requester identity is surfaced only to the assigned worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerJobView {
    pub id: JobId,
    pub status: JobStatus,
    pub phase: Phase,
    /// True when the viewing worker holds the claim on this job.
    pub is_mine: bool,
    /// Only present when `is_mine`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<RequesterId>,
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub input_tokens: u64,
    pub estimated_cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at_ms: u64,
}

impl WorkerJobView {
    pub fn project(job: &Job, viewer: Option<&WorkerId>) -> Self {
        let is_mine = viewer.is_some_and(|w| job.is_assigned_to(w));
        Self {
            id: job.id.clone(),
            status: job.status,
            phase: job.phase(),
            is_mine,
            requester: is_mine.then(|| job.requester.clone()),
            model: job.model.clone(),
            prompt: job.prompt.clone(),
            system_prompt: job.system_prompt.clone(),
            input_tokens: job.input_tokens,
            estimated_cost: job.estimated_cost,
            error: job.error.clone(),
            created_at_ms: job.created_at_ms,
        }
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
