// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Job entity: a unit of requested inference work tracked through a
//! fixed lifecycle.

use crate::clock::Clock;
use crate::id::JobId;
use crate::requester::RequesterId;
use crate::status::{JobStatus, Phase};
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

/// Configuration for creating a new job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub id: JobId,
    pub requester: RequesterId,
    pub model: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub input_tokens: u64,
    pub estimated_cost: u64,
}

impl JobConfig {
    pub fn builder(
        id: impl Into<JobId>,
        requester: impl Into<RequesterId>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> JobConfigBuilder {
        JobConfigBuilder {
            id: id.into(),
            requester: requester.into(),
            model: model.into(),
            prompt: prompt.into(),
            system_prompt: None,
            input_tokens: 0,
            estimated_cost: 0,
        }
    }
}

pub struct JobConfigBuilder {
    id: JobId,
    requester: RequesterId,
    model: String,
    prompt: String,
    system_prompt: Option<String>,
    input_tokens: u64,
    estimated_cost: u64,
}

impl JobConfigBuilder {
    crate::setters! {
        set {
            input_tokens: u64,
            estimated_cost: u64,
        }
        option {
            system_prompt: String,
        }
    }

    pub fn build(self) -> JobConfig {
        JobConfig {
            id: self.id,
            requester: self.requester,
            model: self.model,
            prompt: self.prompt,
            system_prompt: self.system_prompt,
            input_tokens: self.input_tokens,
            estimated_cost: self.estimated_cost,
        }
    }
}

/// A tracked inference job.
///
/// Created pending by a requester; mutated only through validated
/// transitions committed by the daemon's coordinator. Terminal jobs are
/// immutable history — never deleted, never resurrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Creator of the job; immutable after creation.
    pub requester: RequesterId,
    /// Set exactly once, by a successful claim. Never reassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_worker: Option<WorkerId>,
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub created_at_ms: u64,
    /// Set when the job is claimed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    /// Set when the job enters any terminal status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    /// Accumulated generation text.
    #[serde(default)]
    pub output: String,
    /// Opaque cost estimate supplied at creation (micro-credits).
    #[serde(default)]
    pub estimated_cost: u64,
    /// Final cost, supplied on completion (micro-credits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Create a new pending job.
    pub fn new(config: JobConfig, clock: &impl Clock) -> Self {
        Self::new_with_epoch_ms(config, clock.epoch_ms())
    }

    /// Create a new pending job with an explicit creation timestamp.
    pub fn new_with_epoch_ms(config: JobConfig, epoch_ms: u64) -> Self {
        Self {
            id: config.id,
            status: JobStatus::Pending,
            requester: config.requester,
            assigned_worker: None,
            model: config.model,
            prompt: config.prompt,
            system_prompt: config.system_prompt,
            created_at_ms: epoch_ms,
            started_at_ms: None,
            completed_at_ms: None,
            input_tokens: config.input_tokens,
            output_tokens: 0,
            output: String::new(),
            estimated_cost: config.estimated_cost,
            actual_cost: None,
            error: None,
        }
    }

    /// Derived reporting phase.
    pub fn phase(&self) -> Phase {
        self.status.phase()
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True when `worker` is the worker this job was claimed by.
    pub fn is_assigned_to(&self, worker: &WorkerId) -> bool {
        self.assigned_worker.as_ref() == Some(worker)
    }

    /// Wall-clock processing duration, for completed jobs with both
    /// timestamps recorded.
    pub fn processing_duration_ms(&self) -> Option<u64> {
        match (self.started_at_ms, self.completed_at_ms) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: JobId = "job-test-1",
            requester: RequesterId = "req-1",
            model: String = "tx-7b",
            prompt: String = "say hello",
            output: String = "",
        }
        set {
            status: JobStatus = JobStatus::Pending,
            created_at_ms: u64 = 1_000_000,
            input_tokens: u64 = 0,
            output_tokens: u64 = 0,
            estimated_cost: u64 = 100,
        }
        option {
            assigned_worker: WorkerId = None,
            system_prompt: String = None,
            started_at_ms: u64 = None,
            completed_at_ms: u64 = None,
            actual_cost: u64 = None,
            error: String = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
