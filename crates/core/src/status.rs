// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle state machine.
//!
//! Single source of truth for which `(from, to)` status pairs are legal,
//! independent of who performs them. Every mutation path in the daemon
//! routes through [`validate_transition`] before anything is written.
//!
//! ```text
//! pending    -> assigned, cancelled
//! assigned   -> running, failed, cancelled
//! running    -> streaming, complete, failed
//! streaming  -> complete, failed
//! complete | failed | cancelled -> (terminal)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, waiting for a worker to claim it
    Pending,
    /// Claimed by exactly one worker
    Assigned,
    /// Worker is preparing/submitting the request
    Running,
    /// Tokens are flowing from the inference backend
    Streaming,
    /// Finished successfully (terminal)
    Complete,
    /// Finished with an error (terminal)
    Failed,
    /// Withdrawn by the requester before assignment (terminal)
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Assigned => "assigned",
        Running => "running",
        Streaming => "streaming",
        Complete => "complete",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl JobStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Pending,
        JobStatus::Assigned,
        JobStatus::Running,
        JobStatus::Streaming,
        JobStatus::Complete,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ];

    /// Parse the snake_case form used on the wire and in query strings.
    pub fn parse(s: &str) -> Option<JobStatus> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "assigned" => Some(JobStatus::Assigned),
            "running" => Some(JobStatus::Running),
            "streaming" => Some(JobStatus::Streaming),
            "complete" => Some(JobStatus::Complete),
            "failed" => Some(JobStatus::Failed),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }

    /// Derived reporting phase for this status.
    pub fn phase(&self) -> Phase {
        match self {
            JobStatus::Pending => Phase::Queued,
            JobStatus::Assigned | JobStatus::Running | JobStatus::Streaming => Phase::Processing,
            JobStatus::Complete | JobStatus::Failed | JobStatus::Cancelled => Phase::Terminal,
        }
    }

    /// True for statuses that admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed | JobStatus::Cancelled)
    }
}

/// Derived grouping over [`JobStatus`] used for reporting; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Queued,
    Processing,
    Terminal,
}

crate::simple_display! {
    Phase {
        Queued => "queued",
        Processing => "processing",
        Terminal => "terminal",
    }
}

/// Rejection of an illegal status transition.
///
/// Carries the exact pair so callers can surface it verbatim; the message
/// suggests the legal next states when any exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job is {status} (terminal); no further transitions are possible")]
    Terminal { status: JobStatus },

    #[error("cannot move {from} -> {to}; valid from {from}: {}", render_targets(.from))]
    Illegal { from: JobStatus, to: JobStatus },
}

fn render_targets(from: &JobStatus) -> String {
    let targets = valid_transitions_from(*from);
    if targets.is_empty() {
        "none".to_string()
    } else {
        targets.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
    }
}

/// Legal outgoing transitions for a status. Empty for terminal statuses.
pub fn valid_transitions_from(status: JobStatus) -> &'static [JobStatus] {
    match status {
        JobStatus::Pending => &[JobStatus::Assigned, JobStatus::Cancelled],
        JobStatus::Assigned => &[JobStatus::Running, JobStatus::Failed, JobStatus::Cancelled],
        JobStatus::Running => &[JobStatus::Streaming, JobStatus::Complete, JobStatus::Failed],
        JobStatus::Streaming => &[JobStatus::Complete, JobStatus::Failed],
        JobStatus::Complete | JobStatus::Failed | JobStatus::Cancelled => &[],
    }
}

/// Validate a `(from, to)` pair against the transition table.
///
/// Pure and side-effect free; never panics. Repeating a terminal status
/// is a rejection, not a no-op success — callers that want idempotency
/// must check the current status first.
pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal { status: from });
    }
    if valid_transitions_from(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal { from, to })
    }
}

/// True for statuses that admit no further transitions.
pub fn is_terminal(status: JobStatus) -> bool {
    status.is_terminal()
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
