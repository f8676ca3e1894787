// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline statistics: a single-pass reduction over a job set.

use crate::job::Job;
use crate::status::{JobStatus, Phase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate counts and totals over a collection of jobs.
///
/// Invariant: `queued + processing + terminal == total`, and the status
/// counts sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub total: usize,
    /// Count per status; statuses with zero jobs are omitted.
    pub by_status: HashMap<JobStatus, usize>,
    pub queued: usize,
    pub processing: usize,
    pub terminal: usize,
    /// Sum of `actual_cost` over complete jobs (micro-credits).
    pub total_actual_cost: u64,
    /// Mean `completed_at - started_at` over complete jobs; 0.0 when none.
    pub avg_processing_ms: f64,
}

impl PipelineStats {
    /// Single O(n) pass; the input is not mutated.
    pub fn compute<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> PipelineStats {
        let mut stats = PipelineStats::default();
        let mut duration_sum: u64 = 0;
        let mut duration_count: usize = 0;

        for job in jobs {
            stats.total += 1;
            *stats.by_status.entry(job.status).or_insert(0) += 1;
            match job.phase() {
                Phase::Queued => stats.queued += 1,
                Phase::Processing => stats.processing += 1,
                Phase::Terminal => stats.terminal += 1,
            }
            if job.status == JobStatus::Complete {
                stats.total_actual_cost += job.actual_cost.unwrap_or(0);
                if let Some(ms) = job.processing_duration_ms() {
                    duration_sum += ms;
                    duration_count += 1;
                }
            }
        }

        if duration_count > 0 {
            stats.avg_processing_ms = duration_sum as f64 / duration_count as f64;
        }
        stats
    }

    /// Count for one status (0 when absent).
    pub fn count(&self, status: JobStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
