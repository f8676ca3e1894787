// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inference stream driver.
//!
//! Drives one claimed job through `running → streaming → terminal`
//! against an [`InferenceBackend`]. Whatever happens — backend refusal,
//! a dropped stream, cancellation — the job always ends in a terminal
//! status; `fail_if_active` makes the abort paths idempotent.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::coordinator::{ClaimError, Coordinator};
use tx_core::{Clock, Job, JobId, WorkerId};

/// Flat rate card in micro-credits per token.
// TODO: per-model pricing once workers advertise a rate card at registration.
pub const MICRO_PER_INPUT_TOKEN: u64 = 2;
pub const MICRO_PER_OUTPUT_TOKEN: u64 = 6;

/// What the backend needs to start generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub model: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub input_tokens: u64,
}

impl InferenceRequest {
    pub fn for_job(job: &Job) -> Self {
        Self {
            model: job.model.clone(),
            prompt: job.prompt.clone(),
            system_prompt: job.system_prompt.clone(),
            input_tokens: job.input_tokens,
        }
    }
}

/// One streamed generation event. Each non-empty `response_chunk` is one
/// generated token; `done` marks the final event and may carry trailing
/// text.
#[derive(Debug, Clone, Default)]
pub struct TokenChunk {
    pub response_chunk: String,
    pub done: bool,
}

impl TokenChunk {
    pub fn text(chunk: impl Into<String>) -> Self {
        Self { response_chunk: chunk.into(), done: false }
    }

    pub fn done() -> Self {
        Self { response_chunk: String::new(), done: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend looked at the request and said no.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// Could not reach the backend at all.
    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

/// Seam between the lifecycle machinery and whatever actually runs the
/// model. Implementations emit [`TokenChunk`]s over the returned channel
/// and close it after the `done` event.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<mpsc::Receiver<TokenChunk>, BackendError>;
}

/// Drive an already-claimed job to a terminal status.
///
/// Returns the terminal job record. `Err` means a coordination conflict
/// (wrong worker, job mutated underneath us), not a backend problem —
/// backend failures resolve the job to `failed` and return `Ok`.
pub async fn run_job<C: Clock, B: InferenceBackend + ?Sized>(
    coordinator: &Coordinator<C>,
    backend: &B,
    id: &JobId,
    worker: &WorkerId,
    cancel: CancellationToken,
) -> Result<Job, ClaimError> {
    let job = coordinator.start_processing(id, worker)?;
    let request = InferenceRequest::for_job(&job);

    let mut rx = tokio::select! {
        _ = cancel.cancelled() => {
            return coordinator.fail_if_active(id, "cancelled mid-stream");
        }
        opened = backend.generate(request) => match opened {
            Ok(rx) => rx,
            Err(err) => {
                warn!(job = %id, error = %err, "backend refused job");
                return coordinator.fail_if_active(id, err.to_string());
            }
        },
    };

    let mut job = coordinator.start_streaming(id, worker)?;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(job = %id, "stream cancelled");
                return coordinator.fail_if_active(id, "cancelled mid-stream");
            }
            chunk = rx.recv() => match chunk {
                Some(chunk) => {
                    if !chunk.response_chunk.is_empty() {
                        job = match coordinator.append_output(id, worker, &chunk.response_chunk, 1) {
                            Ok(job) => job,
                            // The job was resolved underneath us (e.g. an
                            // operator fail). Stop streaming and surface it.
                            Err(err) => {
                                coordinator.fail_if_active(id, "stream interrupted")?;
                                return Err(err);
                            }
                        };
                    }
                    if chunk.done {
                        let cost = job.input_tokens * MICRO_PER_INPUT_TOKEN
                            + job.output_tokens * MICRO_PER_OUTPUT_TOKEN;
                        let output = job.output.clone();
                        return coordinator.complete(id, worker, output, cost);
                    }
                }
                // Channel closed without a done event.
                None => {
                    warn!(job = %id, "stream ended without completion");
                    return coordinator.fail_if_active(id, "stream ended unexpectedly");
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
