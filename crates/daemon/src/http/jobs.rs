// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::{ApiError, AppCtx};
use crate::store::JobFilter;
use tx_core::{Clock, Job, JobConfig, JobId, JobStatus, RequesterId, WorkerId};

/// Body of `POST /jobs`. Requesters that want idempotent retries supply
/// their own id; when the field is absent the daemon mints one. A present
/// but blank id is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    #[serde(default)]
    pub id: Option<String>,
    pub requester: RequesterId,
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub estimated_cost: u64,
}

impl CreateJob {
    fn into_config(self) -> Result<JobConfig, ApiError> {
        let id = match self.id.as_deref() {
            None => JobId::generate(),
            Some(id) if !id.trim().is_empty() => JobId::new(id),
            Some(_) => return Err(ApiError::bad_request("job id must not be blank")),
        };
        let mut builder = JobConfig::builder(id, self.requester, self.model, self.prompt)
            .input_tokens(self.input_tokens)
            .estimated_cost(self.estimated_cost);
        if let Some(system_prompt) = self.system_prompt {
            builder = builder.system_prompt(system_prompt);
        }
        Ok(builder.build())
    }
}

/// Body of `PATCH /jobs/{id}`: one explicit lifecycle operation, not a
/// field merge. Illegal pairs come back 400 with the rejected pair named.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JobUpdate {
    Claim { worker: WorkerId },
    StartProcessing { worker: WorkerId },
    StartStreaming { worker: WorkerId },
    AppendOutput { worker: WorkerId, chunk: String, #[serde(default)] tokens: u64 },
    Complete { worker: WorkerId, output: String, actual_cost: u64 },
    /// `worker` is optional: when present it must hold the claim; absent
    /// means an operator-initiated failure.
    Fail {
        #[serde(default)]
        worker: Option<WorkerId>,
        error: String,
    },
    Cancel { requester: RequesterId },
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub requester: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> Result<JobFilter, ApiError> {
        let status = match self.status.as_deref() {
            Some(s) => Some(
                JobStatus::parse(s)
                    .ok_or_else(|| ApiError::bad_request(format!("unknown status {s:?}")))?,
            ),
            None => None,
        };
        Ok(JobFilter { status, requester: self.requester.map(RequesterId::new) })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelParams {
    pub requester: Option<String>,
}

pub async fn create<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Json(body): Json<CreateJob>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let job = ctx.coordinator.create(body.into_config()?)?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn list<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(ctx.coordinator.store().list(&filter)))
}

pub async fn fetch<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let id = JobId::new(id);
    let job = ctx
        .coordinator
        .store()
        .get(&id)
        .ok_or(crate::coordinator::ClaimError::JobNotFound(id))?;
    Ok(Json(job))
}

pub async fn update<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Path(id): Path<String>,
    Json(op): Json<JobUpdate>,
) -> Result<Json<Job>, ApiError> {
    let id = JobId::new(id);
    let coordinator = &ctx.coordinator;
    let job = match op {
        JobUpdate::Claim { worker } => coordinator.claim(&id, &worker)?,
        JobUpdate::StartProcessing { worker } => coordinator.start_processing(&id, &worker)?,
        JobUpdate::StartStreaming { worker } => coordinator.start_streaming(&id, &worker)?,
        JobUpdate::AppendOutput { worker, chunk, tokens } => {
            coordinator.append_output(&id, &worker, &chunk, tokens)?
        }
        JobUpdate::Complete { worker, output, actual_cost } => {
            coordinator.complete(&id, &worker, output, actual_cost)?
        }
        JobUpdate::Fail { worker, error } => coordinator.fail(&id, worker.as_ref(), error)?,
        JobUpdate::Cancel { requester } => coordinator.cancel(&id, &requester)?,
    };
    Ok(Json(job))
}

pub async fn cancel<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Path(id): Path<String>,
    Query(params): Query<CancelParams>,
) -> Result<Json<Job>, ApiError> {
    let requester = params
        .requester
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("requester query parameter is required"))?;
    let job = ctx.coordinator.cancel(&JobId::new(id), &RequesterId::new(requester))?;
    Ok(Json(job))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
