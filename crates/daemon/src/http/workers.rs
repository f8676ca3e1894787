// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::http::{ApiError, AppCtx};
use crate::registry::{RegisterWorker, WorkerPatch, WorkerRecord, WorkerStatus};
use tx_core::{Clock, WorkerId};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

pub async fn register<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Json(body): Json<RegisterWorker>,
) -> Result<(StatusCode, Json<WorkerRecord>), ApiError> {
    if body.address.as_str().trim().is_empty() {
        return Err(ApiError::bad_request("worker address is required"));
    }
    let record = ctx.coordinator.registry().register(body, ctx.coordinator.clock());
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WorkerRecord>>, ApiError> {
    let status = match params.status.as_deref() {
        Some(s) => Some(
            WorkerStatus::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("unknown worker status {s:?}")))?,
        ),
        None => None,
    };
    Ok(Json(ctx.coordinator.registry().list(status)))
}

pub async fn update<C: Clock>(
    State(ctx): State<AppCtx<C>>,
    Path(address): Path<String>,
    Json(patch): Json<WorkerPatch>,
) -> Result<Json<WorkerRecord>, ApiError> {
    let record = ctx.coordinator.registry().update(&WorkerId::new(address), patch)?;
    Ok(Json(record))
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
