// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only projections over the whole store.

use axum::extract::State;
use axum::Json;

use crate::http::AppCtx;
use tx_core::{Clock, JobPairing, PipelineStats};

pub async fn pairings<C: Clock>(State(ctx): State<AppCtx<C>>) -> Json<Vec<JobPairing>> {
    Json(ctx.coordinator.store().active_pairings())
}

pub async fn stats<C: Clock>(State(ctx): State<AppCtx<C>>) -> Json<PipelineStats> {
    Json(ctx.coordinator.store().stats())
}
