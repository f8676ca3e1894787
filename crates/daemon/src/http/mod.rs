// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST surface over the coordinator.
//!
//! JSON in, JSON out. Route handlers stay thin: decode, call the
//! coordinator or registry, map the typed rejection onto a status code
//! via [`ApiError`].

use axum::routing::{get, patch, post};
use axum::Router;

use crate::coordinator::Coordinator;
use tx_core::{Clock, SystemClock};

pub mod error;
pub mod jobs;
pub mod query;
pub mod workers;

pub use error::ApiError;
pub use jobs::{CreateJob, JobUpdate};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppCtx<C: Clock = SystemClock> {
    pub coordinator: Coordinator<C>,
}

impl AppCtx<SystemClock> {
    pub fn new() -> Self {
        Self { coordinator: Coordinator::new(SystemClock) }
    }
}

impl Default for AppCtx<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> AppCtx<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { coordinator: Coordinator::new(clock) }
    }
}

pub fn router<C: Clock + 'static>(ctx: AppCtx<C>) -> Router {
    Router::new()
        .route("/jobs", post(jobs::create).get(jobs::list))
        .route("/jobs/{id}", get(jobs::fetch).patch(jobs::update).delete(jobs::cancel))
        .route("/workers", post(workers::register).get(workers::list))
        .route("/workers/{address}", patch(workers::update))
        .route("/pairings", get(query::pairings))
        .route("/stats", get(query::stats))
        .with_state(ctx)
}
