// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tx-daemon: authoritative side of the Tensor Exchange marketplace.
//!
//! Owns the single shared job record store, the claim coordinator, the
//! worker registry, the inference stream driver, and the HTTP listener.
//! Clients (`tx-client`) talk to this over the REST surface in [`http`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod coordinator;
pub mod env;
pub mod http;
pub mod registry;
pub mod store;
pub mod stream;

pub use coordinator::{ClaimError, Coordinator};
pub use http::{ApiError, AppCtx, CreateJob, JobUpdate};
pub use registry::{RegisterWorker, RegistryError, WorkerPatch, WorkerRecord, WorkerRegistry, WorkerStatus};
pub use store::{JobFilter, JobStore};
pub use stream::{run_job, BackendError, InferenceBackend, InferenceRequest, TokenChunk};
