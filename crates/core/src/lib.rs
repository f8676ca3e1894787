// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tx-core: Domain library for the Tensor Exchange (tx) marketplace.
//!
//! Pure types and functions only: the job lifecycle state machine,
//! role projections, pairing derivation, and statistics. Anything that
//! needs a store, a socket, or a runtime lives in `tx-daemon` or
//! `tx-client`.

pub mod macros;

pub mod clock;
pub mod id;
pub mod job;
pub mod pairing;
pub mod requester;
pub mod stats;
pub mod status;
pub mod views;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::JobId;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobBuilder;
pub use job::{Job, JobConfig, JobConfigBuilder};
pub use pairing::{active_pairings, JobPairing};
pub use requester::RequesterId;
pub use stats::PipelineStats;
pub use status::{
    is_terminal, valid_transitions_from, validate_transition, JobStatus, Phase, TransitionError,
};
pub use views::{RequesterJobView, WorkerJobView};
pub use worker::WorkerId;
