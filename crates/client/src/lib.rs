// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tx-client: requester- and worker-side sync layer.
//!
//! Talks to a `txd` daemon over its REST surface. Keeps a local job cache
//! that polling refreshes and optimistic writes update immediately; the
//! daemon stays authoritative and every merge converges the cache toward
//! its state.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cache;
pub mod remote;
pub mod sync;
pub mod worker_loop;

#[cfg(test)]
pub(crate) mod testutil;

pub use cache::JobCache;
pub use remote::{HttpRemote, RemoteError, RemoteStore};
pub use sync::{SyncClient, SyncConfig, SyncHandle};
pub use worker_loop::claim_next;
