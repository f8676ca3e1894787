// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level specs: whole-stack scenarios exercised across the
//! core state machine, the daemon coordinator, the REST surface, and
//! the client sync layer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]


mod claim;
mod lifecycle;
mod stream;
mod sync;
