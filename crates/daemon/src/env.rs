// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

/// Daemon version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7171";

/// Listen address: `TX_BIND_ADDR`, default `127.0.0.1:7171`.
pub fn bind_addr() -> String {
    std::env::var("TX_BIND_ADDR")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

/// Log filter directive: `TX_LOG`, default `info`.
pub fn log_filter() -> String {
    std::env::var("TX_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
