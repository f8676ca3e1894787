// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! txd: the Tensor Exchange daemon.

use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tx_daemon::http::{router, AppCtx};
use tx_daemon::env;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env::log_filter()))
        .init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "daemon exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> std::io::Result<()> {
    let addr = env::bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(version = env::VERSION, %addr, "txd listening");
    axum::serve(listener, router(AppCtx::new())).await
}
