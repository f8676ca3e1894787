// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote daemon access.
//!
//! [`RemoteStore`] is the seam the sync layer and worker loop are written
//! against; [`HttpRemote`] is the production implementation over the
//! daemon's REST surface.

use async_trait::async_trait;
use thiserror::Error;

use tx_core::{Job, JobId, JobPairing, JobStatus, PipelineStats, RequesterId};
use tx_daemon::http::{CreateJob, JobUpdate};
use tx_daemon::registry::{RegisterWorker, WorkerRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The daemon answered with a non-success status.
    #[error("daemon rejected request ({status}): {message}")]
    Status { status: u16, message: String },

    /// Could not reach the daemon at all.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl RemoteError {
    /// True for a lost claim race (daemon 409).
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Status { status: 409, .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Client-side view of the daemon's REST surface.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn create_job(&self, req: CreateJob) -> Result<Job, RemoteError>;

    async fn fetch_jobs(
        &self,
        status: Option<JobStatus>,
        requester: Option<&RequesterId>,
    ) -> Result<Vec<Job>, RemoteError>;

    async fn fetch_job(&self, id: &JobId) -> Result<Job, RemoteError>;

    async fn update_job(&self, id: &JobId, op: JobUpdate) -> Result<Job, RemoteError>;

    async fn cancel_job(&self, id: &JobId, requester: &RequesterId) -> Result<Job, RemoteError>;

    async fn register_worker(&self, req: RegisterWorker) -> Result<WorkerRecord, RemoteError>;

    async fn pairings(&self) -> Result<Vec<JobPairing>, RemoteError>;

    async fn stats(&self) -> Result<PipelineStats, RemoteError>;
}

/// [`RemoteStore`] over HTTP.
#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:7171`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client: reqwest::Client::new() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unrecognized error body")
                .to_string(),
            Err(_) => "unrecognized error body".to_string(),
        };
        Err(RemoteError::Status { status: status.as_u16(), message })
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn create_job(&self, req: CreateJob) -> Result<Job, RemoteError> {
        let response = self.client.post(self.url("/jobs")).json(&req).send().await?;
        Self::decode(response).await
    }

    async fn fetch_jobs(
        &self,
        status: Option<JobStatus>,
        requester: Option<&RequesterId>,
    ) -> Result<Vec<Job>, RemoteError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        if let Some(requester) = requester {
            query.push(("requester", requester.as_str().to_string()));
        }
        let response = self.client.get(self.url("/jobs")).query(&query).send().await?;
        Self::decode(response).await
    }

    async fn fetch_job(&self, id: &JobId) -> Result<Job, RemoteError> {
        let response = self.client.get(self.url(&format!("/jobs/{id}"))).send().await?;
        Self::decode(response).await
    }

    async fn update_job(&self, id: &JobId, op: JobUpdate) -> Result<Job, RemoteError> {
        let response =
            self.client.patch(self.url(&format!("/jobs/{id}"))).json(&op).send().await?;
        Self::decode(response).await
    }

    async fn cancel_job(&self, id: &JobId, requester: &RequesterId) -> Result<Job, RemoteError> {
        let response = self
            .client
            .delete(self.url(&format!("/jobs/{id}")))
            .query(&[("requester", requester.as_str())])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn register_worker(&self, req: RegisterWorker) -> Result<WorkerRecord, RemoteError> {
        let response = self.client.post(self.url("/workers")).json(&req).send().await?;
        Self::decode(response).await
    }

    async fn pairings(&self) -> Result<Vec<JobPairing>, RemoteError> {
        let response = self.client.get(self.url("/pairings")).send().await?;
        Self::decode(response).await
    }

    async fn stats(&self) -> Result<PipelineStats, RemoteError> {
        let response = self.client.get(self.url("/stats")).send().await?;
        Self::decode(response).await
    }
}
