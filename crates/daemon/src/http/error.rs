// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::coordinator::ClaimError;
use crate::registry::RegistryError;

/// Wire-facing error: the coordinator/registry taxonomy plus request
/// decoding problems, each mapped to a status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Claim(err) => match err {
                ClaimError::JobNotFound(_) | ClaimError::WorkerNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                // Distinct from 400 so workers can move on to the next job.
                ClaimError::AlreadyClaimed(_) | ClaimError::Duplicate(_) => StatusCode::CONFLICT,
                ClaimError::InvalidState { .. }
                | ClaimError::NotAssignee { .. }
                | ClaimError::NotRequester { .. }
                | ClaimError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::Registry(RegistryError::NotFound(_)) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
