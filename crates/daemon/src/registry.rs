// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registry.
//!
//! External collaborator of the job lifecycle: the claim coordinator only
//! needs a worker identifier to exist here. Workers register by address
//! and keep their record current with partial updates.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use tx_core::{Clock, WorkerId};

/// Availability of a registered worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Available,
    Busy,
    Offline,
}

tx_core::simple_display! {
    WorkerStatus {
        Available => "available",
        Busy => "busy",
        Offline => "offline",
    }
}

impl WorkerStatus {
    pub fn parse(s: &str) -> Option<WorkerStatus> {
        match s {
            "available" => Some(WorkerStatus::Available),
            "busy" => Some(WorkerStatus::Busy),
            "offline" => Some(WorkerStatus::Offline),
            _ => None,
        }
    }
}

/// A registered worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Network address; doubles as the worker's identifier.
    pub address: WorkerId,
    pub name: String,
    pub status: WorkerStatus,
    /// Models this worker advertises.
    #[serde(default)]
    pub models: Vec<String>,
    pub registered_at_ms: u64,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorker {
    pub address: WorkerId,
    pub name: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// Partial update applied to an existing record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("worker {0} is not registered")]
    NotFound(WorkerId),
}

/// Shared registry of workers, keyed by address.
#[derive(Clone, Default)]
pub struct WorkerRegistry {
    workers: Arc<Mutex<HashMap<WorkerId, WorkerRecord>>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or re-register a worker. Re-registration preserves the
    /// original registration timestamp and resets status to available.
    pub fn register(&self, req: RegisterWorker, clock: &impl Clock) -> WorkerRecord {
        let mut workers = self.workers.lock();
        let registered_at_ms = workers
            .get(&req.address)
            .map(|w| w.registered_at_ms)
            .unwrap_or_else(|| clock.epoch_ms());
        let record = WorkerRecord {
            address: req.address.clone(),
            name: req.name,
            status: WorkerStatus::Available,
            models: req.models,
            registered_at_ms,
        };
        workers.insert(req.address, record.clone());
        record
    }

    pub fn get(&self, address: &WorkerId) -> Option<WorkerRecord> {
        self.workers.lock().get(address).cloned()
    }

    pub fn contains(&self, address: &WorkerId) -> bool {
        self.workers.lock().contains_key(address)
    }

    /// Workers, optionally narrowed to one status, ordered by address.
    pub fn list(&self, status: Option<WorkerStatus>) -> Vec<WorkerRecord> {
        let workers = self.workers.lock();
        let mut out: Vec<WorkerRecord> = workers
            .values()
            .filter(|w| status.is_none_or(|s| w.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.address.as_str().cmp(b.address.as_str()));
        out
    }

    /// Apply a partial update to the record at `address`.
    pub fn update(&self, address: &WorkerId, patch: WorkerPatch) -> Result<WorkerRecord, RegistryError> {
        let mut workers = self.workers.lock();
        let record = workers
            .get_mut(address)
            .ok_or_else(|| RegistryError::NotFound(address.clone()))?;
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(models) = patch.models {
            record.models = models;
        }
        Ok(record.clone())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
