// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier newtype.
//!
//! Job IDs are opaque strings. The daemon never parses them; requesters
//! may supply their own, and the daemon mints one via [`JobId::generate`]
//! (a `job-` prefixed nanoid that fits `SmolStr`'s inline capacity) when a
//! create request omits the field.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a job, assigned at creation and immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub SmolStr);

impl JobId {
    pub const PREFIX: &'static str = "job-";

    /// Create an ID from an existing string (for parsing/deserialization).
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random ID: `job-` + 19 nanoid characters (23 total,
    /// exactly SmolStr's inline capacity).
    pub fn generate() -> Self {
        Self(SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID is an empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
