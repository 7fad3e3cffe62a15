//! Strongly-typed identifiers
//!
//! Claims are addressed by the numeric identifier the claims system assigns,
//! while a reconciliation run gets its own time-ordered UUID so log lines of
//! one run can be correlated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Identifier of a dispute claim in the claims system
///
/// Always positive. Displays as the bare number so report lines read
/// `42 -> CONSISTENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ClaimId(u64);

impl ClaimId {
    /// Creates a claim identifier, rejecting zero
    pub fn new(value: u64) -> Result<Self, CoreError> {
        if value == 0 {
            return Err(CoreError::InvalidIdentifier(
                "claim id must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed.parse::<u64>().map_err(|_| {
            CoreError::InvalidIdentifier(format!(
                "claim id must be a positive integer, got '{}'",
                trimmed
            ))
        })?;
        Self::new(value)
    }
}

impl TryFrom<u64> for ClaimId {
    type Error = CoreError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClaimId> for u64 {
    fn from(id: ClaimId) -> u64 {
        id.0
    }
}

/// Identifier of one reconciliation run over a list of claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new time-ordered identifier (v7)
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the identifier prefix for display
    pub fn prefix() -> &'static str {
        "RUN"
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new_v7()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::prefix(), self.0)
    }
}

impl FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Strip prefix if present
        let uuid_str = s.strip_prefix("RUN-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(uuid_str)?))
    }
}
