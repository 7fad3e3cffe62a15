//! Claim-processing generations
//!
//! Claims live in one of two processing stacks. The current stack exposes a
//! per-claim state resource; a claim the current stack does not know belongs
//! to the legacy stack.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReconcileError;

/// Processing generation of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// Remediated through the batched reprocess endpoint
    Legacy,
    /// Remediated through the per-claim process endpoint
    Current,
}

impl Generation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::Legacy => "legacy",
            Generation::Current => "current",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when the generation probe fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorPolicy {
    /// Abort the claim; remediation is never attempted blind
    #[default]
    Abort,
    /// Fall back to the current generation
    #[serde(alias = "assume-current")]
    AssumeCurrent,
}

impl ProbeErrorPolicy {
    /// Resolves a failed probe into a generation, or the error that aborts the claim
    pub fn resolve(self, error: ReconcileError) -> Result<Generation, ReconcileError> {
        match self {
            ProbeErrorPolicy::Abort => Err(error),
            ProbeErrorPolicy::AssumeCurrent => Ok(Generation::Current),
        }
    }
}

impl FromStr for ProbeErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(ProbeErrorPolicy::Abort),
            "assume_current" | "assume-current" => Ok(ProbeErrorPolicy::AssumeCurrent),
            other => Err(format!(
                "unknown probe error policy '{}', expected 'abort' or 'assume-current'",
                other
            )),
        }
    }
}
