//! Reconciliation errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can end the reconciliation of a single claim
///
/// None of these ever escape the claim boundary: the orchestrator turns each
/// into that claim's verdict.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A collaborator could not be reached, timed out, or refused the call
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but violated the expected contract
    #[error("decode error: {0}")]
    Decode(String),

    /// More than one support case matched the claim
    #[error("expected exactly one support case, found {count}")]
    Cardinality { count: usize },

    /// The support case status is outside the known set
    #[error("support case status '{status}' is not handled")]
    DomainGap { status: String },
}

impl ReconcileError {
    pub fn transport(message: impl Into<String>) -> Self {
        ReconcileError::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ReconcileError::Decode(message.into())
    }
}

impl From<PortError> for ReconcileError {
    fn from(err: PortError) -> Self {
        if err.is_decode() {
            ReconcileError::Decode(err.to_string())
        } else {
            ReconcileError::Transport(err.to_string())
        }
    }
}
