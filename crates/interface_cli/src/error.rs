//! CLI error types

use std::path::PathBuf;
use thiserror::Error;

use core_kernel::CoreError;
use infra_http::HttpError;

/// Failures that stop the CLI before or after a batch
///
/// Per-claim failures never show up here; they become verdicts.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("{path}:{line}: {source}")]
    InvalidClaimId {
        path: PathBuf,
        line: usize,
        #[source]
        source: CoreError,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No claim IDs supplied")]
    NoClaimIds,

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Failed to write report: {0}")]
    Report(#[source] std::io::Error),
}

impl CliError {
    pub fn invalid_setting(message: impl Into<String>) -> Self {
        CliError::InvalidSetting(message.into())
    }
}
