//! HTTP infrastructure error types
//!
//! Failures while setting up the HTTP layer. Failures of individual requests
//! are reported as [`core_kernel::PortError`] by the adapters.

use thiserror::Error;

/// Errors that can occur while constructing clients and adapters
#[derive(Debug, Error)]
pub enum HttpError {
    /// The underlying reqwest client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    /// A configured default header is not a valid HTTP header
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    /// A configured base URL is not usable
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl HttpError {
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        HttpError::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
