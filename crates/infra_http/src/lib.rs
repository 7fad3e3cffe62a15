//! HTTP Infrastructure Layer
//!
//! This crate provides the REST adapters the reconciler uses in production,
//! implementing the `domain_claims` port traits on top of `reqwest`.
//!
//! # Architecture
//!
//! - [`ClaimsApiAdapter`] talks to the claims system: claim lookup, the
//!   generation probe and both remediation endpoints.
//! - [`SupportCaseApiAdapter`] talks to the support system's case search.
//!
//! Both share one [`HttpClient`], so the connection pool is shared across
//! concurrently reconciled claims.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{HttpClient, HttpClientConfig, ClaimsApiAdapter, SupportCaseApiAdapter};
//!
//! let http = HttpClient::new(&HttpClientConfig::default())?;
//! let claims = Arc::new(ClaimsApiAdapter::new(http.clone(), claims_config)?);
//! let cases = Arc::new(SupportCaseApiAdapter::new(http, cases_config)?);
//! ```

pub mod config;
pub mod error;
pub mod client;
pub mod dto;
pub mod adapters;

pub use config::HttpClientConfig;
pub use error::HttpError;
pub use client::{HttpClient, RestEndpoint};
pub use adapters::{backends, ClaimsApiAdapter, SupportCaseApiAdapter};
