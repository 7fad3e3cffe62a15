//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim deadline reconciler test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pinned instants and claim identifiers
//! - `builders`: Builder patterns for claims and scripted mock backends
//! - `fake_backend`: In-process HTTP server emulating the claims and support APIs
//! - `assertions`: Custom assertion helpers for outcomes and recorded calls
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod fake_backend;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use fake_backend::*;
pub use assertions::*;
pub use generators::*;
