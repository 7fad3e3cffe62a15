//! Core Kernel - Foundational types for the claim deadline reconciler
//!
//! This crate provides the building blocks shared by every other crate:
//! - Claim and run identifiers
//! - Port error type and adapter configuration
//! - Injectable clocks for deadline evaluation

pub mod identifiers;
pub mod ports;
pub mod temporal;
pub mod error;

pub use identifiers::{ClaimId, RunId};
pub use ports::{PortError, DomainPort, ExternalSystemConfig};
pub use temporal::{Clock, SystemClock, FixedClock};
pub use error::CoreError;
