//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data. Every instant is derived from one pinned
//! evaluation time so deadline tests never depend on the wall clock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{ClaimId, FixedClock};
use std::sync::Arc;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant deadlines are evaluated against (Jun 1, 2024 12:00 UTC)
    pub fn evaluation_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// A clock frozen at the evaluation instant
    pub fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Self::evaluation_instant()))
    }

    /// A deadline that lapsed a day before evaluation
    pub fn lapsed_deadline() -> DateTime<Utc> {
        Self::evaluation_instant() - Duration::days(1)
    }

    /// A deadline a day after evaluation
    pub fn future_deadline() -> DateTime<Utc> {
        Self::evaluation_instant() + Duration::days(1)
    }
}

/// Fixture for claim identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a claim id, panicking on zero
    pub fn claim(value: u64) -> ClaimId {
        ClaimId::new(value).expect("fixture claim id must be positive")
    }

    /// The claim used by the reference remediation scenario
    pub fn scenario_claim() -> ClaimId {
        Self::claim(42)
    }

    /// A run of consecutive claim ids starting at `first`
    pub fn claims(first: u64, count: u64) -> Vec<ClaimId> {
        (first..first + count).map(Self::claim).collect()
    }
}
