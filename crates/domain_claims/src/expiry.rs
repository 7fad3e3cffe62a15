//! Mediator deadline evaluation
//!
//! Pure functions over a claim snapshot and a single evaluation instant.
//! Every mediator player is inspected; a claim with several mediators is
//! overdue if any one of them has a lapsed mandatory action.

use chrono::{DateTime, Utc};

use crate::claim::{Action, Claim};

/// Returns true if any mediator has a mandatory action due before `now`
pub fn has_overdue_mediator_action(claim: &Claim, now: DateTime<Utc>) -> bool {
    claim
        .mediators()
        .any(|player| player.actions.iter().any(|a| a.is_overdue(now)))
}

/// Collects every overdue mandatory action across all mediators
pub fn overdue_mediator_actions(claim: &Claim, now: DateTime<Utc>) -> Vec<&Action> {
    claim
        .mediators()
        .flat_map(|player| player.actions.iter())
        .filter(|a| a.is_overdue(now))
        .collect()
}
