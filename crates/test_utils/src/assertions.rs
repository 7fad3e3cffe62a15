//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for reconciliation outcomes that
//! give more meaningful error messages than standard assertions.

use core_kernel::ClaimId;
use domain_claims::ports::mock::BackendCall;
use domain_claims::{BatchReport, ClaimOutcome, VerdictKind};

/// Asserts the verdict kind of an outcome
pub fn assert_verdict_kind(outcome: &ClaimOutcome, expected: VerdictKind) {
    assert_eq!(
        outcome.verdict.kind(),
        expected,
        "Claim {} reached {:?}, expected {}",
        outcome.claim_id,
        outcome.verdict,
        expected
    );
}

/// Asserts that no remediation endpoint was called
pub fn assert_no_remediation_calls(calls: &[BackendCall]) {
    let remediations: Vec<_> = calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                BackendCall::LegacyReprocess(_) | BackendCall::CurrentProcess(_)
            )
        })
        .collect();
    assert!(
        remediations.is_empty(),
        "Expected no remediation calls, got {:?}",
        remediations
    );
}

/// Asserts that exactly one remediation call was made, and returns it
pub fn assert_single_remediation_call(calls: &[BackendCall]) -> BackendCall {
    let remediations: Vec<_> = calls
        .iter()
        .filter(|c| {
            matches!(
                c,
                BackendCall::LegacyReprocess(_) | BackendCall::CurrentProcess(_)
            )
        })
        .cloned()
        .collect();
    assert_eq!(
        remediations.len(),
        1,
        "Expected exactly one remediation call, got {:?}",
        remediations
    );
    remediations[0].clone()
}

/// Asserts that the backend saw only a claim lookup
pub fn assert_only_claim_lookup(calls: &[BackendCall], id: ClaimId) {
    assert_eq!(
        calls,
        &[BackendCall::ClaimLookup(id)],
        "Expected only a lookup of claim {}",
        id
    );
}

/// Asserts that a report holds exactly one outcome per requested claim
pub fn assert_one_outcome_per_claim(report: &BatchReport, ids: &[ClaimId]) {
    assert_eq!(
        report.outcomes.len(),
        ids.len(),
        "Expected {} outcomes, got {}",
        ids.len(),
        report.outcomes.len()
    );
    for id in ids {
        let count = report.outcomes.iter().filter(|o| o.claim_id == *id).count();
        let expected = ids.iter().filter(|other| *other == id).count();
        assert_eq!(count, expected, "Claim {} has {} outcomes, expected {}", id, count, expected);
    }
}

/// Asserts that the recorded stage trail follows the decision procedure
pub fn assert_valid_trail(outcome: &ClaimOutcome) {
    let stages = &outcome.stages;
    assert!(
        stages.windows(2).all(|w| w[0].can_transition_to(w[1])),
        "Claim {} has an invalid stage trail: {:?}",
        outcome.claim_id,
        stages
    );
    assert_eq!(
        stages.last(),
        Some(&domain_claims::ReconcileStage::Finished(outcome.verdict.kind())),
        "Claim {} trail does not end in its verdict",
        outcome.claim_id
    );
}
