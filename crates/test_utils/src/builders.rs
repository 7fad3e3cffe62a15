//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! Tests describe only the deadlines and cases they care about; the
//! scenario builder turns that description into a scripted [`MockBackend`].

use chrono::{DateTime, Utc};
use core_kernel::ClaimId;
use domain_claims::ports::mock::{MockBackend, MockFault};
use domain_claims::{
    Action, Claim, Generation, Player, RemediationResult, SupportCase, MEDIATOR_ROLE,
};

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for constructing claims
pub struct ClaimBuilder {
    id: ClaimId,
    players: Vec<Player>,
}

impl ClaimBuilder {
    /// Creates a claim with no players
    pub fn new(id: ClaimId) -> Self {
        Self {
            id,
            players: Vec::new(),
        }
    }

    /// Adds a player with the given role and actions
    pub fn with_player(mut self, role: impl Into<String>, actions: Vec<Action>) -> Self {
        self.players.push(Player::new(role, actions));
        self
    }

    /// Adds a mediator whose mandatory action lapsed before evaluation
    pub fn with_overdue_mediator_action(self) -> Self {
        self.with_player(
            MEDIATOR_ROLE,
            vec![Action::new(TemporalFixtures::lapsed_deadline(), true)],
        )
    }

    /// Adds a mediator whose mandatory action is still pending
    pub fn with_pending_mediator_action(self) -> Self {
        self.with_player(
            MEDIATOR_ROLE,
            vec![Action::new(TemporalFixtures::future_deadline(), true)],
        )
    }

    /// Adds a mediator with a single action due at `due_date`
    pub fn with_mediator_action(self, due_date: DateTime<Utc>, mandatory: bool) -> Self {
        self.with_player(MEDIATOR_ROLE, vec![Action::new(due_date, mandatory)])
    }

    pub fn build(self) -> Claim {
        Claim::new(self.id, self.players)
    }
}

/// Builder for a scripted backend covering one or more claims
///
/// ```rust,ignore
/// let backend = ScenarioBuilder::new()
///     .overdue_claim(42)
///     .with_case(42, "CLOSED")
///     .with_generation(42, Generation::Legacy)
///     .with_no_op_remediation(42)
///     .build();
/// ```
#[derive(Default)]
pub struct ScenarioBuilder {
    backend: MockBackend,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a claim with a lapsed mandatory mediator action
    pub fn overdue_claim(self, id: u64) -> Self {
        self.claim(
            ClaimBuilder::new(IdFixtures::claim(id))
                .with_overdue_mediator_action()
                .build(),
        )
    }

    /// Registers a claim with only pending mediator actions
    pub fn pending_claim(self, id: u64) -> Self {
        self.claim(
            ClaimBuilder::new(IdFixtures::claim(id))
                .with_pending_mediator_action()
                .build(),
        )
    }

    pub fn claim(mut self, claim: Claim) -> Self {
        self.backend = self.backend.with_claim(claim);
        self
    }

    /// Registers a single support case with the given status
    pub fn with_case(self, id: u64, status: &str) -> Self {
        self.with_cases(id, &[status])
    }

    pub fn with_cases(mut self, id: u64, statuses: &[&str]) -> Self {
        let cases = statuses.iter().map(|s| SupportCase::new(*s)).collect();
        self.backend = self.backend.with_cases(IdFixtures::claim(id), cases);
        self
    }

    pub fn with_generation(mut self, id: u64, generation: Generation) -> Self {
        self.backend = self.backend.with_generation(IdFixtures::claim(id), generation);
        self
    }

    /// Remediation answers that no rule applied
    pub fn with_no_op_remediation(self, id: u64) -> Self {
        self.with_remediation(id, vec![RemediationResult::no_op()])
    }

    /// Remediation answers that `rule` applied
    pub fn with_applied_remediation(self, id: u64, rule: &str) -> Self {
        self.with_remediation(id, vec![RemediationResult::new(rule)])
    }

    pub fn with_remediation(mut self, id: u64, results: Vec<RemediationResult>) -> Self {
        self.backend = self.backend.with_remediation(IdFixtures::claim(id), results);
        self
    }

    /// A claim whose every step succeeds and ends in `generation` remediation
    pub fn closed_case_claim(self, id: u64, generation: Generation) -> Self {
        self.overdue_claim(id)
            .with_case(id, "CLOSED")
            .with_generation(id, generation)
            .with_no_op_remediation(id)
    }

    pub fn with_claim_fault(mut self, id: u64, fault: MockFault) -> Self {
        self.backend = self.backend.with_claim_fault(IdFixtures::claim(id), fault);
        self
    }

    pub fn with_cases_fault(mut self, id: u64, fault: MockFault) -> Self {
        self.backend = self.backend.with_cases_fault(IdFixtures::claim(id), fault);
        self
    }

    pub fn with_probe_fault(mut self, id: u64, fault: MockFault) -> Self {
        self.backend = self.backend.with_probe_fault(IdFixtures::claim(id), fault);
        self
    }

    pub fn with_remediation_fault(mut self, id: u64, fault: MockFault) -> Self {
        self.backend = self.backend.with_remediation_fault(IdFixtures::claim(id), fault);
        self
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.backend = self.backend.with_latency(latency);
        self
    }

    pub fn build(self) -> MockBackend {
        self.backend
    }
}
