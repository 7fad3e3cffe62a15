//! Property-Based Test Generators
//!
//! Provides proptest strategies for claims and support cases. Deadlines are
//! generated relative to [`TemporalFixtures::evaluation_instant`] so tests
//! can reason about which actions are overdue.

use chrono::{DateTime, Duration, Utc};
use core_kernel::ClaimId;
use domain_claims::{Action, Claim, Player, SupportCase, MEDIATOR_ROLE};
use proptest::prelude::*;

use crate::fixtures::TemporalFixtures;

/// Strategy for generating valid claim identifiers
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    (1u64..10_000_000_000u64).prop_map(|v| ClaimId::new(v).expect("positive"))
}

/// Strategy for role tags, weighted towards the mediator role
pub fn role_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just(MEDIATOR_ROLE.to_string()),
        1 => Just("complainant".to_string()),
        1 => Just("respondent".to_string()),
        1 => Just("Mediator".to_string()),
    ]
}

/// Strategy for deadlines within ten days either side of evaluation
pub fn due_date_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (-864_000i64..864_000i64)
        .prop_map(|offset| TemporalFixtures::evaluation_instant() + Duration::seconds(offset))
}

pub fn action_strategy() -> impl Strategy<Value = Action> {
    (prop::option::weighted(0.9, due_date_strategy()), any::<bool>()).prop_map(|(due, mandatory)| match due {
        Some(due) => Action::new(due, mandatory),
        None => Action::undated(mandatory),
    })
}

pub fn player_strategy() -> impl Strategy<Value = Player> {
    (role_strategy(), prop::collection::vec(action_strategy(), 0..4))
        .prop_map(|(role, actions)| Player::new(role, actions))
}

pub fn claim_strategy() -> impl Strategy<Value = Claim> {
    (claim_id_strategy(), prop::collection::vec(player_strategy(), 0..5))
        .prop_map(|(id, players)| Claim::new(id, players))
}

/// Strategy for case statuses, including values outside the known set
pub fn case_status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => Just("OPENED".to_string()),
        2 => Just("CLOSED".to_string()),
        1 => "[A-Z_]{1,12}",
    ]
}

pub fn support_cases_strategy() -> impl Strategy<Value = Vec<SupportCase>> {
    prop::collection::vec(case_status_strategy().prop_map(SupportCase::new), 0..4)
}
