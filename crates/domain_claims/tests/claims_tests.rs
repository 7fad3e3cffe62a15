//! Tests for the claim model, expiry evaluator and case classifier

use chrono::Duration;
use proptest::prelude::*;

use domain_claims::{
    classify_cases, has_overdue_mediator_action, overdue_mediator_actions, Action, CaseClassification,
    CaseStatus, Claim, SupportCase,
};
use test_utils::{
    claim_strategy, support_cases_strategy, ClaimBuilder, IdFixtures, TemporalFixtures,
};

// ============================================================================
// Expiry Evaluator Tests
// ============================================================================

mod expiry_tests {
    use super::*;

    #[test]
    fn test_claim_without_players_is_not_overdue() {
        let claim = ClaimBuilder::new(IdFixtures::claim(1)).build();
        assert!(!has_overdue_mediator_action(&claim, TemporalFixtures::evaluation_instant()));
    }

    #[test]
    fn test_lapsed_mandatory_mediator_action_is_overdue() {
        let claim = ClaimBuilder::new(IdFixtures::claim(1))
            .with_overdue_mediator_action()
            .build();
        assert!(has_overdue_mediator_action(&claim, TemporalFixtures::evaluation_instant()));
    }

    #[test]
    fn test_optional_action_never_overdue() {
        let claim = ClaimBuilder::new(IdFixtures::claim(1))
            .with_mediator_action(TemporalFixtures::lapsed_deadline(), false)
            .build();
        assert!(!has_overdue_mediator_action(&claim, TemporalFixtures::evaluation_instant()));
    }

    #[test]
    fn test_deadline_equal_to_now_is_not_overdue() {
        let now = TemporalFixtures::evaluation_instant();
        let claim = ClaimBuilder::new(IdFixtures::claim(1))
            .with_mediator_action(now, true)
            .build();
        assert!(!has_overdue_mediator_action(&claim, now));
        assert!(has_overdue_mediator_action(&claim, now + Duration::seconds(1)));
    }

    #[test]
    fn test_other_roles_are_ignored() {
        let claim = ClaimBuilder::new(IdFixtures::claim(1))
            .with_player(
                "respondent",
                vec![Action::new(TemporalFixtures::lapsed_deadline(), true)],
            )
            .with_player(
                "Mediator",
                vec![Action::new(TemporalFixtures::lapsed_deadline(), true)],
            )
            .build();
        assert!(!has_overdue_mediator_action(&claim, TemporalFixtures::evaluation_instant()));
    }

    #[test]
    fn test_every_mediator_is_evaluated() {
        let claim = ClaimBuilder::new(IdFixtures::claim(1))
            .with_pending_mediator_action()
            .with_overdue_mediator_action()
            .build();

        let overdue = overdue_mediator_actions(&claim, TemporalFixtures::evaluation_instant());
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].due_date, Some(TemporalFixtures::lapsed_deadline()));
    }

    proptest! {
        #[test]
        fn test_overdue_matches_definition(claim in claim_strategy()) {
            let now = TemporalFixtures::evaluation_instant();
            let expected = claim.players.iter()
                .filter(|p| p.role == "mediator")
                .flat_map(|p| p.actions.iter())
                .any(|a| a.mandatory && a.due_date.map_or(true, |due| due < now));
            prop_assert_eq!(has_overdue_mediator_action(&claim, now), expected);
        }

        #[test]
        fn test_overdue_list_agrees_with_predicate(claim in claim_strategy()) {
            let now = TemporalFixtures::evaluation_instant();
            let overdue = overdue_mediator_actions(&claim, now);
            prop_assert_eq!(!overdue.is_empty(), has_overdue_mediator_action(&claim, now));
            prop_assert!(overdue.iter().all(|a| a.is_overdue(now)));
        }

        #[test]
        fn test_evaluation_is_deterministic(claim in claim_strategy()) {
            let now = TemporalFixtures::evaluation_instant();
            prop_assert_eq!(
                has_overdue_mediator_action(&claim, now),
                has_overdue_mediator_action(&claim, now)
            );
        }
    }
}

// ============================================================================
// Case Classifier Tests
// ============================================================================

mod classifier_tests {
    use super::*;

    #[test]
    fn test_no_cases() {
        assert_eq!(classify_cases(&[]), CaseClassification::NoCase);
    }

    #[test]
    fn test_single_open_case() {
        assert_eq!(
            classify_cases(&[SupportCase::new("OPENED")]),
            CaseClassification::OpenAndTracked
        );
    }

    #[test]
    fn test_single_unknown_status_is_reported_verbatim() {
        assert_eq!(
            classify_cases(&[SupportCase::new("WAITING_FOR_SELLER")]),
            CaseClassification::UnknownStatus {
                status: "WAITING_FOR_SELLER".to_string()
            }
        );
    }

    proptest! {
        #[test]
        fn test_cardinality_decides_first(cases in support_cases_strategy()) {
            let classification = classify_cases(&cases);
            match cases.len() {
                0 => prop_assert_eq!(classification, CaseClassification::NoCase),
                1 => prop_assert!(
                    !matches!(
                        classification,
                        CaseClassification::NoCase | CaseClassification::AmbiguousCase { .. }
                    ),
                    "single case classified as {:?}",
                    classification
                ),
                n => prop_assert_eq!(classification, CaseClassification::AmbiguousCase { count: n }),
            }
        }

        #[test]
        fn test_single_case_status_mapping(status in "[A-Z_]{1,12}") {
            let classification = classify_cases(&[SupportCase::new(status.as_str())]);
            let expected = match status.as_str() {
                "OPENED" => CaseClassification::OpenAndTracked,
                "CLOSED" => CaseClassification::ClosedNeedsRemediation,
                other => CaseClassification::UnknownStatus { status: other.to_string() },
            };
            prop_assert_eq!(classification, expected);
        }
    }
}

// ============================================================================
// Wire Format Tests
// ============================================================================

mod serde_tests {
    use super::*;

    #[test]
    fn test_case_status_serializes_as_string() {
        let case = SupportCase::new("CLOSED");
        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "CLOSED" }));

        let parsed: SupportCase = serde_json::from_value(serde_json::json!({ "status": "ON_HOLD" })).unwrap();
        assert_eq!(parsed.status, CaseStatus::Other("ON_HOLD".to_string()));
    }

    #[test]
    fn test_claim_roundtrip_keeps_identifier_numeric() {
        let claim: Claim = ClaimBuilder::new(IdFixtures::claim(42))
            .with_overdue_mediator_action()
            .build();
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["id"], serde_json::json!(42));
    }
}
