//! Tests for the reconciliation orchestrator against scripted backends

use std::sync::Arc;
use std::time::Duration;

use core_kernel::ClaimId;
use domain_claims::ports::mock::{BackendCall, MockBackend, MockFault};
use domain_claims::{
    Backends, ConsistentReason, Generation, Operation, ProbeErrorPolicy, ReconcileStage, Reconciler,
    ReconcilerSettings, RemediationResult, Verdict, VerdictKind, VerdictLabels,
};
use test_utils::{
    assert_no_remediation_calls, assert_one_outcome_per_claim, assert_only_claim_lookup,
    assert_single_remediation_call, assert_valid_trail, assert_verdict_kind, IdFixtures,
    ScenarioBuilder, TemporalFixtures,
};

fn reconciler_for(backend: Arc<MockBackend>, settings: ReconcilerSettings) -> Reconciler {
    Reconciler::new(Backends::from_single(backend), settings).with_clock(TemporalFixtures::clock())
}

fn reconciler(backend: Arc<MockBackend>) -> Reconciler {
    reconciler_for(backend, ReconcilerSettings::default())
}

fn id(value: u64) -> ClaimId {
    IdFixtures::claim(value)
}

// ============================================================================
// Decision Procedure Tests
// ============================================================================

mod decision_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_overdue_action_short_circuits() {
        let backend = Arc::new(ScenarioBuilder::new().pending_claim(1).build());

        let outcome = reconciler(backend.clone()).reconcile(id(1)).await;

        assert_eq!(
            outcome.verdict,
            Verdict::Consistent { reason: ConsistentReason::NoOverdueAction }
        );
        assert_only_claim_lookup(&backend.calls().await, id(1));
        assert_valid_trail(&outcome);
    }

    #[tokio::test]
    async fn test_open_case_is_consistent_without_remediation() {
        let backend = Arc::new(ScenarioBuilder::new().overdue_claim(2).with_case(2, "OPENED").build());

        let outcome = reconciler(backend.clone()).reconcile(id(2)).await;

        assert_eq!(outcome.verdict, Verdict::Consistent { reason: ConsistentReason::CaseOpen });
        let calls = backend.calls().await;
        assert_no_remediation_calls(&calls);
        assert!(!calls.contains(&BackendCall::GenerationProbe(id(2))));
        assert_valid_trail(&outcome);
    }

    #[tokio::test]
    async fn test_zero_cases_is_no_case() {
        let backend = Arc::new(ScenarioBuilder::new().overdue_claim(3).with_cases(3, &[]).build());

        let outcome = reconciler(backend.clone()).reconcile(id(3)).await;

        assert_eq!(outcome.verdict, Verdict::NoCase);
        assert_no_remediation_calls(&backend.calls().await);
    }

    #[tokio::test]
    async fn test_many_cases_is_ambiguous() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(4)
                .with_cases(4, &["CLOSED", "OPENED", "CLOSED"])
                .build(),
        );

        let outcome = reconciler(backend.clone()).reconcile(id(4)).await;

        assert_eq!(outcome.verdict, Verdict::AmbiguousCase { case_count: 3 });
        assert_no_remediation_calls(&backend.calls().await);
        assert_valid_trail(&outcome);
    }

    #[tokio::test]
    async fn test_unknown_status_is_reported_verbatim() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(5)
                .with_case(5, "WAITING_FOR_BUYER")
                .build(),
        );

        let outcome = reconciler(backend.clone()).reconcile(id(5)).await;

        assert_eq!(
            outcome.verdict,
            Verdict::UnknownStatus { status: "WAITING_FOR_BUYER".to_string() }
        );
        assert_no_remediation_calls(&backend.calls().await);
    }

    #[tokio::test]
    async fn test_legacy_claim_uses_batched_path() {
        let backend = Arc::new(ScenarioBuilder::new().closed_case_claim(6, Generation::Legacy).build());

        reconciler(backend.clone()).reconcile(id(6)).await;

        let call = assert_single_remediation_call(&backend.calls().await);
        assert_eq!(call, BackendCall::LegacyReprocess(vec![id(6)]));
    }

    #[tokio::test]
    async fn test_current_claim_uses_per_claim_path() {
        let backend = Arc::new(ScenarioBuilder::new().closed_case_claim(7, Generation::Current).build());

        let outcome = reconciler(backend.clone()).reconcile(id(7)).await;

        let call = assert_single_remediation_call(&backend.calls().await);
        assert_eq!(call, BackendCall::CurrentProcess(id(7)));
        assert_eq!(outcome.verdict, Verdict::RemediationNoOp { generation: Generation::Current });
    }

    #[tokio::test]
    async fn test_applied_rule_is_reported() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(8)
                .with_case(8, "CLOSED")
                .with_generation(8, Generation::Current)
                .with_applied_remediation(8, "close_mediation")
                .build(),
        );

        let outcome = reconciler(backend).reconcile(id(8)).await;

        assert_eq!(
            outcome.verdict,
            Verdict::RemediationApplied {
                generation: Generation::Current,
                applied_rule: "close_mediation".to_string(),
            }
        );
        assert_eq!(
            outcome.stages,
            vec![
                ReconcileStage::Start,
                ReconcileStage::Fetched,
                ReconcileStage::ExpiryChecked,
                ReconcileStage::CaseChecked,
                ReconcileStage::VersionChecked,
                ReconcileStage::RemediationInvoked,
                ReconcileStage::Finished(VerdictKind::RemediationApplied),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_remediation_result_is_decode_error() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(9)
                .with_case(9, "CLOSED")
                .with_generation(9, Generation::Legacy)
                .with_remediation(9, Vec::new())
                .build(),
        );

        let outcome = reconciler(backend).reconcile(id(9)).await;

        match outcome.verdict {
            Verdict::ErrorAborted { operation, error } => {
                assert_eq!(operation, Operation::Remediation);
                assert!(error.contains("empty result list"), "unexpected error: {}", error);
            }
            other => panic!("expected ErrorAborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reference_scenario_claim_42() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(42)
                .with_case(42, "CLOSED")
                .with_generation(42, Generation::Legacy)
                .with_remediation(42, vec![RemediationResult::no_op()])
                .build(),
        );

        let outcome = reconciler(backend.clone()).reconcile(IdFixtures::scenario_claim()).await;

        assert_eq!(outcome.verdict, Verdict::RemediationNoOp { generation: Generation::Legacy });
        assert_eq!(
            backend.calls().await,
            vec![
                BackendCall::ClaimLookup(id(42)),
                BackendCall::CaseSearch(id(42)),
                BackendCall::GenerationProbe(id(42)),
                BackendCall::LegacyReprocess(vec![id(42)]),
            ]
        );
        assert_eq!(
            VerdictLabels::default().report_line(&outcome),
            "42 -> REOPEN REQUESTED IN SUPPORT"
        );
    }
}

// ============================================================================
// Failure Handling Tests
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_lookup_failure_aborts_before_case_search() {
        let backend = Arc::new(ScenarioBuilder::new().with_claim_fault(10, MockFault::Connection).build());

        let outcome = reconciler(backend.clone()).reconcile(id(10)).await;

        assert!(matches!(
            outcome.verdict,
            Verdict::ErrorAborted { operation: Operation::ClaimLookup, .. }
        ));
        assert_only_claim_lookup(&backend.calls().await, id(10));
        assert_valid_trail(&outcome);
    }

    #[tokio::test]
    async fn test_malformed_case_search_aborts() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(11)
                .with_cases_fault(11, MockFault::Decode)
                .build(),
        );

        let outcome = reconciler(backend.clone()).reconcile(id(11)).await;

        match &outcome.verdict {
            Verdict::ErrorAborted { operation, error } => {
                assert_eq!(*operation, Operation::CaseSearch);
                assert!(error.starts_with("decode error"), "unexpected error: {}", error);
            }
            other => panic!("expected ErrorAborted, got {:?}", other),
        }
        assert_no_remediation_calls(&backend.calls().await);
    }

    #[tokio::test]
    async fn test_probe_failure_aborts_by_default() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(12)
                .with_case(12, "CLOSED")
                .with_probe_fault(12, MockFault::Status(500))
                .with_no_op_remediation(12)
                .build(),
        );

        let outcome = reconciler(backend.clone()).reconcile(id(12)).await;

        assert!(matches!(
            outcome.verdict,
            Verdict::ErrorAborted { operation: Operation::GenerationProbe, .. }
        ));
        assert_no_remediation_calls(&backend.calls().await);
    }

    #[tokio::test]
    async fn test_probe_failure_assumes_current_when_configured() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(13)
                .with_case(13, "CLOSED")
                .with_probe_fault(13, MockFault::Status(503))
                .with_no_op_remediation(13)
                .build(),
        );
        let settings = ReconcilerSettings {
            probe_error_policy: ProbeErrorPolicy::AssumeCurrent,
            ..ReconcilerSettings::default()
        };

        let outcome = reconciler_for(backend.clone(), settings).reconcile(id(13)).await;

        assert_eq!(outcome.verdict, Verdict::RemediationNoOp { generation: Generation::Current });
        assert_eq!(
            assert_single_remediation_call(&backend.calls().await),
            BackendCall::CurrentProcess(id(13))
        );
    }

    #[tokio::test]
    async fn test_remediation_failure_aborts() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .overdue_claim(14)
                .with_case(14, "CLOSED")
                .with_generation(14, Generation::Legacy)
                .with_remediation_fault(14, MockFault::Timeout)
                .build(),
        );

        let outcome = reconciler(backend).reconcile(id(14)).await;

        assert!(matches!(
            outcome.verdict,
            Verdict::ErrorAborted { operation: Operation::Remediation, .. }
        ));
        assert_valid_trail(&outcome);
    }

    #[tokio::test]
    async fn test_slow_backend_is_bounded_by_call_timeout() {
        let backend = Arc::new(
            ScenarioBuilder::new()
                .pending_claim(15)
                .with_latency(Duration::from_millis(500))
                .build(),
        );
        let settings = ReconcilerSettings {
            call_timeout: Duration::from_millis(20),
            ..ReconcilerSettings::default()
        };

        let outcome = reconciler_for(backend, settings).reconcile(id(15)).await;

        match outcome.verdict {
            Verdict::ErrorAborted { operation, error } => {
                assert_eq!(operation, Operation::ClaimLookup);
                assert!(error.contains("timed out after 20ms"), "unexpected error: {}", error);
            }
            other => panic!("expected ErrorAborted, got {:?}", other),
        }
    }
}

// ============================================================================
// Batch Tests
// ============================================================================

mod batch_tests {
    use super::*;

    fn mixed_backend() -> MockBackend {
        ScenarioBuilder::new()
            .pending_claim(1)
            .overdue_claim(2)
            .with_case(2, "OPENED")
            .overdue_claim(3)
            .closed_case_claim(4, Generation::Legacy)
            .closed_case_claim(5, Generation::Current)
            .with_claim_fault(6, MockFault::Connection)
            .overdue_claim(7)
            .with_cases(7, &["CLOSED", "CLOSED"])
            .build()
    }

    #[tokio::test]
    async fn test_one_outcome_per_claim_in_input_order() {
        let ids = IdFixtures::claims(1, 7);
        let backend = Arc::new(mixed_backend());

        let report = reconciler(backend).run_batch(&ids).await;

        assert_one_outcome_per_claim(&report, &ids);
        let order: Vec<ClaimId> = report.outcomes.iter().map(|o| o.claim_id).collect();
        assert_eq!(order, ids);
        report.outcomes.iter().for_each(assert_valid_trail);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_batch() {
        let ids = vec![id(6), id(1)];
        let backend = Arc::new(mixed_backend());

        let report = reconciler(backend).run_batch(&ids).await;

        assert_verdict_kind(report.outcome_for(id(6)).unwrap(), VerdictKind::ErrorAborted);
        assert_verdict_kind(report.outcome_for(id(1)).unwrap(), VerdictKind::Consistent);
    }

    #[tokio::test]
    async fn test_tally_counts_each_kind() {
        let ids = IdFixtures::claims(1, 7);
        let report = reconciler(Arc::new(mixed_backend())).run_batch(&ids).await;

        let tally = report.tally();
        assert_eq!(tally.get(&VerdictKind::Consistent), Some(&2));
        assert_eq!(tally.get(&VerdictKind::NoCase), Some(&1));
        assert_eq!(tally.get(&VerdictKind::RemediationNoOp), Some(&2));
        assert_eq!(tally.get(&VerdictKind::ErrorAborted), Some(&1));
        assert_eq!(tally.get(&VerdictKind::AmbiguousCase), Some(&1));
        assert_eq!(report.needs_attention(), 5);
    }

    #[tokio::test]
    async fn test_runs_are_idempotent() {
        let ids = IdFixtures::claims(1, 7);
        let reconciler = reconciler(Arc::new(mixed_backend()));

        let first = reconciler.run_batch(&ids).await;
        let second = reconciler.run_batch(&ids).await;

        assert_eq!(first.verdicts_by_claim(), second.verdicts_by_claim());
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_concurrent_batch_keeps_attribution() {
        let ids = IdFixtures::claims(1, 7);
        let sequential = reconciler(Arc::new(mixed_backend())).run_batch(&ids).await;

        let backend = Arc::new(mixed_backend().with_latency(Duration::from_millis(5)));
        let settings = ReconcilerSettings {
            concurrency: 4,
            ..ReconcilerSettings::default()
        };
        let concurrent = reconciler_for(backend.clone(), settings).run_batch(&ids).await;

        assert_one_outcome_per_claim(&concurrent, &ids);
        assert_eq!(sequential.verdicts_by_claim(), concurrent.verdicts_by_claim());
        assert_eq!(
            backend.calls_for(id(4)).await,
            vec![
                BackendCall::ClaimLookup(id(4)),
                BackendCall::CaseSearch(id(4)),
                BackendCall::GenerationProbe(id(4)),
                BackendCall::LegacyReprocess(vec![id(4)]),
            ]
        );
    }

    #[tokio::test]
    async fn test_outcomes_are_streamed_as_they_complete() {
        let ids = IdFixtures::claims(1, 3);
        let mut seen = Vec::new();

        let report = reconciler(Arc::new(mixed_backend()))
            .run_batch_with(&ids, |outcome| seen.push(outcome.claim_id))
            .await;

        assert_eq!(seen, ids);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = reconciler(Arc::new(MockBackend::new())).run_batch(&[]).await;
        assert!(report.outcomes.is_empty());
    }
}
