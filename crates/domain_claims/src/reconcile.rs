//! Reconciliation orchestrator
//!
//! Runs the decision procedure for one claim at a time and a batch of claims
//! with bounded parallelism. Every failure is caught at the claim boundary,
//! so each supplied claim identifier yields exactly one [`ClaimOutcome`].

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, instrument, warn, Instrument};

use core_kernel::{ClaimId, Clock, PortError, RunId, SystemClock};

use crate::error::ReconcileError;
use crate::expiry::overdue_mediator_actions;
use crate::generation::{Generation, ProbeErrorPolicy};
use crate::ports::Backends;
use crate::remediation::{classify_remediation, RemediationOutcome};
use crate::support_case::{classify_cases, CaseClassification};
use crate::verdict::{ClaimOutcome, ConsistentReason, Operation, Verdict, VerdictKind};
use crate::workflow::{ReconcileStage, StageTrail};

/// Tuning knobs of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerSettings {
    /// Claims reconciled at the same time; 1 keeps input order
    pub concurrency: usize,
    /// Upper bound on every collaborator call
    pub call_timeout: Duration,
    /// Reaction to a failed generation probe
    pub probe_error_policy: ProbeErrorPolicy,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            call_timeout: Duration::from_secs(30),
            probe_error_policy: ProbeErrorPolicy::Abort,
        }
    }
}

/// Error caught at the claim boundary, with the call that produced it
#[derive(Debug)]
struct Failure {
    operation: Operation,
    error: ReconcileError,
}

impl Failure {
    fn new(operation: Operation, error: ReconcileError) -> Self {
        Self { operation, error }
    }
}

/// Outcomes of one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: RunId,
    /// One outcome per supplied claim identifier, in completion order
    pub outcomes: Vec<ClaimOutcome>,
}

impl BatchReport {
    /// Number of outcomes per verdict kind
    pub fn tally(&self) -> BTreeMap<VerdictKind, usize> {
        let mut tally = BTreeMap::new();
        for outcome in &self.outcomes {
            *tally.entry(outcome.verdict.kind()).or_insert(0) += 1;
        }
        tally
    }

    /// Number of claims whose verdict needs a human
    pub fn needs_attention(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict.needs_attention())
            .count()
    }

    pub fn outcome_for(&self, claim_id: ClaimId) -> Option<&ClaimOutcome> {
        self.outcomes.iter().find(|o| o.claim_id == claim_id)
    }

    /// Verdicts keyed by claim, independent of completion order
    pub fn verdicts_by_claim(&self) -> BTreeMap<ClaimId, Verdict> {
        self.outcomes
            .iter()
            .map(|o| (o.claim_id, o.verdict.clone()))
            .collect()
    }
}

/// Reconciles claim deadlines against support cases
pub struct Reconciler {
    backends: Backends,
    settings: ReconcilerSettings,
    clock: Arc<dyn Clock>,
}

impl Reconciler {
    /// Creates a reconciler evaluating deadlines against wall-clock time
    pub fn new(backends: Backends, settings: ReconcilerSettings) -> Self {
        Self {
            backends,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to capture the evaluation instant
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Reconciles every claim and collects the outcomes
    pub async fn run_batch(&self, claim_ids: &[ClaimId]) -> BatchReport {
        self.run_batch_with(claim_ids, |_| {}).await
    }

    /// Reconciles every claim, handing each outcome to `on_outcome` as soon as it is known
    pub async fn run_batch_with<F>(&self, claim_ids: &[ClaimId], mut on_outcome: F) -> BatchReport
    where
        F: FnMut(&ClaimOutcome),
    {
        let run_id = RunId::new_v7();
        let concurrency = self.settings.concurrency.max(1);
        let span = info_span!("reconciliation_run", run_id = %run_id);

        async move {
            info!(claims = claim_ids.len(), concurrency, "Starting reconciliation run");

            let mut outcomes = Vec::with_capacity(claim_ids.len());
            let mut pending = stream::iter(claim_ids.iter().copied())
                .map(|claim_id| self.reconcile(claim_id))
                .buffer_unordered(concurrency);

            while let Some(outcome) = pending.next().await {
                on_outcome(&outcome);
                outcomes.push(outcome);
            }

            let report = BatchReport { run_id, outcomes };
            info!(
                claims = report.outcomes.len(),
                needs_attention = report.needs_attention(),
                "Reconciliation run finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Reconciles a single claim to its terminal verdict
    #[instrument(name = "reconcile_claim", skip_all, fields(claim_id = %claim_id))]
    pub async fn reconcile(&self, claim_id: ClaimId) -> ClaimOutcome {
        let mut trail = StageTrail::new();

        let verdict = match self.decide(claim_id, &mut trail).await {
            Ok(verdict) => verdict,
            Err(Failure { operation, error }) => {
                if matches!(error, ReconcileError::Transport(_) | ReconcileError::Decode(_)) {
                    warn!(%operation, error = %error, "Claim reconciliation aborted");
                }
                Verdict::from_failure(operation, error)
            }
        };

        trail.finish(verdict.kind());
        info!(verdict = %verdict.kind(), "Claim reconciled");

        ClaimOutcome {
            claim_id,
            verdict,
            stages: trail.into_stages(),
        }
    }

    async fn decide(&self, claim_id: ClaimId, trail: &mut StageTrail) -> Result<Verdict, Failure> {
        // Captured once so every deadline of this claim is judged against the same instant
        let now = self.clock.now();

        let claim = self
            .call(Operation::ClaimLookup, self.backends.claims.fetch_claim(claim_id))
            .await?;
        trail.advance(ReconcileStage::Fetched);

        let overdue = overdue_mediator_actions(&claim, now).len();
        trail.advance(ReconcileStage::ExpiryChecked);
        if overdue == 0 {
            return Ok(Verdict::Consistent {
                reason: ConsistentReason::NoOverdueAction,
            });
        }
        debug!(overdue_actions = overdue, "Mediator deadline lapsed");

        let cases = self
            .call(Operation::CaseSearch, self.backends.cases.search_cases(claim_id))
            .await?;
        trail.advance(ReconcileStage::CaseChecked);

        match classify_cases(&cases) {
            CaseClassification::NoCase => return Ok(Verdict::NoCase),
            CaseClassification::OpenAndTracked => {
                return Ok(Verdict::Consistent {
                    reason: ConsistentReason::CaseOpen,
                })
            }
            CaseClassification::AmbiguousCase { count } => {
                return Err(Failure::new(
                    Operation::CaseSearch,
                    ReconcileError::Cardinality { count },
                ))
            }
            CaseClassification::UnknownStatus { status } => {
                return Err(Failure::new(
                    Operation::CaseSearch,
                    ReconcileError::DomainGap { status },
                ))
            }
            CaseClassification::ClosedNeedsRemediation => {}
        }

        let generation = match self
            .call(Operation::GenerationProbe, self.backends.probe.probe_generation(claim_id))
            .await
        {
            Ok(generation) => generation,
            Err(failure) => {
                let policy = self.settings.probe_error_policy;
                if policy == ProbeErrorPolicy::AssumeCurrent {
                    warn!(error = %failure.error, "Generation probe failed, assuming current generation");
                }
                policy
                    .resolve(failure.error)
                    .map_err(|error| Failure::new(Operation::GenerationProbe, error))?
            }
        };
        trail.advance(ReconcileStage::VersionChecked);
        debug!(%generation, "Generation determined");

        let results = match generation {
            Generation::Legacy => {
                self.call(
                    Operation::Remediation,
                    self.backends.remediation.reprocess_legacy(&[claim_id]),
                )
                .await?
            }
            Generation::Current => {
                self.call(
                    Operation::Remediation,
                    self.backends.remediation.process_current(claim_id),
                )
                .await?
            }
        };
        trail.advance(ReconcileStage::RemediationInvoked);

        let verdict = match classify_remediation(&results)
            .map_err(|error| Failure::new(Operation::Remediation, error))?
        {
            RemediationOutcome::NoOp => Verdict::RemediationNoOp { generation },
            RemediationOutcome::Applied { rule } => Verdict::RemediationApplied {
                generation,
                applied_rule: rule,
            },
        };
        Ok(verdict)
    }

    /// Awaits a collaborator call, bounded by the configured timeout
    async fn call<T, F>(&self, operation: Operation, call: F) -> Result<T, Failure>
    where
        F: Future<Output = Result<T, PortError>>,
    {
        match tokio::time::timeout(self.settings.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                debug!(%operation, transient = err.is_transient(), error = %err, "Collaborator call failed");
                Err(Failure::new(operation, err.into()))
            }
            Err(_) => Err(Failure::new(
                operation,
                ReconcileError::transport(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.settings.call_timeout.as_millis()
                )),
            )),
        }
    }
}
