//! Reconciliation state machine
//!
//! ```text
//! Start -> Fetched -> ExpiryChecked -> CaseChecked -> VersionChecked -> RemediationInvoked
//!                           |               |                                 |
//!                           v               v                                 v
//!                      Consistent   Consistent | NoCase |           RemediationNoOp |
//!                                   AmbiguousCase | UnknownStatus   RemediationApplied
//! ```
//!
//! `ErrorAborted` is reachable from every non-terminal stage. The machine is
//! linear and has no cycles.

use serde::{Deserialize, Serialize};

use crate::verdict::VerdictKind;

/// A stage of one claim's reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStage {
    Start,
    /// Claim detail retrieved
    Fetched,
    /// Mediator deadlines evaluated
    ExpiryChecked,
    /// Support cases retrieved and classified
    CaseChecked,
    /// Generation determined
    VersionChecked,
    /// Remediation endpoint answered
    RemediationInvoked,
    /// Terminal stage
    Finished(VerdictKind),
}

impl ReconcileStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReconcileStage::Finished(_))
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ReconcileStage) -> bool {
        use ReconcileStage::*;
        use VerdictKind::*;
        matches!(
            (*self, target),
            (Start, Fetched) |
            (Fetched, ExpiryChecked) |
            (ExpiryChecked, Finished(Consistent)) |
            (ExpiryChecked, CaseChecked) |
            (CaseChecked, Finished(Consistent)) |
            (CaseChecked, Finished(NoCase)) |
            (CaseChecked, Finished(AmbiguousCase)) |
            (CaseChecked, Finished(UnknownStatus)) |
            (CaseChecked, VersionChecked) |
            (VersionChecked, RemediationInvoked) |
            (RemediationInvoked, Finished(RemediationNoOp)) |
            (RemediationInvoked, Finished(RemediationApplied))
        ) || (!self.is_terminal() && target == Finished(ErrorAborted))
    }
}

/// Ordered record of the stages one claim went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTrail {
    stages: Vec<ReconcileStage>,
}

impl Default for StageTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTrail {
    pub fn new() -> Self {
        Self {
            stages: vec![ReconcileStage::Start],
        }
    }

    pub fn current(&self) -> ReconcileStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(ReconcileStage::Start)
    }

    /// Records the next stage
    pub fn advance(&mut self, next: ReconcileStage) {
        debug_assert!(
            self.current().can_transition_to(next),
            "invalid reconciliation transition {:?} -> {:?}",
            self.current(),
            next
        );
        self.stages.push(next);
    }

    /// Records the terminal stage for a verdict kind
    pub fn finish(&mut self, kind: VerdictKind) {
        self.advance(ReconcileStage::Finished(kind));
    }

    /// True if every recorded step is a permitted transition
    pub fn is_valid(&self) -> bool {
        self.stages.first() == Some(&ReconcileStage::Start)
            && self.stages.windows(2).all(|w| w[0].can_transition_to(w[1]))
    }

    pub fn into_stages(self) -> Vec<ReconcileStage> {
        self.stages
    }
}
