//! Claim Deadline Reconciliation Domain
//!
//! This crate decides, claim by claim, whether an expired mandatory mediator
//! action is reflected by the support case tracking the claim, and triggers
//! deadline reprocessing when it is not.
//!
//! # Decision Procedure
//!
//! ```text
//! fetch claim -> mediator deadline lapsed? -> support cases -> generation probe -> remediation
//!                      no: CONSISTENT          none / many / open / unknown status: terminal
//! ```

pub mod claim;
pub mod expiry;
pub mod support_case;
pub mod generation;
pub mod remediation;
pub mod verdict;
pub mod workflow;
pub mod ports;
pub mod reconcile;
pub mod error;

pub use claim::{Action, Claim, Player, MEDIATOR_ROLE};
pub use expiry::{has_overdue_mediator_action, overdue_mediator_actions};
pub use support_case::{classify_cases, CaseClassification, CaseStatus, SupportCase};
pub use generation::{Generation, ProbeErrorPolicy};
pub use remediation::{classify_remediation, RemediationOutcome, RemediationResult, NO_RULE_APPLIED};
pub use verdict::{
    ClaimOutcome, ConsistentReason, LabelPreset, Operation, Verdict, VerdictKind, VerdictLabels,
};
pub use workflow::{ReconcileStage, StageTrail};
pub use ports::{Backends, CaseSearchPort, ClaimLookupPort, GenerationProbePort, RemediationPort};
pub use reconcile::{BatchReport, Reconciler, ReconcilerSettings};
pub use error::ReconcileError;
