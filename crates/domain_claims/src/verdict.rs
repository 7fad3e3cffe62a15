//! Verdicts and their rendering
//!
//! A verdict is produced exactly once per claim. Rendering goes through a
//! label table keyed by [`VerdictKind`] so the wording of the report can be
//! changed without touching the decision procedure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::ClaimId;

use crate::error::ReconcileError;
use crate::generation::Generation;
use crate::workflow::ReconcileStage;

/// Collaborator call that was in flight when a claim aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ClaimLookup,
    CaseSearch,
    GenerationProbe,
    Remediation,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ClaimLookup => "claim lookup",
            Operation::CaseSearch => "case search",
            Operation::GenerationProbe => "generation probe",
            Operation::Remediation => "remediation",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a claim was found consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistentReason {
    /// No mediator has a lapsed mandatory action
    NoOverdueAction,
    /// The single support case is open
    CaseOpen,
}

/// Terminal outcome kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Consistent,
    NoCase,
    AmbiguousCase,
    UnknownStatus,
    RemediationNoOp,
    RemediationApplied,
    ErrorAborted,
}

impl VerdictKind {
    pub const ALL: [VerdictKind; 7] = [
        VerdictKind::Consistent,
        VerdictKind::NoCase,
        VerdictKind::AmbiguousCase,
        VerdictKind::UnknownStatus,
        VerdictKind::RemediationNoOp,
        VerdictKind::RemediationApplied,
        VerdictKind::ErrorAborted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::Consistent => "consistent",
            VerdictKind::NoCase => "no_case",
            VerdictKind::AmbiguousCase => "ambiguous_case",
            VerdictKind::UnknownStatus => "unknown_status",
            VerdictKind::RemediationNoOp => "remediation_no_op",
            VerdictKind::RemediationApplied => "remediation_applied",
            VerdictKind::ErrorAborted => "error_aborted",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        VerdictKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown verdict kind '{}'", s))
    }
}

/// Terminal verdict for one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Consistent { reason: ConsistentReason },
    NoCase,
    AmbiguousCase { case_count: usize },
    UnknownStatus { status: String },
    RemediationNoOp { generation: Generation },
    RemediationApplied { generation: Generation, applied_rule: String },
    ErrorAborted { operation: Operation, error: String },
}

impl Verdict {
    pub fn kind(&self) -> VerdictKind {
        match self {
            Verdict::Consistent { .. } => VerdictKind::Consistent,
            Verdict::NoCase => VerdictKind::NoCase,
            Verdict::AmbiguousCase { .. } => VerdictKind::AmbiguousCase,
            Verdict::UnknownStatus { .. } => VerdictKind::UnknownStatus,
            Verdict::RemediationNoOp { .. } => VerdictKind::RemediationNoOp,
            Verdict::RemediationApplied { .. } => VerdictKind::RemediationApplied,
            Verdict::ErrorAborted { .. } => VerdictKind::ErrorAborted,
        }
    }

    /// Converts an error caught at the claim boundary into the claim's verdict
    pub fn from_failure(operation: Operation, error: ReconcileError) -> Self {
        match error {
            ReconcileError::Cardinality { count } => Verdict::AmbiguousCase { case_count: count },
            ReconcileError::DomainGap { status } => Verdict::UnknownStatus { status },
            err @ (ReconcileError::Transport(_) | ReconcileError::Decode(_)) => Verdict::ErrorAborted {
                operation,
                error: err.to_string(),
            },
        }
    }

    /// True for verdicts that need a human to look at the claim
    pub fn needs_attention(&self) -> bool {
        !matches!(
            self,
            Verdict::Consistent { .. } | Verdict::RemediationApplied { .. }
        )
    }
}

/// Verdict of one claim together with the path it took
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub claim_id: ClaimId,
    pub verdict: Verdict,
    /// Stages traversed, from `Start` to the terminal stage
    pub stages: Vec<ReconcileStage>,
}

/// Built-in label tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPreset {
    #[default]
    Default,
    /// Wording used by the support operations team
    Es,
}

impl FromStr for LabelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "en" => Ok(LabelPreset::Default),
            "es" => Ok(LabelPreset::Es),
            other => Err(format!("unknown label preset '{}', expected 'default' or 'es'", other)),
        }
    }
}

/// Templates used to render verdicts, one per [`VerdictKind`]
///
/// Placeholders: `{status}`, `{count}`, `{generation}`, `{rule}`,
/// `{operation}` and `{error}`. Placeholders that do not apply to a verdict
/// are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictLabels {
    pub consistent: String,
    pub no_case: String,
    pub ambiguous_case: String,
    pub unknown_status: String,
    pub remediation_no_op: String,
    pub remediation_applied: String,
    pub error_aborted: String,
}

impl Default for VerdictLabels {
    fn default() -> Self {
        Self {
            consistent: "CONSISTENT".to_string(),
            no_case: "NO SUPPORT CASE".to_string(),
            ambiguous_case: "MORE THAN ONE SUPPORT CASE ({count})".to_string(),
            unknown_status: "SUPPORT CASE STATUS: {status}".to_string(),
            remediation_no_op: "REOPEN REQUESTED IN SUPPORT".to_string(),
            remediation_applied: "CONSISTENT (RULE {rule} APPLIED)".to_string(),
            error_aborted: "ERROR IN {operation}: {error}".to_string(),
        }
    }
}

impl VerdictLabels {
    pub fn spanish() -> Self {
        Self {
            consistent: "CONSISTENTE".to_string(),
            no_case: "SIN CASO EN CX".to_string(),
            ambiguous_case: "MAS DE UN CASO EN CX".to_string(),
            unknown_status: "CX STATUS: {status}".to_string(),
            remediation_no_op: "SE SOLICITA REAPERTURA EN CX".to_string(),
            remediation_applied: "CONSISTENTE".to_string(),
            error_aborted: "ERROR: {operation}: {error}".to_string(),
        }
    }

    pub fn from_preset(preset: LabelPreset) -> Self {
        match preset {
            LabelPreset::Default => Self::default(),
            LabelPreset::Es => Self::spanish(),
        }
    }

    /// Replaces the template for one verdict kind
    pub fn with_template(mut self, kind: VerdictKind, template: impl Into<String>) -> Self {
        *self.template_mut(kind) = template.into();
        self
    }

    pub fn template(&self, kind: VerdictKind) -> &str {
        match kind {
            VerdictKind::Consistent => &self.consistent,
            VerdictKind::NoCase => &self.no_case,
            VerdictKind::AmbiguousCase => &self.ambiguous_case,
            VerdictKind::UnknownStatus => &self.unknown_status,
            VerdictKind::RemediationNoOp => &self.remediation_no_op,
            VerdictKind::RemediationApplied => &self.remediation_applied,
            VerdictKind::ErrorAborted => &self.error_aborted,
        }
    }

    fn template_mut(&mut self, kind: VerdictKind) -> &mut String {
        match kind {
            VerdictKind::Consistent => &mut self.consistent,
            VerdictKind::NoCase => &mut self.no_case,
            VerdictKind::AmbiguousCase => &mut self.ambiguous_case,
            VerdictKind::UnknownStatus => &mut self.unknown_status,
            VerdictKind::RemediationNoOp => &mut self.remediation_no_op,
            VerdictKind::RemediationApplied => &mut self.remediation_applied,
            VerdictKind::ErrorAborted => &mut self.error_aborted,
        }
    }

    /// Renders the label of a verdict
    pub fn render(&self, verdict: &Verdict) -> String {
        let template = self.template(verdict.kind());
        match verdict {
            Verdict::Consistent { .. } | Verdict::NoCase => template.to_string(),
            Verdict::AmbiguousCase { case_count } => {
                template.replace("{count}", &case_count.to_string())
            }
            Verdict::UnknownStatus { status } => template.replace("{status}", status),
            Verdict::RemediationNoOp { generation } => {
                template.replace("{generation}", generation.as_str())
            }
            Verdict::RemediationApplied { generation, applied_rule } => template
                .replace("{generation}", generation.as_str())
                .replace("{rule}", applied_rule),
            Verdict::ErrorAborted { operation, error } => template
                .replace("{operation}", &operation.as_str().to_uppercase())
                .replace("{error}", error),
        }
    }

    /// Renders the `<id> -> <LABEL>` report line of an outcome
    pub fn report_line(&self, outcome: &ClaimOutcome) -> String {
        format!("{} -> {}", outcome.claim_id, self.render(&outcome.verdict))
    }
}
