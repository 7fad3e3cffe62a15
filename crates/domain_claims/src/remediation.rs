//! Remediation results and their classification

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Applied-rule value meaning the remediation endpoint changed nothing
pub const NO_RULE_APPLIED: &str = "none";

/// One entry returned by a remediation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationResult {
    pub applied_rule: String,
}

impl RemediationResult {
    pub fn new(applied_rule: impl Into<String>) -> Self {
        Self {
            applied_rule: applied_rule.into(),
        }
    }

    pub fn no_op() -> Self {
        Self::new(NO_RULE_APPLIED)
    }
}

/// Classified outcome of a remediation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationOutcome {
    /// No rule fired; the support case needs to be reopened
    NoOp,
    /// A rule fired and corrected the claim
    Applied { rule: String },
}

/// Classifies the results of a remediation call by their first entry
pub fn classify_remediation(results: &[RemediationResult]) -> Result<RemediationOutcome, ReconcileError> {
    let first = results
        .first()
        .ok_or_else(|| ReconcileError::decode("remediation endpoint returned an empty result list"))?;

    if first.applied_rule == NO_RULE_APPLIED {
        Ok(RemediationOutcome::NoOp)
    } else {
        Ok(RemediationOutcome::Applied {
            rule: first.applied_rule.clone(),
        })
    }
}
