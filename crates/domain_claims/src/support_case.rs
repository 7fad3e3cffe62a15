//! Support cases and their classification

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status of a support case
///
/// Only `OPENED` and `CLOSED` drive decisions. Any other value is kept
/// verbatim so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    Opened,
    Closed,
    Other(String),
}

impl CaseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CaseStatus::Opened => "OPENED",
            CaseStatus::Closed => "CLOSED",
            CaseStatus::Other(status) => status,
        }
    }
}

impl From<&str> for CaseStatus {
    fn from(value: &str) -> Self {
        match value {
            "OPENED" => CaseStatus::Opened,
            "CLOSED" => CaseStatus::Closed,
            other => CaseStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for CaseStatus {
    fn from(value: String) -> Self {
        CaseStatus::from(value.as_str())
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CaseStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(CaseStatus::from(s))
    }
}

/// A support case correlated to a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportCase {
    pub status: CaseStatus,
}

impl SupportCase {
    pub fn new(status: impl Into<CaseStatus>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Outcome of inspecting the support cases of a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseClassification {
    /// No case tracks the claim
    NoCase,
    /// More than one case matched; the business rule expects exactly one
    AmbiguousCase { count: usize },
    /// The single case is open, so someone is already handling the claim
    OpenAndTracked,
    /// The single case is closed while the deadline lapsed
    ClosedNeedsRemediation,
    /// The single case carries a status outside OPENED/CLOSED
    UnknownStatus { status: String },
}

/// Classifies a support case search result
pub fn classify_cases(cases: &[SupportCase]) -> CaseClassification {
    match cases {
        [] => CaseClassification::NoCase,
        [case] => match &case.status {
            CaseStatus::Opened => CaseClassification::OpenAndTracked,
            CaseStatus::Closed => CaseClassification::ClosedNeedsRemediation,
            CaseStatus::Other(status) => CaseClassification::UnknownStatus {
                status: status.clone(),
            },
        },
        many => CaseClassification::AmbiguousCase { count: many.len() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_passthrough() {
        let status = CaseStatus::from("PENDING_REVIEW");
        assert_eq!(status, CaseStatus::Other("PENDING_REVIEW".to_string()));
        assert_eq!(status.to_string(), "PENDING_REVIEW");
    }

    #[test]
    fn test_status_matching_is_exact() {
        assert_eq!(CaseStatus::from("opened"), CaseStatus::Other("opened".to_string()));
    }

    #[test]
    fn test_classify_single_closed() {
        let cases = vec![SupportCase::new("CLOSED")];
        assert_eq!(classify_cases(&cases), CaseClassification::ClosedNeedsRemediation);
    }

    #[test]
    fn test_classify_many_ignores_status() {
        let cases = vec![SupportCase::new("OPENED"), SupportCase::new("OPENED")];
        assert_eq!(classify_cases(&cases), CaseClassification::AmbiguousCase { count: 2 });
    }
}
