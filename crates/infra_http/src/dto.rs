//! Wire formats of the claims and support APIs
//!
//! Only the fields the reconciler reads are modelled; everything else in
//! the payloads is ignored. Missing lists decode as empty, and a missing or
//! `null` action deadline decodes as an undated action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_claims::{Action, Claim, Player, RemediationResult, SupportCase};

/// Body of `GET /v1/claims/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimResponse {
    #[serde(default)]
    pub players: Vec<PlayerDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDto {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub available_actions: Vec<ActionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionDto {
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mandatory: bool,
}

impl ClaimResponse {
    /// The claims API does not echo the identifier, so the caller supplies it
    pub fn into_claim(self, id: ClaimId) -> Claim {
        let players = self
            .players
            .into_iter()
            .map(|player| {
                let actions = player
                    .available_actions
                    .into_iter()
                    .map(|action| match action.due_date {
                        Some(due_date) => Action::new(due_date, action.mandatory),
                        None => Action::undated(action.mandatory),
                    })
                    .collect();
                Player::new(player.role, actions)
            })
            .collect();
        Claim::new(id, players)
    }
}

/// Body of `GET /cx/cases/search/v2`
#[derive(Debug, Clone, Deserialize)]
pub struct CaseSearchResponse {
    #[serde(default)]
    pub results: Vec<CaseDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseDto {
    pub status: String,
}

impl CaseSearchResponse {
    pub fn into_cases(self) -> Vec<SupportCase> {
        self.results
            .into_iter()
            .map(|case| SupportCase::new(case.status))
            .collect()
    }
}

/// One entry of a remediation response
#[derive(Debug, Clone, Deserialize)]
pub struct RemediationDto {
    pub applied_rule: String,
}

impl From<RemediationDto> for RemediationResult {
    fn from(dto: RemediationDto) -> Self {
        RemediationResult::new(dto.applied_rule)
    }
}

/// Body of the batched legacy reprocessing request
#[derive(Debug, Clone, Serialize)]
pub struct ClaimIdsRequest {
    pub claim_ids: Vec<u64>,
}

impl ClaimIdsRequest {
    pub fn new(ids: &[ClaimId]) -> Self {
        Self {
            claim_ids: ids.iter().map(|id| id.value()).collect(),
        }
    }
}
