//! Claims API Adapter
//!
//! Implements claim lookup, the generation probe and both remediation
//! endpoints against the claims system.
//!
//! | Port call | Request |
//! |---|---|
//! | `fetch_claim` | `GET /v1/claims/{id}` |
//! | `probe_generation` | `GET /v1/claims/{id}/state` (200 current, 404 legacy) |
//! | `reprocess_legacy` | `POST /claims/actions/deadline/reprocess` with `{"claim_ids":[..]}` |
//! | `process_current` | `POST /post-purchase/state/deadline/process-claim/{id}` |

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, ExternalSystemConfig, PortError};
use domain_claims::{
    Claim, ClaimLookupPort, Generation, GenerationProbePort, RemediationPort, RemediationResult,
};

use crate::client::{HttpClient, RestEndpoint};
use crate::dto::{ClaimIdsRequest, ClaimResponse, RemediationDto};
use crate::error::HttpError;

const LEGACY_REPROCESS_PATH: &str = "/claims/actions/deadline/reprocess";

/// REST adapter for the claims system
#[derive(Debug, Clone)]
pub struct ClaimsApiAdapter {
    endpoint: RestEndpoint,
}

impl ClaimsApiAdapter {
    pub fn new(http: HttpClient, config: ExternalSystemConfig) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: RestEndpoint::new(http, config, "claims-api")?,
        })
    }

    async fn remediation_results(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
        entity_id: impl std::fmt::Display,
    ) -> Result<Vec<RemediationResult>, PortError> {
        let results: Vec<RemediationDto> =
            self.endpoint.fetch_json(request, operation, entity_id).await?;
        Ok(results.into_iter().map(RemediationResult::from).collect())
    }
}

impl DomainPort for ClaimsApiAdapter {}

#[async_trait]
impl ClaimLookupPort for ClaimsApiAdapter {
    #[instrument(skip(self), fields(service = "claims-api"))]
    async fn fetch_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        let request = self.endpoint.get(&format!("/v1/claims/{}", id));
        let response: ClaimResponse = self.endpoint.fetch_json(request, "claim lookup", id).await?;
        Ok(response.into_claim(id))
    }
}

#[async_trait]
impl GenerationProbePort for ClaimsApiAdapter {
    #[instrument(skip(self), fields(service = "claims-api"))]
    async fn probe_generation(&self, id: ClaimId) -> Result<Generation, PortError> {
        let request = self.endpoint.get(&format!("/v1/claims/{}/state", id));
        let response = self.endpoint.send(request, "generation probe").await?;

        match response.status() {
            StatusCode::OK => Ok(Generation::Current),
            StatusCode::NOT_FOUND => Ok(Generation::Legacy),
            status => {
                debug!(status = status.as_u16(), "Generation probe answered unexpectedly");
                Err(PortError::UnexpectedStatus {
                    service: self.endpoint.service().to_string(),
                    status: status.as_u16(),
                })
            }
        }
    }
}

#[async_trait]
impl RemediationPort for ClaimsApiAdapter {
    #[instrument(skip(self), fields(service = "claims-api"))]
    async fn reprocess_legacy(&self, ids: &[ClaimId]) -> Result<Vec<RemediationResult>, PortError> {
        let request = self
            .endpoint
            .post(LEGACY_REPROCESS_PATH)
            .json(&ClaimIdsRequest::new(ids));
        let label = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.remediation_results(request, "legacy reprocess", label).await
    }

    #[instrument(skip(self), fields(service = "claims-api"))]
    async fn process_current(&self, id: ClaimId) -> Result<Vec<RemediationResult>, PortError> {
        let request = self
            .endpoint
            .post(&format!("/post-purchase/state/deadline/process-claim/{}", id));
        self.remediation_results(request, "current process", id).await
    }
}
