//! Support Case API Adapter
//!
//! Searches the support system for the cases referencing a claim via
//! `GET /cx/cases/search/v2?claim_id={id}`.

use async_trait::async_trait;
use tracing::instrument;

use core_kernel::{ClaimId, DomainPort, ExternalSystemConfig, PortError};
use domain_claims::{CaseSearchPort, SupportCase};

use crate::client::{HttpClient, RestEndpoint};
use crate::dto::CaseSearchResponse;
use crate::error::HttpError;

/// REST adapter for the support system
#[derive(Debug, Clone)]
pub struct SupportCaseApiAdapter {
    endpoint: RestEndpoint,
}

impl SupportCaseApiAdapter {
    pub fn new(http: HttpClient, config: ExternalSystemConfig) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: RestEndpoint::new(http, config, "support-cases-api")?,
        })
    }
}

impl DomainPort for SupportCaseApiAdapter {}

#[async_trait]
impl CaseSearchPort for SupportCaseApiAdapter {
    #[instrument(skip(self), fields(service = "support-cases-api"))]
    async fn search_cases(&self, id: ClaimId) -> Result<Vec<SupportCase>, PortError> {
        let request = self
            .endpoint
            .get("/cx/cases/search/v2")
            .query(&[("claim_id", id.value())]);
        let response: CaseSearchResponse = self.endpoint.fetch_json(request, "case search", id).await?;
        Ok(response.into_cases())
    }
}
