//! REST adapters implementing the reconciler's ports

mod claims_api;
mod support_cases;

pub use claims_api::ClaimsApiAdapter;
pub use support_cases::SupportCaseApiAdapter;

use std::sync::Arc;

use core_kernel::ExternalSystemConfig;
use domain_claims::Backends;

use crate::client::HttpClient;
use crate::error::HttpError;

/// Wires both REST adapters into the reconciler's collaborator set
pub fn backends(
    http: HttpClient,
    claims_api: ExternalSystemConfig,
    cases_api: ExternalSystemConfig,
) -> Result<Backends, HttpError> {
    let claims = Arc::new(ClaimsApiAdapter::new(http.clone(), claims_api)?);
    let cases = Arc::new(SupportCaseApiAdapter::new(http, cases_api)?);

    Ok(Backends {
        claims: claims.clone(),
        cases,
        probe: claims.clone(),
        remediation: claims,
    })
}
