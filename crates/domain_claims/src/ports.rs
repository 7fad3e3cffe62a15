//! Claims Domain Ports
//!
//! The reconciler consults two backend systems through four ports. Each port
//! is a trait so the orchestrator can run against the REST adapters in
//! `infra_http` or against the in-memory [`mock::MockBackend`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{Backends, Reconciler, ReconcilerSettings};
//! use std::sync::Arc;
//!
//! let claims = Arc::new(ClaimsApiAdapter::new(&http, claims_config));
//! let backends = Backends {
//!     claims: claims.clone(),
//!     cases: Arc::new(SupportCaseApiAdapter::new(&http, cases_config)),
//!     probe: claims.clone(),
//!     remediation: claims,
//! };
//! let reconciler = Reconciler::new(backends, ReconcilerSettings::default());
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{ClaimId, DomainPort, PortError};

use crate::claim::Claim;
use crate::generation::Generation;
use crate::remediation::RemediationResult;
use crate::support_case::SupportCase;

/// Retrieves claim detail from the claims system
#[async_trait]
pub trait ClaimLookupPort: DomainPort {
    async fn fetch_claim(&self, id: ClaimId) -> Result<Claim, PortError>;
}

/// Searches the support system for cases referencing a claim
#[async_trait]
pub trait CaseSearchPort: DomainPort {
    async fn search_cases(&self, id: ClaimId) -> Result<Vec<SupportCase>, PortError>;
}

/// Determines which processing generation owns a claim
///
/// Implementations answer `Current` when the current-generation resource
/// exists and `Legacy` when it does not. Any other answer is an error.
#[async_trait]
pub trait GenerationProbePort: DomainPort {
    async fn probe_generation(&self, id: ClaimId) -> Result<Generation, PortError>;
}

/// Triggers deadline reprocessing
#[async_trait]
pub trait RemediationPort: DomainPort {
    /// Batched legacy reprocessing for the given claims
    async fn reprocess_legacy(&self, ids: &[ClaimId]) -> Result<Vec<RemediationResult>, PortError>;

    /// Per-claim reprocessing on the current generation
    async fn process_current(&self, id: ClaimId) -> Result<Vec<RemediationResult>, PortError>;
}

/// The set of collaborators one reconciler talks to
#[derive(Clone)]
pub struct Backends {
    pub claims: Arc<dyn ClaimLookupPort>,
    pub cases: Arc<dyn CaseSearchPort>,
    pub probe: Arc<dyn GenerationProbePort>,
    pub remediation: Arc<dyn RemediationPort>,
}

impl Backends {
    /// Uses one value for every port
    pub fn from_single<T>(backend: Arc<T>) -> Self
    where
        T: ClaimLookupPort + CaseSearchPort + GenerationProbePort + RemediationPort,
    {
        Self {
            claims: backend.clone(),
            cases: backend.clone(),
            probe: backend.clone(),
            remediation: backend,
        }
    }
}

/// Mock implementation of every port for testing
///
/// Responses are configured per claim before the backend is shared. Every
/// call is recorded so tests can assert which paths were taken.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::RwLock;

    /// A call received by the mock backend
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum BackendCall {
        ClaimLookup(ClaimId),
        CaseSearch(ClaimId),
        GenerationProbe(ClaimId),
        LegacyReprocess(Vec<ClaimId>),
        CurrentProcess(ClaimId),
    }

    impl BackendCall {
        pub fn claim_ids(&self) -> Vec<ClaimId> {
            match self {
                BackendCall::ClaimLookup(id)
                | BackendCall::CaseSearch(id)
                | BackendCall::GenerationProbe(id)
                | BackendCall::CurrentProcess(id) => vec![*id],
                BackendCall::LegacyReprocess(ids) => ids.clone(),
            }
        }
    }

    /// Failure the mock produces instead of a response
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockFault {
        Connection,
        Timeout,
        Decode,
        Status(u16),
    }

    impl MockFault {
        fn to_error(self, operation: &str) -> PortError {
            match self {
                MockFault::Connection => PortError::connection(format!("{} refused", operation)),
                MockFault::Timeout => PortError::Timeout {
                    operation: operation.to_string(),
                    duration_ms: 30_000,
                },
                MockFault::Decode => {
                    PortError::transformation(format!("{} returned malformed body", operation))
                }
                MockFault::Status(status) => PortError::UnexpectedStatus {
                    service: operation.to_string(),
                    status,
                },
            }
        }
    }

    type Scripted<T> = HashMap<ClaimId, Result<T, MockFault>>;

    /// In-memory backend implementing all four ports
    #[derive(Debug, Default)]
    pub struct MockBackend {
        claims: Scripted<Claim>,
        cases: Scripted<Vec<SupportCase>>,
        generations: Scripted<Generation>,
        remediations: Scripted<Vec<RemediationResult>>,
        latency: Option<Duration>,
        calls: RwLock<Vec<BackendCall>>,
    }

    impl MockBackend {
        /// Creates a new mock backend
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_claim(mut self, claim: Claim) -> Self {
            self.claims.insert(claim.id, Ok(claim));
            self
        }

        pub fn with_claim_fault(mut self, id: ClaimId, fault: MockFault) -> Self {
            self.claims.insert(id, Err(fault));
            self
        }

        pub fn with_cases(mut self, id: ClaimId, cases: Vec<SupportCase>) -> Self {
            self.cases.insert(id, Ok(cases));
            self
        }

        pub fn with_cases_fault(mut self, id: ClaimId, fault: MockFault) -> Self {
            self.cases.insert(id, Err(fault));
            self
        }

        pub fn with_generation(mut self, id: ClaimId, generation: Generation) -> Self {
            self.generations.insert(id, Ok(generation));
            self
        }

        pub fn with_probe_fault(mut self, id: ClaimId, fault: MockFault) -> Self {
            self.generations.insert(id, Err(fault));
            self
        }

        /// Answer of either remediation endpoint for this claim
        pub fn with_remediation(mut self, id: ClaimId, results: Vec<RemediationResult>) -> Self {
            self.remediations.insert(id, Ok(results));
            self
        }

        pub fn with_remediation_fault(mut self, id: ClaimId, fault: MockFault) -> Self {
            self.remediations.insert(id, Err(fault));
            self
        }

        /// Delays every response
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Every call received so far, in arrival order
        pub async fn calls(&self) -> Vec<BackendCall> {
            self.calls.read().await.clone()
        }

        /// Calls received for one claim
        pub async fn calls_for(&self, id: ClaimId) -> Vec<BackendCall> {
            self.calls
                .read()
                .await
                .iter()
                .filter(|call| call.claim_ids().contains(&id))
                .cloned()
                .collect()
        }

        async fn record(&self, call: BackendCall) {
            self.calls.write().await.push(call);
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
        }

        fn answer<T: Clone>(
            scripted: &Scripted<T>,
            id: ClaimId,
            operation: &str,
        ) -> Result<T, PortError> {
            match scripted.get(&id) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(fault)) => Err(fault.to_error(operation)),
                None => Err(PortError::not_found(operation, id)),
            }
        }
    }

    impl DomainPort for MockBackend {}

    #[async_trait]
    impl ClaimLookupPort for MockBackend {
        async fn fetch_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.record(BackendCall::ClaimLookup(id)).await;
            Self::answer(&self.claims, id, "claim lookup")
        }
    }

    #[async_trait]
    impl CaseSearchPort for MockBackend {
        async fn search_cases(&self, id: ClaimId) -> Result<Vec<SupportCase>, PortError> {
            self.record(BackendCall::CaseSearch(id)).await;
            match self.cases.get(&id) {
                Some(Ok(cases)) => Ok(cases.clone()),
                Some(Err(fault)) => Err(fault.to_error("case search")),
                None => Ok(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationProbePort for MockBackend {
        async fn probe_generation(&self, id: ClaimId) -> Result<Generation, PortError> {
            self.record(BackendCall::GenerationProbe(id)).await;
            Self::answer(&self.generations, id, "generation probe")
        }
    }

    #[async_trait]
    impl RemediationPort for MockBackend {
        async fn reprocess_legacy(&self, ids: &[ClaimId]) -> Result<Vec<RemediationResult>, PortError> {
            self.record(BackendCall::LegacyReprocess(ids.to_vec())).await;
            let mut results = Vec::new();
            for id in ids {
                results.extend(Self::answer(&self.remediations, *id, "legacy reprocess")?);
            }
            Ok(results)
        }

        async fn process_current(&self, id: ClaimId) -> Result<Vec<RemediationResult>, PortError> {
            self.record(BackendCall::CurrentProcess(id)).await;
            Self::answer(&self.remediations, id, "current process")
        }
    }
}
