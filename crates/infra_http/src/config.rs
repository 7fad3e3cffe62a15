//! HTTP client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use core_kernel::ExternalSystemConfig;

/// Base URL shared by the production claims and support APIs
pub const PRODUCTION_BASE_URL: &str = "https://internal-api.mercadolibre.com";

/// Settings of the shared HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Total time allowed for one request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Time allowed to establish a connection, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl HttpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Production claims API with its caller-scope header
pub fn default_claims_api() -> ExternalSystemConfig {
    ExternalSystemConfig::new(PRODUCTION_BASE_URL).with_header("X-Caller-Scopes", "admin")
}

/// Production support case API with its admin header
pub fn default_cases_api() -> ExternalSystemConfig {
    ExternalSystemConfig::new(PRODUCTION_BASE_URL).with_header("X-Admin-Id", "admin")
}
