//! CLI configuration
//!
//! Loaded from environment variables prefixed with `RECONCILER_`, nesting
//! with `__`, on top of defaults that point at the production hosts:
//!
//! ```text
//! RECONCILER_CLAIMS_API__BASE_URL=https://claims.internal
//! RECONCILER_HTTP__TIMEOUT_SECS=10
//! RECONCILER_RECONCILER__CONCURRENCY=4
//! RECONCILER_RECONCILER__PROBE_ERROR_POLICY=assume_current
//! RECONCILER_LABELS__PRESET=es
//! RECONCILER_LABELS__OVERRIDES__NO_CASE="NO CASE"
//! RECONCILER_LOG_LEVEL=debug
//! RECONCILER_LOG_FORMAT=json
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use core_kernel::ExternalSystemConfig;
use domain_claims::{LabelPreset, ProbeErrorPolicy, ReconcilerSettings, VerdictKind, VerdictLabels};
use infra_http::config::{default_cases_api, default_claims_api};
use infra_http::HttpClientConfig;

use crate::error::CliError;

/// Prefix of every environment variable read by the CLI
pub const ENV_PREFIX: &str = "RECONCILER";

/// Output format of the log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Orchestrator settings as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    pub concurrency: usize,
    pub call_timeout_secs: u64,
    pub probe_error_policy: ProbeErrorPolicy,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        let settings = ReconcilerSettings::default();
        Self {
            concurrency: settings.concurrency,
            call_timeout_secs: settings.call_timeout.as_secs(),
            probe_error_policy: settings.probe_error_policy,
        }
    }
}

/// Report wording
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelsConfig {
    pub preset: LabelPreset,
    /// Templates replacing the preset's, keyed by verdict kind
    #[serde(default)]
    pub overrides: BTreeMap<VerdictKind, String>,
}

/// Complete CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub claims_api: ExternalSystemConfig,
    pub cases_api: ExternalSystemConfig,
    pub http: HttpClientConfig,
    pub reconciler: ReconcilerConfig,
    pub labels: LabelsConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            claims_api: default_claims_api(),
            cases_api: default_cases_api(),
            http: HttpClientConfig::default(),
            reconciler: ReconcilerConfig::default(),
            labels: LabelsConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, CliError> {
        Self::load(Self::environment())
    }

    /// The environment source, before any variables are read
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Loads configuration from the given environment source over the defaults
    pub fn load(environment: config::Environment) -> Result<Self, CliError> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        if self.reconciler.concurrency == 0 {
            return Err(CliError::invalid_setting("reconciler.concurrency must be at least 1"));
        }
        if self.reconciler.call_timeout_secs == 0 {
            return Err(CliError::invalid_setting("reconciler.call_timeout_secs must be at least 1"));
        }
        if self.http.timeout_secs == 0 {
            return Err(CliError::invalid_setting("http.timeout_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn reconciler_settings(&self) -> Result<ReconcilerSettings, CliError> {
        self.validate()?;
        Ok(ReconcilerSettings {
            concurrency: self.reconciler.concurrency,
            call_timeout: Duration::from_secs(self.reconciler.call_timeout_secs),
            probe_error_policy: self.reconciler.probe_error_policy,
        })
    }

    /// The preset's label table with configured overrides applied
    pub fn verdict_labels(&self) -> VerdictLabels {
        self.labels
            .overrides
            .iter()
            .fold(VerdictLabels::from_preset(self.labels.preset), |labels, (kind, template)| {
                labels.with_template(*kind, template.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reconciler_settings().unwrap(), ReconcilerSettings::default());
        assert_eq!(config.verdict_labels(), VerdictLabels::default());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = AppConfig::default();
        config.reconciler.concurrency = 0;
        assert!(matches!(config.validate(), Err(CliError::InvalidSetting(_))));
    }

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let mut config = AppConfig::default();
        config.labels.preset = LabelPreset::Es;
        config
            .labels
            .overrides
            .insert(VerdictKind::NoCase, "NO CASE".to_string());

        let labels = config.verdict_labels();
        assert_eq!(labels.template(VerdictKind::NoCase), "NO CASE");
        assert_eq!(labels.template(VerdictKind::Consistent), "CONSISTENTE");
    }
}
