//! Claim Reconciliation CLI
//!
//! Library side of the `reconcile-claims` binary: configuration loading,
//! claim-ID input, and the line-oriented verdict report.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::{config::AppConfig, run_reconciliation};
//!
//! let config = AppConfig::from_env()?;
//! let ids = interface_cli::input::read_ids_file("claims.txt")?;
//! let report = run_reconciliation(&config, &ids, &mut std::io::stdout()).await?;
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod report;

use std::io::Write;

use core_kernel::ClaimId;
use domain_claims::{BatchReport, Reconciler};
use infra_http::HttpClient;

pub use config::{AppConfig, LogFormat};
pub use error::CliError;
pub use report::ReportWriter;

/// Builds the REST-backed reconciler described by the configuration
pub fn build_reconciler(config: &AppConfig) -> Result<Reconciler, CliError> {
    let http = HttpClient::new(&config.http)?;
    let backends = infra_http::backends(http, config.claims_api.clone(), config.cases_api.clone())?;
    Ok(Reconciler::new(backends, config.reconciler_settings()?))
}

/// Reconciles every claim, writing one report line per claim as verdicts arrive
pub async fn run_reconciliation<W: Write>(
    config: &AppConfig,
    ids: &[ClaimId],
    out: &mut W,
) -> Result<BatchReport, CliError> {
    let reconciler = build_reconciler(config)?;
    let settings = reconciler.settings();
    tracing::debug!(
        concurrency = settings.concurrency,
        call_timeout_ms = settings.call_timeout.as_millis() as u64,
        probe_error_policy = ?settings.probe_error_policy,
        "Reconciler ready"
    );
    let mut writer = ReportWriter::new(config.verdict_labels(), out);

    let report = reconciler
        .run_batch_with(ids, |outcome| writer.write_outcome(outcome))
        .await;
    let lines = writer.finish()?;
    tracing::debug!(lines, "Report written");

    for (kind, count) in report.tally() {
        tracing::info!(run_id = %report.run_id, verdict = %kind, count, "Verdict tally");
    }
    Ok(report)
}
