//! Claim Deadline Reconciler - Batch Binary
//!
//! Reconciles the given claims and prints one `<id> -> <LABEL>` line per
//! claim on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Reconcile claims given on the command line
//! reconcile-claims 5012345678 5012345679
//!
//! # Reconcile claims listed in a file, four at a time, with Spanish labels
//! reconcile-claims --ids-file claims.txt --concurrency 4 --labels es
//! ```
//!
//! # Environment Variables
//!
//! * `RECONCILER_CLAIMS_API__BASE_URL` - Claims API base URL
//! * `RECONCILER_CASES_API__BASE_URL` - Support case API base URL
//! * `RECONCILER_HTTP__TIMEOUT_SECS` - Per-request timeout (default: 30)
//! * `RECONCILER_RECONCILER__CONCURRENCY` - Claims reconciled at once (default: 1)
//! * `RECONCILER_RECONCILER__PROBE_ERROR_POLICY` - abort or assume_current (default: abort)
//! * `RECONCILER_LABELS__PRESET` - default or es (default: default)
//! * `RECONCILER_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)
//! * `RECONCILER_LOG_FORMAT` - text or json (default: text)

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::ClaimId;
use domain_claims::{LabelPreset, ProbeErrorPolicy};
use interface_cli::{input, run_reconciliation, AppConfig, LogFormat};

#[derive(Parser)]
#[command(name = "reconcile-claims")]
#[command(version)]
#[command(about = "Reconcile claim action deadlines against support cases")]
struct Cli {
    /// Claim IDs to reconcile
    ids: Vec<ClaimId>,

    /// File with one claim ID per line; blank lines and # comments are ignored
    #[arg(long, value_name = "PATH")]
    ids_file: Option<PathBuf>,

    /// Claims reconciled at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Reaction to a failed generation probe: abort or assume-current
    #[arg(long)]
    probe_error_policy: Option<ProbeErrorPolicy>,

    /// Report wording: default or es
    #[arg(long)]
    labels: Option<LabelPreset>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(concurrency) = cli.concurrency {
        config.reconciler.concurrency = concurrency;
    }
    if let Some(policy) = cli.probe_error_policy {
        config.reconciler.probe_error_policy = policy;
    }
    if let Some(preset) = cli.labels {
        config.labels.preset = preset;
    }
    config.validate()?;

    init_tracing(&config.log_level, config.log_format);

    let ids = input::collect_ids(cli.ids, cli.ids_file.as_deref())?;

    tracing::info!(
        claims = ids.len(),
        concurrency = config.reconciler.concurrency,
        probe_error_policy = ?config.reconciler.probe_error_policy,
        claims_api = %config.claims_api.base_url,
        cases_api = %config.cases_api.base_url,
        "Starting claim deadline reconciliation"
    );

    let mut stdout = std::io::stdout().lock();
    let report = run_reconciliation(&config, &ids, &mut stdout).await?;

    tracing::info!(
        run_id = %report.run_id,
        claims = report.outcomes.len(),
        needs_attention = report.needs_attention(),
        "Reconciliation complete"
    );
    Ok(())
}

/// Initializes the tracing subscriber, writing to stderr
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
