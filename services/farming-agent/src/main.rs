//! Blum farming agent
//!
//! Single-binary service that:
//! 1. Loads one bearer token per line from the credentials file
//! 2. Polls the active account's farming session
//! 3. Claims finished sessions, rotates to the next account, starts farming there
//! 4. Optionally logs a periodic status line for the active account

mod config;
mod driver;
mod error;
mod metrics;
mod reporter;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use blum_accounts::{AccountSet, ActiveAccount};
use blum_api::{BlumClient, FarmingApi};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};
use crate::driver::{Driver, Schedule};

/// Initialize tracing with LOG_LEVEL / RUST_LOG support.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let (config_path, explicit) = Config::resolve_path(cli_config_path);
    let config = Config::load_or_default(&config_path, explicit)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    init_tracing(config.telemetry.log_format);
    info!(
        path = %config_path.display(),
        token_file = %config.accounts.token_file.display(),
        start_account = %config.accounts.start_account,
        identity_policy = config.api.identity_policy.label(),
        "configuration loaded"
    );

    if let Some(addr) = config.telemetry.metrics_listen_addr {
        metrics::install_exporter(addr)?;
        info!(%addr, "prometheus exporter listening");
    }

    let accounts = Arc::new(
        AccountSet::load(&config.accounts.token_file)
            .await
            .context("failed to load credentials")?,
    );
    let start = accounts
        .index_of(&config.accounts.start_account)
        .context("invalid start_account")?;

    let client = BlumClient::new(config.api.endpoints(), config.api.identity_policy)
        .context("failed to build HTTP client")?;
    let api: Arc<dyn FarmingApi> = Arc::new(client);

    let cancel = CancellationToken::new();
    let active = ActiveAccount::new(accounts, start);

    let reporter = config.schedule.status_interval().map(|interval| {
        info!(interval_secs = interval.as_secs(), "status reporter enabled");
        reporter::spawn_status_reporter(api.clone(), active.view(), interval, cancel.clone())
    });

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    let driver = Driver::new(api, active, Schedule::from(&config.schedule), cancel.clone());
    let result = driver.run().await;

    // Stop the reporter whichever way the loop ended
    cancel.cancel();
    if let Some(handle) = reporter {
        if let Err(e) = handle.await {
            error!(error = %e, "status reporter panicked");
        }
    }

    match result {
        Ok(()) => {
            info!("shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "decision loop ended");
            Err(e.into())
        }
    }
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
