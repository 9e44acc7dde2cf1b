//! Periodic status reporter
//!
//! Spawns a task that, on a fixed tick, re-fetches the balance of whichever
//! account the decision loop currently has active and logs a one-line
//! summary. It only holds a read-only view of the cursor and never calls
//! claim or start. Failures are logged here and never propagated.

use std::sync::Arc;
use std::time::Duration;

use blum_accounts::ActiveAccountView;
use blum_api::FarmingApi;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::driver::format_end_time;

/// What one report found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Status {
    Farming { account: String, end_time: i64 },
    NoFarming { account: String },
    Failed { account: String },
}

/// Spawn the reporter. It ticks every `interval` until `cancel` fires.
///
/// Returns a `JoinHandle` for the spawned task.
pub fn spawn_status_reporter(
    api: Arc<dyn FarmingApi>,
    view: ActiveAccountView,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick; the loop logs its own first cycle
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("status reporter stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }
            report_status(api.as_ref(), &view).await;
        }
    })
}

/// Fetch and log the status of the active account.
pub async fn report_status(api: &dyn FarmingApi, view: &ActiveAccountView) -> Status {
    let account = view.current();
    let label = account.label.clone();

    match api.balance(account.token.expose()).await {
        Ok(snapshot) => match snapshot.farming {
            Some(farming) => {
                info!(
                    account = %label,
                    balance = %snapshot.available_balance,
                    farm_balance = %farming.balance,
                    next_claim = %format_end_time(farming.end_time),
                    "status"
                );
                Status::Farming {
                    account: label,
                    end_time: farming.end_time,
                }
            }
            None => {
                warn!(account = %label, "status: no farming session");
                Status::NoFarming { account: label }
            }
        },
        Err(e) => {
            warn!(account = %label, error = %e, "status check failed");
            Status::Failed { account: label }
        }
    }
}
