//! Decision loop
//!
//! One cycle per iteration, strictly sequential:
//! 1. identity check for the active account (rejected -> run ends)
//! 2. fetch balance and farming status
//! 3. `decide()`: claim + rotate + start, wait for the session end, or
//!    rotate away from an account with no session
//! 4. sleep, racing the cancellation token
//!
//! Any API error in a cycle is logged and followed by the error cooldown; the
//! next cycle retries from the same account. `decide()` is a pure function so
//! the branching can be tested without I/O.

use std::sync::Arc;
use std::time::Duration;

use blum_accounts::ActiveAccount;
use blum_api::{FarmingApi, FarmingState};
use chrono::{DateTime, Local, TimeZone};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;
use crate::error::{Error, Result};
use crate::metrics;

/// Human format for session end times, e.g. `24/05/27 08:53:20`.
const END_TIME_FORMAT: &str = "%y/%m/%d %H:%M:%S";

/// Outcome of inspecting one balance snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Farming was never started on this account
    NoFarming,
    /// Session ended: claim, rotate, start the next account
    Claim,
    /// Session still running until `end_time` (unix ms)
    Wait { wait: Duration, end_time: i64 },
}

/// Decide what to do with the farming state at `now_millis`. Pure: no I/O.
pub fn decide(farming: Option<&FarmingState>, now_millis: i64) -> Decision {
    match farming {
        None => Decision::NoFarming,
        Some(f) if f.is_complete(now_millis) => Decision::Claim,
        Some(f) => Decision::Wait {
            wait: wait_until(f.end_time, now_millis),
            end_time: f.end_time,
        },
    }
}

/// `max(end_time - now, 0)` as a duration.
pub fn wait_until(end_time: i64, now_millis: i64) -> Duration {
    Duration::from_millis(end_time.saturating_sub(now_millis).max(0) as u64)
}

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Format a unix-ms timestamp in `tz`; falls back to the raw value when out of range.
pub fn format_timestamp<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.with_timezone(tz).format(END_TIME_FORMAT).to_string(),
        None => millis.to_string(),
    }
}

/// Format a unix-ms timestamp in the local timezone.
pub fn format_end_time(millis: i64) -> String {
    format_timestamp(millis, &Local)
}

/// Delays applied between cycles.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub error_cooldown: Duration,
    pub post_claim_delay: Duration,
    pub no_farming_delay: Duration,
}

impl From<&ScheduleConfig> for Schedule {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            error_cooldown: config.error_cooldown(),
            post_claim_delay: config.post_claim_delay(),
            no_farming_delay: config.no_farming_delay(),
        }
    }
}

/// What the run loop does after a cycle that didn't error.
#[derive(Debug)]
enum CycleOutcome {
    Sleep(Duration),
    Rejected { account: String },
}

/// Drives the active account through check / claim / start / wait cycles.
pub struct Driver {
    api: Arc<dyn FarmingApi>,
    active: ActiveAccount,
    schedule: Schedule,
    cancel: CancellationToken,
}

impl Driver {
    pub fn new(
        api: Arc<dyn FarmingApi>,
        active: ActiveAccount,
        schedule: Schedule,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            active,
            schedule,
            cancel,
        }
    }

    /// Run until the active credential is rejected or the token is cancelled.
    ///
    /// Cancellation returns `Ok(())`; a rejected credential returns
    /// `Error::CredentialRejected`.
    pub async fn run(mut self) -> Result<()> {
        info!(account = %self.active.current().label, "decision loop started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let delay = match self.cycle().await {
                Ok(CycleOutcome::Sleep(delay)) => delay,
                Ok(CycleOutcome::Rejected { account }) => {
                    metrics::record_cycle_error("credential");
                    return Err(Error::CredentialRejected { account });
                }
                Err(e) => {
                    metrics::record_cycle_error(e.kind());
                    error!(
                        account = %self.active.current().label,
                        kind = e.kind(),
                        error = %e,
                        retry_in_secs = self.schedule.error_cooldown.as_secs(),
                        "cycle failed"
                    );
                    self.schedule.error_cooldown
                }
            };

            if !self.sleep(delay).await {
                break;
            }
        }

        info!("decision loop stopped");
        Ok(())
    }

    /// Sleep for `delay`; false if cancelled first.
    async fn sleep(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    async fn cycle(&mut self) -> blum_api::Result<CycleOutcome> {
        let account = self.active.current().clone();
        let token = account.token.expose();

        if !self.api.check_identity(token).await {
            warn!(account = %account.label, "token is invalid, stopping");
            return Ok(CycleOutcome::Rejected {
                account: account.label,
            });
        }

        let snapshot = self.api.balance(token).await?;

        match decide(snapshot.farming.as_ref(), now_millis()) {
            Decision::NoFarming => {
                warn!(
                    account = %account.label,
                    retry_in_secs = self.schedule.no_farming_delay.as_secs(),
                    "no farming session found, moving to next account"
                );
                self.active.rotate();
                metrics::record_rotation();
                Ok(CycleOutcome::Sleep(self.schedule.no_farming_delay))
            }
            Decision::Claim => {
                info!(account = %account.label, "farming session has ended, claiming");
                let ack = self.api.claim(token).await?;
                metrics::record_claim(&account.label);
                info!(account = %account.label, response = %ack, "claim response");

                let next = self.active.rotate().clone();
                metrics::record_rotation();

                // The new session belongs to the account we just rotated to.
                let ack = self.api.start(next.token.expose()).await?;
                metrics::record_start(&next.label);
                info!(account = %next.label, response = %ack, "start response");

                Ok(CycleOutcome::Sleep(self.schedule.post_claim_delay))
            }
            Decision::Wait { wait, end_time } => {
                let farm_balance = snapshot
                    .farming
                    .as_ref()
                    .map(|f| f.balance.as_str())
                    .unwrap_or_default();
                info!(
                    account = %account.label,
                    balance = %snapshot.available_balance,
                    farm_balance,
                    next_claim = %format_end_time(end_time),
                    wait_secs = wait.as_secs(),
                    "farming is still in progress"
                );
                Ok(CycleOutcome::Sleep(wait))
            }
        }
    }
}
