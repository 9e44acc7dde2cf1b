//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! Every section is optional; an empty file yields the production defaults.
//! Tokens never live in the TOML: it only names the credentials file.

use blum_api::{Endpoints, IdentityPolicy};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var overriding `accounts.token_file`
pub const TOKEN_FILE_ENV: &str = "BLUM_TOKEN_FILE";

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "blum-farming-agent.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Credentials file and starting account
#[derive(Debug, Deserialize)]
pub struct AccountsConfig {
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
    #[serde(default = "default_start_account")]
    pub start_account: String,
}

/// Remote hosts and identity policy
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_game_url")]
    pub game_url: String,
    #[serde(default)]
    pub identity_policy: IdentityPolicy,
}

/// Loop delays, all in seconds
#[derive(Debug, Deserialize)]
pub struct ScheduleConfig {
    /// Wait after a failed cycle before retrying the same account
    #[serde(default = "default_error_cooldown")]
    pub error_cooldown_secs: u64,
    /// Wait after claim + start before polling the next account
    #[serde(default)]
    pub post_claim_delay_secs: u64,
    /// Wait after rotating away from an account with no farming session
    #[serde(default = "default_no_farming_delay")]
    pub no_farming_delay_secs: u64,
    /// Status reporter tick; 0 disables the reporter
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,
}

/// Log format and optional Prometheus listener
#[derive(Debug, Default, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub metrics_listen_addr: Option<SocketAddr>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token.txt")
}

fn default_start_account() -> String {
    "account_1".to_string()
}

fn default_gateway_url() -> String {
    blum_api::constants::GATEWAY_URL.to_string()
}

fn default_game_url() -> String {
    blum_api::constants::GAME_URL.to_string()
}

fn default_error_cooldown() -> u64 {
    60
}

fn default_no_farming_delay() -> u64 {
    30
}

fn default_status_interval() -> u64 {
    60
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            start_account: default_start_account(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            game_url: default_game_url(),
            identity_policy: IdentityPolicy::default(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            error_cooldown_secs: default_error_cooldown(),
            post_claim_delay_secs: 0,
            no_farming_delay_secs: default_no_farming_delay(),
            status_interval_secs: default_status_interval(),
        }
    }
}

impl ApiConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            gateway_url: self.gateway_url.clone(),
            game_url: self.game_url.clone(),
        }
    }
}

impl ScheduleConfig {
    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error_cooldown_secs)
    }

    pub fn post_claim_delay(&self) -> Duration {
        Duration::from_secs(self.post_claim_delay_secs)
    }

    pub fn no_farming_delay(&self) -> Duration {
        Duration::from_secs(self.no_farming_delay_secs)
    }

    /// `None` when the reporter is disabled.
    pub fn status_interval(&self) -> Option<Duration> {
        (self.status_interval_secs > 0).then(|| Duration::from_secs(self.status_interval_secs))
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing file at an implicit path means "all defaults".
    ///
    /// A path the operator named explicitly must exist.
    pub fn load_or_default(path: &Path, explicit: bool) -> common::Result<Self> {
        if !explicit && !path.exists() {
            let mut config = Config::default();
            config.apply_env();
            config.validate()?;
            return Ok(config);
        }
        Self::load(path)
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(TOKEN_FILE_ENV) {
            if !path.trim().is_empty() {
                self.accounts.token_file = PathBuf::from(path.trim());
            }
        }
    }

    fn validate(&self) -> common::Result<()> {
        for (name, url) in [
            ("gateway_url", &self.api.gateway_url),
            ("game_url", &self.api.game_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(common::Error::Config(format!(
                    "{name} must start with http:// or https://, got: {url}"
                )));
            }
        }

        if self.schedule.error_cooldown_secs == 0 {
            return Err(common::Error::Config(
                "error_cooldown_secs must be greater than 0".into(),
            ));
        }

        // A zero delay here would spin on accounts that never farm.
        if self.schedule.no_farming_delay_secs == 0 {
            return Err(common::Error::Config(
                "no_farming_delay_secs must be greater than 0".into(),
            ));
        }

        if self.accounts.start_account.trim().is_empty() {
            return Err(common::Error::Config("start_account must not be empty".into()));
        }

        Ok(())
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    ///
    /// The flag reports whether the path was named explicitly.
    pub fn resolve_path(cli_path: Option<&str>) -> (PathBuf, bool) {
        if let Some(p) = cli_path {
            return (PathBuf::from(p), true);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return (PathBuf::from(p), true);
        }
        (PathBuf::from(DEFAULT_CONFIG_FILE), false)
    }
}
