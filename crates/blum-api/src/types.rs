//! Balance and farming response types
//!
//! Blum reports balances as decimal strings (`"57.6"`) but older responses
//! and some mirrors use JSON numbers. `Amount` accepts both and keeps the
//! server's text so nothing is lost to float rounding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A balance value exactly as the server reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAmount", into = "String")]
pub struct Amount(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawAmount> for Amount {
    fn from(raw: RawAmount) -> Self {
        match raw {
            RawAmount::Text(s) => Amount(s),
            RawAmount::Number(n) => Amount(n.to_string()),
        }
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Amount {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response from the balance endpoint.
///
/// `farming` is absent (or `null`) when farming was never started for the
/// account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub available_balance: Amount,
    #[serde(default)]
    pub play_passes: Option<u64>,
    /// Server clock at response time, unix milliseconds
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub farming: Option<FarmingState>,
}

/// An accrual session. `end_time` is absolute unix milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmingState {
    pub balance: Amount,
    pub end_time: i64,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub earnings_rate: Option<Amount>,
}

impl FarmingState {
    /// Whether the session has ended at `now_millis`.
    pub fn is_complete(&self, now_millis: i64) -> bool {
        self.end_time <= now_millis
    }
}
