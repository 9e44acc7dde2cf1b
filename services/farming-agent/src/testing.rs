//! In-memory `FarmingApi` for loop and reporter tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use blum_api::{ApiFuture, BalanceSnapshot, Error, FarmingApi, Result};
use serde_json::json;

/// One recorded API call, with the token it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Identity(String),
    Balance(String),
    Claim(String),
    Start(String),
}

/// Scripted API. Identity answers are consumed in order and default to
/// `false` once exhausted, which ends a driver run. Balances are scripted
/// per token and default to a transport error.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    identity: Mutex<VecDeque<bool>>,
    balances: Mutex<HashMap<String, VecDeque<Result<BalanceSnapshot>>>>,
    fail_claim: bool,
    fail_start: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.identity.lock().unwrap().extend(answers);
        self
    }

    pub fn with_balance(self, token: &str, balance: Result<BalanceSnapshot>) -> Self {
        self.balances
            .lock()
            .unwrap()
            .entry(token.to_string())
            .or_default()
            .push_back(balance);
        self
    }

    pub fn with_failing_claim(mut self) -> Self {
        self.fail_claim = true;
        self
    }

    pub fn with_failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FarmingApi for FakeApi {
    fn check_identity<'a>(&'a self, token: &'a str) -> ApiFuture<'a, bool> {
        self.record(Call::Identity(token.to_string()));
        let answer = self.identity.lock().unwrap().pop_front().unwrap_or(false);
        Box::pin(std::future::ready(answer))
    }

    fn balance<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<BalanceSnapshot>> {
        self.record(Call::Balance(token.to_string()));
        let result = self
            .balances
            .lock()
            .unwrap()
            .get_mut(token)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(Error::Http("connection refused".into())));
        Box::pin(std::future::ready(result))
    }

    fn claim<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<serde_json::Value>> {
        self.record(Call::Claim(token.to_string()));
        let result = if self.fail_claim {
            Err(Error::Http("connection reset".into()))
        } else {
            Ok(json!({"claimed": token}))
        };
        Box::pin(std::future::ready(result))
    }

    fn start<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<serde_json::Value>> {
        self.record(Call::Start(token.to_string()));
        let result = if self.fail_start {
            Err(Error::Status {
                endpoint: "start",
                status: 500,
                body: "internal".into(),
            })
        } else {
            Ok(json!({"started": token}))
        };
        Box::pin(std::future::ready(result))
    }
}

/// Snapshot with a farming session ending at `end_time`.
pub fn farming_until(end_time: i64) -> BalanceSnapshot {
    serde_json::from_value(json!({
        "availableBalance": "1500.25",
        "farming": {"balance": "57.6", "endTime": end_time}
    }))
    .unwrap()
}

/// Snapshot for an account that never started farming.
pub fn no_farming() -> BalanceSnapshot {
    serde_json::from_value(json!({"availableBalance": "10"})).unwrap()
}
