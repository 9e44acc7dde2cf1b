//! reqwest-backed Blum client
//!
//! Static browser headers are installed once as client defaults; only the
//! `authorization` header varies per call. Non-2xx answers from balance,
//! claim, and start become `Error::Status` with the response body attached.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info, warn};

use crate::constants::{
    BALANCE_PATH, BROWSER_HEADERS, FARMING_CLAIM_PATH, FARMING_START_PATH, GAME_URL, GATEWAY_URL,
    USER_ME_PATH,
};
use crate::error::{Error, Result};
use crate::identity::IdentityPolicy;
use crate::types::BalanceSnapshot;
use crate::{ApiFuture, FarmingApi};

/// Base origins for the two Blum hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub gateway_url: String,
    pub game_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gateway_url: GATEWAY_URL.to_string(),
            game_url: GAME_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point both hosts at the same origin (local mock servers).
    pub fn single(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            gateway_url: origin.clone(),
            game_url: origin,
        }
    }

    fn identity(&self) -> String {
        join(&self.gateway_url, USER_ME_PATH)
    }

    fn balance(&self) -> String {
        join(&self.game_url, BALANCE_PATH)
    }

    fn claim(&self) -> String {
        join(&self.game_url, FARMING_CLAIM_PATH)
    }

    fn start(&self) -> String {
        join(&self.game_url, FARMING_START_PATH)
    }
}

fn join(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}

/// Build the constant browser-impersonation header set.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len());
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

fn bearer(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| Error::Http("bearer token contains invalid header characters".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// HTTP client for the Blum game API.
#[derive(Debug, Clone)]
pub struct BlumClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    policy: IdentityPolicy,
}

impl BlumClient {
    pub fn new(endpoints: Endpoints, policy: IdentityPolicy) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(browser_headers())
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoints,
            policy,
        })
    }

    /// GET the "who am I" endpoint and apply the identity policy.
    pub async fn check_identity(&self, token: &str) -> bool {
        let auth = match bearer(token) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "identity check skipped");
                return false;
            }
        };

        let response = match self
            .http
            .get(self.endpoints.identity())
            .header(AUTHORIZATION, auth)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "identity check request failed");
                return false;
            }
        };

        let status = response.status().as_u16();
        if status == 200 {
            return true;
        }

        let body = response.text().await.unwrap_or_default();
        if self.policy.is_auth_failure(status, &body) {
            debug!(status, policy = self.policy.label(), "identity rejected");
            false
        } else {
            info!(status, body = %body, "tolerating identity error, token kept");
            true
        }
    }

    /// GET balance and farming status.
    pub async fn balance(&self, token: &str) -> Result<BalanceSnapshot> {
        let response = self
            .http
            .get(self.endpoints.balance())
            .header(AUTHORIZATION, bearer(token)?)
            .send()
            .await
            .map_err(|e| Error::Http(format!("balance request failed: {e}")))?;

        let response = ensure_success(response, "balance").await?;
        response
            .json::<BalanceSnapshot>()
            .await
            .map_err(|e| Error::Decode(format!("balance: {e}")))
    }

    /// POST the claim endpoint with an empty body.
    pub async fn claim(&self, token: &str) -> Result<serde_json::Value> {
        self.post_empty(self.endpoints.claim(), token, "claim").await
    }

    /// POST the start endpoint with an empty body.
    pub async fn start(&self, token: &str) -> Result<serde_json::Value> {
        self.post_empty(self.endpoints.start(), token, "start").await
    }

    async fn post_empty(
        &self,
        url: String,
        token: &str,
        endpoint: &'static str,
    ) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, bearer(token)?)
            .body("")
            .send()
            .await
            .map_err(|e| Error::Http(format!("{endpoint} request failed: {e}")))?;

        let response = ensure_success(response, endpoint).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("{endpoint} body read failed: {e}")))?;

        // Acknowledgments are passed through as-is; an empty 200 is still an ack.
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(format!("{endpoint}: {e}")))
    }
}

async fn ensure_success(
    response: reqwest::Response,
    endpoint: &'static str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<no body>"));
    Err(Error::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

impl FarmingApi for BlumClient {
    fn check_identity<'a>(&'a self, token: &'a str) -> ApiFuture<'a, bool> {
        Box::pin(BlumClient::check_identity(self, token))
    }

    fn balance<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<BalanceSnapshot>> {
        Box::pin(BlumClient::balance(self, token))
    }

    fn claim<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<serde_json::Value>> {
        Box::pin(BlumClient::claim(self, token))
    }

    fn start<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<serde_json::Value>> {
        Box::pin(BlumClient::start(self, token))
    }
}
