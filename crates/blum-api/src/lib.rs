//! Blum game API client
//!
//! Wraps the four remote operations the farming agent needs: identity check,
//! balance/farming status, claim, and start. Every call carries the account's
//! bearer token plus a fixed browser-impersonation header set (see
//! `constants`). Calls are single-shot: no retry, no timeout override.
//!
//! The `FarmingApi` trait is the seam between the HTTP client and the
//! decision loop, so the loop can be driven by an in-memory fake in tests.

pub mod client;
pub mod constants;
pub mod error;
pub mod identity;
pub mod types;

pub use client::{BlumClient, Endpoints};
pub use error::{Error, Result};
pub use identity::IdentityPolicy;
pub use types::{Amount, BalanceSnapshot, FarmingState};

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by `FarmingApi` methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote farming operations, keyed by bearer token.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn FarmingApi>`).
pub trait FarmingApi: Send + Sync {
    /// Whether the token is still usable. Never errors: transport failures
    /// and rejected statuses both yield `false`, subject to `IdentityPolicy`.
    fn check_identity<'a>(&'a self, token: &'a str) -> ApiFuture<'a, bool>;

    /// Current balance and farming status.
    fn balance<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<BalanceSnapshot>>;

    /// Claim completed farming. Returns the server acknowledgment unvalidated.
    fn claim<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<serde_json::Value>>;

    /// Start a new farming session. Returns the server acknowledgment unvalidated.
    fn start<'a>(&'a self, token: &'a str) -> ApiFuture<'a, Result<serde_json::Value>>;
}
