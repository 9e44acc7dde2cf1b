//! Account set for the farming agent
//!
//! Loads one bearer token per line from a credentials file and labels them
//! `account_1..account_N` in file order. The set is immutable after load and
//! is passed explicitly to whatever needs it. Rotation is plain round-robin:
//! `(index + 1) mod N`.
//!
//! `ActiveAccount` is the single mutable cursor. Only the decision loop holds
//! it; other tasks get an `ActiveAccountView` that can read but not move it.

pub mod accounts;
pub mod cursor;
pub mod error;

pub use accounts::{Account, AccountSet, label_for};
pub use cursor::{ActiveAccount, ActiveAccountView};
pub use error::{Error, Result};
