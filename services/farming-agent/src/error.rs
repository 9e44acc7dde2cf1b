//! Service-level error types

use thiserror::Error;

/// Errors that end a decision-loop run.
///
/// Per-cycle API failures never appear here: the loop logs them and retries
/// after its cooldown. Only a rejected credential stops the run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("credential for {account} was rejected by the identity check")]
    CredentialRejected { account: String },
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_names_account() {
        let err = Error::CredentialRejected {
            account: "account_2".into(),
        };
        assert_eq!(
            err.to_string(),
            "credential for account_2 was rejected by the identity check"
        );
        assert!(format!("{err:?}").contains("CredentialRejected"));
    }
}
