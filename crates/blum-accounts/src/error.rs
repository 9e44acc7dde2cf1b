//! Error types for account loading

/// Errors from building or addressing the account set. All are startup
/// configuration errors: the agent must not start with an unusable set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("no credentials: {0}")]
    NoCredentials(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

impl From<Error> for common::Error {
    fn from(err: Error) -> Self {
        common::Error::Config(err.to_string())
    }
}

/// Result alias for account operations.
pub type Result<T> = std::result::Result<T, Error>;
