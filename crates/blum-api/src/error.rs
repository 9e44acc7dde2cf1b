//! Error types for Blum API calls

/// Errors from balance, claim, and start calls.
///
/// All variants are recoverable from the agent's point of view: the decision
/// loop logs them and retries after its cooldown.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl Error {
    /// Short classification label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Http(_) => "transport",
            Error::Status { .. } => "status",
            Error::Decode(_) => "decode",
        }
    }
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
