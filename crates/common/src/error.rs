//! Configuration error types
//!
//! Every failure here is fatal at startup: the agent never enters its
//! polling loop with a half-loaded configuration.

use thiserror::Error;

/// Startup configuration error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;
