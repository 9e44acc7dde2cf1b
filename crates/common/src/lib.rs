//! Shared types for the Blum farming agent workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
