//! Identity check policy
//!
//! Two behaviors have shipped for a non-200 answer from the "who am I"
//! endpoint. `Lenient` only treats a 401 as fatal when the body carries the
//! unauthenticated code (16); other 401 codes show up transiently while the
//! gateway rotates sessions and the token keeps working afterwards. `Strict`
//! treats every non-200 answer as a dead token.

use serde::Deserialize;

use crate::constants::UNAUTHENTICATED_CODE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityPolicy {
    #[default]
    Lenient,
    Strict,
}

impl IdentityPolicy {
    /// Whether a non-transport identity response means the token is unusable.
    pub fn is_auth_failure(&self, status: u16, body: &str) -> bool {
        if status == 200 {
            return false;
        }
        match self {
            IdentityPolicy::Strict => true,
            IdentityPolicy::Lenient => {
                status != 401 || error_code(body) == Some(UNAUTHENTICATED_CODE)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IdentityPolicy::Lenient => "lenient",
            IdentityPolicy::Strict => "strict",
        }
    }
}

/// Extract the numeric `code` field from an error body, if any.
fn error_code(body: &str) -> Option<i64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("code")?
        .as_i64()
}
