//! Per-route authentication policy.

use serde::{Deserialize, Serialize};

/// How strictly a route enforces authentication.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthRequirement {
    /// Anonymous requests are rejected with 401 before the handler runs.
    Required,
    /// Authentication is attempted; anonymous requests pass through.
    Optional,
    /// The authentication capability is never invoked for this route.
    None,
}

impl AuthRequirement {
    /// Whether the authentication capability should be invoked at all.
    pub fn attempts_authentication(&self) -> bool {
        !matches!(self, Self::None)
    }
}
