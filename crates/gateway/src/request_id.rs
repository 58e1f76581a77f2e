//! Per-request correlation identifier.

use axum::http::{HeaderMap, HeaderName};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the correlation id, on requests and on every response.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// A request correlation identifier: propagated verbatim from the inbound
/// header, or freshly generated. Fixed for the lifetime of the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier (UUIDv7, time-ordered like every other id in
    /// the system).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Propagate the inbound header value, or mint a fresh id.
    pub fn resolve(headers: &HeaderMap) -> Self {
        headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(Self::new)
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RequestId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
