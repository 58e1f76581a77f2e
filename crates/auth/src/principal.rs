//! Request principal: the authenticated (or anonymous) identity.

use serde::{Deserialize, Serialize};

/// Opaque identifier of an authenticated subject.
///
/// The value comes verbatim from the external authentication provider; the
/// pipeline never inspects its structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// The identity attached to a request for its whole lifetime.
///
/// There is no `Option<Principal>` anywhere in the pipeline: "no credentials",
/// "authentication failed", and "authentication never attempted" are all the
/// same `Anonymous` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Principal {
    Authenticated { subject: SubjectId },
    Anonymous,
}

impl Principal {
    pub fn authenticated(subject: impl Into<SubjectId>) -> Self {
        Self::Authenticated {
            subject: subject.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Self::Authenticated { subject } => Some(subject),
            Self::Anonymous => None,
        }
    }
}
