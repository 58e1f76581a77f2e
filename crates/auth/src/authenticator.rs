//! The injected authentication capability and its inputs.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::principal::SubjectId;

/// Inputs handed to the authentication capability.
///
/// Header names are lower-cased and multi-valued headers are joined with
/// `", "`, so implementations never deal with transport-level casing. The
/// cookie map is part of the capability contract but the pipeline always
/// passes it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    headers: BTreeMap<String, String>,
    cookies: BTreeMap<String, String>,
}

impl AuthContext {
    /// Build a context from raw header pairs, normalizing names to lowercase.
    pub fn from_header_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in pairs {
            headers
                .entry(name.to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_owned());
        }
        Self {
            headers,
            cookies: BTreeMap::new(),
        }
    }

    /// Look up a header by name (any casing).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }
}

/// Capability contract: resolve request credentials to a subject.
///
/// Implementations verify credentials however they like (token introspection,
/// session lookup, a static table). They are expected not to fail; the
/// pipeline treats `Err` as an anonymous result, so an authentication failure
/// never surfaces as an error response on its own.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, context: &AuthContext) -> Result<Option<SubjectId>>;
}
