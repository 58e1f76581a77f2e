//! Static bearer-token authenticator.
//!
//! Stand-in for an external token verification service: an immutable
//! token → subject table consulted per request. Unknown or missing
//! credentials resolve to no subject, never to an error.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use orgkit_auth::{AuthContext, Authenticator, SubjectId};

#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, SubjectId>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, subject: impl Into<SubjectId>) -> Self {
        self.tokens.insert(token.into(), subject.into());
        self
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, context: &AuthContext) -> Result<Option<SubjectId>> {
        let Some(header) = context.header("authorization") else {
            return Ok(None);
        };
        let Some(token) = header.strip_prefix("Bearer ") else {
            return Ok(None);
        };

        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.tokens.get(token).cloned())
    }
}
