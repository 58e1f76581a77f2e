//! The validation capability contract and candidate assembly.
//!
//! Validation runs against one combined candidate value `{body, params,
//! query}` so a single pass can report issues across all three groups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One failed constraint, attached to a dotted field path (e.g. `body.email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldIssue {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Result of running a declared shape against a candidate input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The (possibly normalized) input the handler will receive.
    Valid(Value),
    /// Every failed constraint, aggregated across body/params/query rather
    /// than stopping at the first failing group.
    Invalid(Vec<FieldIssue>),
}

/// Capability contract: validate a candidate against a route's declared shape.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, candidate: &Value) -> ValidationOutcome;
}

/// Assemble the validation candidate from the request pieces.
///
/// A body that is absent or not parseable as JSON becomes an empty object,
/// so shape failures surface as ordinary per-field issues rather than a
/// distinct parse error.
pub fn build_candidate(body: &[u8], params: &[(String, String)], query: &[(String, String)]) -> Value {
    let body_value = if body.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Map::new()))
    };

    json!({
        "body": body_value,
        "params": pairs_to_object(params),
        "query": pairs_to_object(query),
    })
}

/// Split a raw query string into key/value pairs. No percent-decoding beyond
/// what the host already performed; duplicate keys collapse to the last one.
pub fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

fn pairs_to_object(pairs: &[(String, String)]) -> Value {
    let map: Map<String, Value> = pairs
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(map)
}
