//! The use-case capability contract: what handlers receive and return.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Value, json};

use orgkit_auth::Principal;
use orgkit_core::{DomainError, Pagination};

use crate::request_id::RequestId;

/// Everything a use case receives from the pipeline.
#[derive(Debug, Clone)]
pub struct UseCaseRequest {
    /// The validated `{body, params, query}` candidate (or the raw candidate
    /// for routes without a declared shape).
    pub input: Value,
    pub principal: Principal,
    pub request_id: RequestId,
}

impl UseCaseRequest {
    pub fn body(&self) -> &Value {
        &self.input["body"]
    }

    /// A path parameter, as raw segment text.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.input["params"][name].as_str()
    }

    /// A query parameter, as raw text.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.input["query"][name].as_str()
    }
}

/// Success payload shapes allowed on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `{"data": ...}`
    Data(Value),
    /// `{"items": [...], "pagination": {...}}`
    Collection {
        items: Vec<Value>,
        pagination: Pagination,
    },
    /// No body (e.g. 204).
    Empty,
}

impl ResponseBody {
    /// The wire envelope for this body, if any.
    pub fn into_envelope(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(json!({ "data": value })),
            Self::Collection { items, pagination } => {
                Some(json!({ "items": items, "pagination": pagination }))
            }
            Self::Empty => None,
        }
    }
}

/// A successful use-case result: status, envelope body, optional extra
/// headers (applied last during response assembly).
#[derive(Debug, Clone)]
pub struct UseCaseResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
    pub headers: Vec<(String, String)>,
}

impl UseCaseResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Data(data),
            headers: Vec::new(),
        }
    }

    pub fn created(data: Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: ResponseBody::Data(data),
            headers: Vec::new(),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: ResponseBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn collection(items: Vec<Value>, pagination: Pagination) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Collection { items, pagination },
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Failure channel for use cases: the closed domain taxonomy, or anything
/// unexpected. Domain failures are values, never panics; `Unexpected` is the
/// catch-all that the mapper renders as 500.
#[derive(Debug)]
pub enum UseCaseFailure {
    Domain(DomainError),
    Unexpected(anyhow::Error),
}

impl core::fmt::Display for UseCaseFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Domain(err) => core::fmt::Display::fmt(err, f),
            Self::Unexpected(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<DomainError> for UseCaseFailure {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}

impl From<anyhow::Error> for UseCaseFailure {
    fn from(value: anyhow::Error) -> Self {
        Self::Unexpected(value)
    }
}

pub type UseCaseResult = Result<UseCaseResponse, UseCaseFailure>;

/// Capability contract: one business use case bound to a route.
#[async_trait]
pub trait UseCaseHandler: Send + Sync {
    async fn handle(&self, request: UseCaseRequest) -> UseCaseResult;
}
