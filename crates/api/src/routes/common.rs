//! Shared helpers for route handlers.

use core::str::FromStr;

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;

use orgkit_core::{DomainError, PageRequest};
use orgkit_gateway::{UseCaseFailure, UseCaseRequest};

/// Serialize a record into a response payload.
pub fn to_json<T: Serialize>(record: &T) -> Result<Value, UseCaseFailure> {
    serde_json::to_value(record).map_err(|e| UseCaseFailure::Unexpected(e.into()))
}

/// Serialize a batch of records for a collection envelope.
pub fn to_items<T: Serialize>(records: &[T]) -> Result<Vec<Value>, UseCaseFailure> {
    records.iter().map(to_json).collect()
}

/// Parse a typed identifier out of a path parameter.
///
/// A missing parameter is a pipeline bug (the router binds every declared
/// name); malformed text is the caller's validation problem.
pub fn parse_id<T>(request: &UseCaseRequest, name: &str) -> Result<T, UseCaseFailure>
where
    T: FromStr<Err = DomainError>,
{
    let raw = request
        .param(name)
        .ok_or_else(|| UseCaseFailure::Unexpected(anyhow!("missing path parameter '{name}'")))?;
    raw.parse().map_err(|_| {
        DomainError::validation_field(format!("params.{name}"), "must be a valid identifier").into()
    })
}

/// Parse a typed identifier out of a body field.
pub fn parse_body_id<T>(request: &UseCaseRequest, field: &str) -> Result<T, UseCaseFailure>
where
    T: FromStr<Err = DomainError>,
{
    let raw = body_str(request, field)?;
    raw.parse().map_err(|_| {
        DomainError::validation_field(format!("body.{field}"), "must be a valid identifier").into()
    })
}

/// Required string field from the request body.
pub fn body_str<'a>(request: &'a UseCaseRequest, field: &str) -> Result<&'a str, UseCaseFailure> {
    request.body()[field].as_str().ok_or_else(|| {
        DomainError::validation_field(format!("body.{field}"), "is required").into()
    })
}

/// Optional string field from the request body.
pub fn body_str_opt<'a>(request: &'a UseCaseRequest, field: &str) -> Option<&'a str> {
    request.body()[field].as_str()
}

/// Page/pageSize from the query group; defaults when absent or malformed.
pub fn page_request(request: &UseCaseRequest) -> PageRequest {
    let defaults = PageRequest::default();
    let page = request
        .query("page")
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| defaults.page());
    let page_size = request
        .query("pageSize")
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| defaults.page_size());
    PageRequest::new(page, page_size)
}
