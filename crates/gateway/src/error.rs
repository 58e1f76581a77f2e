//! Mapping from the domain-error taxonomy to HTTP statuses and error bodies.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use orgkit_core::DomainError;

use crate::handler::UseCaseFailure;
use crate::request_id::RequestId;
use crate::validate::FieldIssue;

/// Machine-readable error codes, one per taxonomy entry.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const BUSINESS_RULE_VIOLATION: &str = "BUSINESS_RULE_VIOLATION";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

/// The single error body shape used for every failure, regardless of which
/// stage produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub request_id: RequestId,
    /// Captured at mapping time.
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(code: &'static str, message: impl Into<String>, request_id: &RequestId) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            request_id: request_id.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// The wire envelope: `{"error": {...}}`.
    pub fn into_envelope(self) -> Value {
        json!({ "error": self })
    }
}

/// Map any use-case failure to its HTTP status and error body.
///
/// Total over the closed taxonomy: the inner match is exhaustive, so adding a
/// `DomainError` variant is a compile error here until this table is extended.
pub fn to_http_error(failure: &UseCaseFailure, request_id: &RequestId) -> (StatusCode, ErrorBody) {
    match failure {
        UseCaseFailure::Domain(error) => domain_to_http(error, request_id),
        UseCaseFailure::Unexpected(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new(codes::INTERNAL_SERVER_ERROR, "Internal server error", request_id)
                .with_details(json!({ "originalMessage": error.to_string() })),
        ),
    }
}

fn domain_to_http(error: &DomainError, request_id: &RequestId) -> (StatusCode, ErrorBody) {
    match error {
        DomainError::Validation { field, message } => {
            let mut body = ErrorBody::new(codes::VALIDATION_ERROR, message.clone(), request_id);
            if let Some(field) = field {
                body = body.with_details(json!({ "field": field }));
            }
            (StatusCode::BAD_REQUEST, body)
        }
        DomainError::Unauthorized { message } => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new(codes::UNAUTHORIZED, message.clone(), request_id),
        ),
        DomainError::NotFound {
            resource,
            identifier,
        } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new(codes::NOT_FOUND, error.to_string(), request_id)
                .with_details(json!({ "resource": resource, "identifier": identifier })),
        ),
        DomainError::Conflict { message } => (
            StatusCode::CONFLICT,
            ErrorBody::new(codes::CONFLICT, message.clone(), request_id),
        ),
        DomainError::BusinessRule { rule, message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorBody::new(codes::BUSINESS_RULE_VIOLATION, message.clone(), request_id)
                .with_details(json!({ "rule": rule })),
        ),
    }
}

/// The validation short-circuit body: aggregated issues under `details.issues`.
pub fn validation_failed(issues: &[FieldIssue], request_id: &RequestId) -> (StatusCode, ErrorBody) {
    (
        StatusCode::BAD_REQUEST,
        ErrorBody::new(codes::VALIDATION_ERROR, "Input validation failed", request_id)
            .with_details(json!({ "issues": issues })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid() -> RequestId {
        RequestId::new("req-1")
    }

    #[test]
    fn taxonomy_maps_to_exact_status_code_pairs() {
        let cases = [
            (
                DomainError::validation("bad input"),
                StatusCode::BAD_REQUEST,
                codes::VALIDATION_ERROR,
            ),
            (
                DomainError::unauthorized("who are you"),
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHORIZED,
            ),
            (
                DomainError::not_found("user", "u-1"),
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
            ),
            (
                DomainError::conflict("duplicate"),
                StatusCode::CONFLICT,
                codes::CONFLICT,
            ),
            (
                DomainError::business_rule("owner-removal", "nope"),
                StatusCode::UNPROCESSABLE_ENTITY,
                codes::BUSINESS_RULE_VIOLATION,
            ),
        ];

        for (error, expected_status, expected_code) in cases {
            let (status, body) = to_http_error(&UseCaseFailure::Domain(error), &rid());
            assert_eq!(status, expected_status);
            assert_eq!(body.code, expected_code);
            assert_eq!(body.request_id, rid());
        }
    }

    #[test]
    fn unexpected_failures_carry_original_message() {
        let failure = UseCaseFailure::Unexpected(anyhow::anyhow!("Database connection lost"));
        let (status, body) = to_http_error(&failure, &rid());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, codes::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.details.unwrap()["originalMessage"],
            "Database connection lost"
        );
    }

    #[test]
    fn not_found_details_name_resource_and_identifier() {
        let (_, body) = to_http_error(
            &UseCaseFailure::Domain(DomainError::not_found("organization", "org-1")),
            &rid(),
        );
        let details = body.details.unwrap();
        assert_eq!(details["resource"], "organization");
        assert_eq!(details["identifier"], "org-1");
    }

    #[test]
    fn envelope_nests_body_under_error_key() {
        let body = ErrorBody::new(codes::NOT_FOUND, "missing", &rid());
        let envelope = body.into_envelope();
        assert_eq!(envelope["error"]["code"], "NOT_FOUND");
        assert_eq!(envelope["error"]["requestId"], "req-1");
        assert!(envelope["error"]["timestamp"].is_string());
    }

    #[test]
    fn validation_failed_aggregates_issues() {
        let issues = vec![
            FieldIssue::new("body.email", "must be a valid email", "invalid_email"),
            FieldIssue::new("body.name", "is required", "required"),
        ];
        let (status, body) = validation_failed(&issues, &rid());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let listed = body.details.unwrap()["issues"].as_array().unwrap().len();
        assert_eq!(listed, 2);
    }
}
