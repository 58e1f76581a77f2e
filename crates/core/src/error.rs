//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// This is a closed taxonomy: every variant has a fixed HTTP mapping in the
/// gateway, and the mapping match is exhaustive. Adding a variant here forces
/// the mapper to be extended. Unexpected failures (anything outside the
/// taxonomy) travel separately as `anyhow::Error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {message}")]
    Validation {
        /// Field path the failure is attached to, when known (e.g. `body.email`).
        field: Option<String>,
        message: String,
    },

    /// The caller is not authenticated (or not allowed to act).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// A requested resource was not found.
    #[error("{resource} '{identifier}' not found")]
    NotFound {
        resource: String,
        identifier: String,
    },

    /// A conflict with existing state (e.g. duplicate unique value).
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// A business rule rejected an otherwise well-formed request.
    #[error("business rule '{rule}' violated: {message}")]
    BusinessRule { rule: String, message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn business_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRule {
            rule: rule.into(),
            message: message.into(),
        }
    }
}
